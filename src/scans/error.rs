// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanListError {
    #[error("The list of scandates {0} doesn't exist")]
    DoesNotExist(PathBuf),

    #[error("The list of scandates {0} contains no scans")]
    Empty(PathBuf),

    #[error("{file}: expected 3 columns (chamber name, scandate, label) in the header, but found {found}")]
    BadHeader { file: PathBuf, found: usize },

    #[error("{file}:{line}: expected 3 columns (chamber name, scandate, label), but found {found}")]
    BadRow {
        file: PathBuf,
        line: u64,
        found: usize,
    },

    #[error("{file}:{line}: an empty {column} isn't allowed")]
    EmptyField {
        file: PathBuf,
        line: u64,
        column: &'static str,
    },

    #[error("{file}:{line}: the label '{label}' isn't a number; use --alpha-labels if the labels are alphanumeric")]
    NonNumericLabel {
        file: PathBuf,
        line: u64,
        label: String,
    },

    #[error("Couldn't parse the list of scandates {file}: {err}")]
    Csv { file: PathBuf, err: csv::Error },
}
