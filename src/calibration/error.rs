// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalibrationError {
    #[error("The ARM DAC calibration file {0} doesn't exist")]
    DoesNotExist(PathBuf),

    #[error("The ARM DAC calibration file {0} is empty")]
    Empty(PathBuf),

    #[error("{file}: the header has no '{column}' column")]
    MissingColumn { file: PathBuf, column: &'static str },

    #[error("{file}:{line}: expected {expected} values, but found {found}")]
    BadRow {
        file: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("{file}:{line}: couldn't parse '{text}' as a {column}")]
    Parse {
        file: PathBuf,
        line: usize,
        column: &'static str,
        text: String,
    },

    #[error("{file}:{line}: VFAT {vfat} has already been calibrated on an earlier line")]
    DuplicateVfat {
        file: PathBuf,
        line: usize,
        vfat: usize,
    },

    #[error("There is no ARM DAC calibration for VFAT {0}")]
    MissingVfat(usize),

    #[error("Couldn't read the ARM DAC calibration file {file}: {err}")]
    IO { file: PathBuf, err: std::io::Error },
}
