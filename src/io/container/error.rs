// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

use crate::io::FitsError;

#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("Canvas '{name}' should have {expected} bytes of pixels, but it has {found}")]
    BadCanvas {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("{file}: VFAT {vfat} has a row for scan {scan}, but there are only {num_scans} scans")]
    BadScanIndex {
        file: PathBuf,
        vfat: usize,
        scan: i32,
        num_scans: usize,
    },

    #[error("{file}: the {thing} columns have different lengths")]
    BadShape { file: PathBuf, thing: &'static str },

    #[error("{file}: expected {expected} VFATs, but the file says there are {found}")]
    VfatCount {
        file: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Fits(#[from] FitsError),

    #[error(transparent)]
    Fitsio(#[from] fitsio::errors::Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
