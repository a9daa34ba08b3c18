// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

use crate::io::FitsError;

#[derive(Error, Debug)]
pub enum ResultFileError {
    #[error("The S-bit rate scan result file {0} doesn't exist")]
    DoesNotExist(PathBuf),

    #[error("{file}: there is no HDU '{hdu}' for VFAT {vfat}")]
    MissingVfat {
        file: PathBuf,
        vfat: usize,
        hdu: String,
    },

    #[error("{file}: VFAT {vfat} has {thresholds} thresholds but {rates} rates")]
    BadShape {
        file: PathBuf,
        vfat: usize,
        thresholds: usize,
        rates: usize,
    },

    #[error(transparent)]
    Fits(#[from] FitsError),

    #[error(transparent)]
    Fitsio(#[from] fitsio::errors::Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
