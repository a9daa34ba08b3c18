// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to read and write the result files of S-bit rate scans.
//!
//! A result file holds one binary table per VFAT, named
//! `VFAT{n}_THR_ARM_DAC`, with the `f64` columns `THR_ARM_DAC` (the threshold
//! in DAC units) and `RATE` (the S-bit rate in Hz).

mod error;
#[cfg(test)]
mod tests;

pub use error::ResultFileError;

use std::path::Path;

use fitsio::{
    tables::{ColumnDataType, ColumnDescription},
    FitsFile,
};
use log::{debug, trace};

use super::fits::*;
use crate::{constants::NUM_VFATS, overlay::ThresholdScan};

const THRESHOLD_COL: &str = "THR_ARM_DAC";
const RATE_COL: &str = "RATE";

/// The name of the HDU holding the rate curve of `vfat`.
pub fn hdu_name(vfat: usize) -> String {
    format!("VFAT{vfat}_THR_ARM_DAC")
}

/// Read the rate vs. threshold curves of all VFATs out of a result file. Every
/// VFAT must be present.
pub fn read(file: &Path) -> Result<ThresholdScan, ResultFileError> {
    debug!("Reading S-bit rate scan {}", file.display());
    if !file.exists() {
        return Err(ResultFileError::DoesNotExist(file.to_path_buf()));
    }
    let mut fptr = fits_open(file)?;

    let mut scan = ThresholdScan::default();
    for (vfat, points) in scan.vfats.iter_mut().enumerate() {
        let hdu_name = hdu_name(vfat);
        let hdu = match fits_open_optional_hdu(&mut fptr, hdu_name.as_str())? {
            Some(hdu) => hdu,
            None => {
                return Err(ResultFileError::MissingVfat {
                    file: file.to_path_buf(),
                    vfat,
                    hdu: hdu_name,
                })
            }
        };
        let thresholds: Vec<f64> = fits_get_col(&mut fptr, &hdu, THRESHOLD_COL)?;
        let rates: Vec<f64> = fits_get_col(&mut fptr, &hdu, RATE_COL)?;
        if thresholds.len() != rates.len() {
            return Err(ResultFileError::BadShape {
                file: file.to_path_buf(),
                vfat,
                thresholds: thresholds.len(),
                rates: rates.len(),
            });
        }
        trace!("VFAT {vfat}: read {} points", thresholds.len());
        *points = thresholds.into_iter().zip(rates).collect();
    }

    Ok(scan)
}

/// Write the curves of a scan into a new result file, clobbering anything
/// already at `file`.
pub fn write(file: &Path, scan: &ThresholdScan) -> Result<(), ResultFileError> {
    debug!("Writing S-bit rate scan {}", file.display());
    if file.exists() {
        std::fs::remove_file(file)?;
    }
    let mut fptr = FitsFile::create(file).open()?;
    let hdu = fits_open_hdu(&mut fptr, 0)?;
    hdu.write_key(&mut fptr, "NVFATS", NUM_VFATS as i64)?;

    for (vfat, points) in scan.vfats.iter().enumerate() {
        let threshold_col = ColumnDescription::new(THRESHOLD_COL)
            .with_type(ColumnDataType::Double)
            .create()?;
        let rate_col = ColumnDescription::new(RATE_COL)
            .with_type(ColumnDataType::Double)
            .create()?;
        let hdu = fptr.create_table(hdu_name(vfat), &[threshold_col, rate_col])?;
        let (thresholds, rates): (Vec<f64>, Vec<f64>) = points.iter().copied().unzip();
        hdu.write_col(&mut fptr, THRESHOLD_COL, &thresholds)?;
        hdu.write_col(&mut fptr, RATE_COL, &rates)?;
    }

    Ok(())
}
