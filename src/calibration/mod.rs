// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calibration of the ARM DAC threshold from DAC units into charge [fC].
//!
//! Each VFAT has its own quartic polynomial. The calibration file is a
//! whitespace-delimited table with a header naming its columns, either in the
//! style of `TTree::ReadFile` (`vfatN/I:coef4/F:coef3/F:coef2/F:coef1/F:coef0/F`)
//! or just as plain names (`vfatN coef4 coef3 coef2 coef1 coef0`). `coefN`
//! multiplies `x^N`.

mod error;

pub use error::CalibrationError;

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::{debug, trace};

/// The names of the columns needed from a calibration file.
const COLUMNS: [&str; 6] = ["vfatN", "coef4", "coef3", "coef2", "coef1", "coef0"];

/// `x -> coef4 x^4 + coef3 x^3 + coef2 x^2 + coef1 x + coef0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmDacCalibration {
    pub coef4: f64,
    pub coef3: f64,
    pub coef2: f64,
    pub coef1: f64,
    pub coef0: f64,
}

impl ArmDacCalibration {
    /// The calibration that leaves thresholds unchanged.
    pub fn identity() -> ArmDacCalibration {
        ArmDacCalibration {
            coef4: 0.0,
            coef3: 0.0,
            coef2: 0.0,
            coef1: 1.0,
            coef0: 0.0,
        }
    }

    /// The coefficients, highest power first.
    pub fn coefficients(&self) -> [f64; 5] {
        [self.coef4, self.coef3, self.coef2, self.coef1, self.coef0]
    }

    /// Convert a threshold in DAC units into charge [fC].
    pub fn apply(&self, x: f64) -> f64 {
        self.coefficients()
            .iter()
            .fold(0.0, |acc, &coefficient| acc * x + coefficient)
    }

    /// Convert the x value of each point. The number of points and their y
    /// values are unchanged.
    pub fn apply_to_points(&self, points: &mut [(f64, f64)]) {
        for (x, _) in points {
            *x = self.apply(*x);
        }
    }
}

/// ARM DAC calibrations, keyed by VFAT position.
#[derive(Debug, Clone, Default)]
pub struct CalibrationTable {
    calibrations: BTreeMap<usize, ArmDacCalibration>,
}

impl CalibrationTable {
    pub fn insert(&mut self, vfat: usize, calibration: ArmDacCalibration) {
        self.calibrations.insert(vfat, calibration);
    }

    pub fn get(&self, vfat: usize) -> Result<&ArmDacCalibration, CalibrationError> {
        self.calibrations
            .get(&vfat)
            .ok_or(CalibrationError::MissingVfat(vfat))
    }

    pub fn len(&self) -> usize {
        self.calibrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calibrations.is_empty()
    }

    /// Check that every VFAT in `0..num_vfats` has a calibration.
    pub fn check_complete(&self, num_vfats: usize) -> Result<(), CalibrationError> {
        match (0..num_vfats).find(|vfat| !self.calibrations.contains_key(vfat)) {
            Some(vfat) => Err(CalibrationError::MissingVfat(vfat)),
            None => Ok(()),
        }
    }
}

/// Strip a `TTree::ReadFile` type suffix from a column name, e.g. `vfatN/I`.
fn column_name(s: &str) -> &str {
    match s.split_once('/') {
        Some((name, _)) => name,
        None => s,
    }
}

/// Read a file of per-VFAT ARM DAC calibrations.
pub fn parse_arm_dac_cal_file<P: AsRef<Path>>(
    file: P,
) -> Result<CalibrationTable, CalibrationError> {
    let file = file.as_ref();
    debug!("Parsing ARM DAC calibration file {}", file.display());
    if !file.exists() {
        return Err(CalibrationError::DoesNotExist(file.to_path_buf()));
    }
    let io_err = |err| CalibrationError::IO {
        file: file.to_path_buf(),
        err,
    };
    let reader = BufReader::new(File::open(file).map_err(io_err)?);

    let mut table = CalibrationTable::default();
    // The position of each of `COLUMNS` in a row, once the header is read.
    let mut indices: Option<(usize, [usize; 6])> = None;
    for (i_line, line) in reader.lines().enumerate() {
        let line = line.map_err(io_err)?;
        let line_num = i_line + 1;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let (num_columns, column_indices) = match indices {
            Some(i) => i,
            None => {
                let header: Vec<&str> = if text.contains(':') {
                    text.split(':').map(|s| column_name(s.trim())).collect()
                } else {
                    text.split_whitespace().map(column_name).collect()
                };
                trace!("Calibration file header: {header:?}");
                let mut found = [0; 6];
                for (index, column) in found.iter_mut().zip(COLUMNS) {
                    *index = header.iter().position(|h| *h == column).ok_or(
                        CalibrationError::MissingColumn {
                            file: file.to_path_buf(),
                            column,
                        },
                    )?;
                }
                indices = Some((header.len(), found));
                continue;
            }
        };

        let values: Vec<&str> = text.split_whitespace().collect();
        if values.len() != num_columns {
            return Err(CalibrationError::BadRow {
                file: file.to_path_buf(),
                line: line_num,
                expected: num_columns,
                found: values.len(),
            });
        }
        let parse_err = |column, text: &str| CalibrationError::Parse {
            file: file.to_path_buf(),
            line: line_num,
            column,
            text: text.to_string(),
        };

        let vfat_text = values[column_indices[0]];
        let vfat: usize = vfat_text
            .parse()
            .map_err(|_| parse_err("VFAT position", vfat_text))?;
        let mut coefficients = [0.0; 5];
        for (coefficient, (&index, column)) in coefficients
            .iter_mut()
            .zip(column_indices[1..].iter().zip(COLUMNS[1..].iter().copied()))
        {
            let text = values[index];
            *coefficient = text.parse().map_err(|_| parse_err(column, text))?;
        }
        let [coef4, coef3, coef2, coef1, coef0] = coefficients;

        if table.calibrations.contains_key(&vfat) {
            return Err(CalibrationError::DuplicateVfat {
                file: file.to_path_buf(),
                line: line_num,
                vfat,
            });
        }
        table.insert(
            vfat,
            ArmDacCalibration {
                coef4,
                coef3,
                coef2,
                coef1,
                coef0,
            },
        );
    }

    if indices.is_none() {
        return Err(CalibrationError::Empty(file.to_path_buf()));
    }
    debug!("Read ARM DAC calibrations for {} VFATs", table.len());
    Ok(table)
}
