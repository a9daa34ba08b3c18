// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Lists of scandates.
//!
//! A list of scandates is a tab-delimited text file. The first line is a
//! header, and each following line names a chamber, a scandate and a label:
//!
//! ```text
//! ChamberName	scandate	CFG_THR_ARM_DAC
//! GE11-X-S-CERN-0001	2018.06.29.14.07	25
//! GE11-X-S-CERN-0001	2018.06.30.09.12	40
//! ```
//!
//! The name of the third header column is what the labels describe (e.g. the
//! threshold DAC that was varied between scans). Lines starting with `#` are
//! ignored.

mod error;

pub use error::ScanListError;

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use log::{debug, trace};
use vec1::Vec1;

use crate::constants::{SBIT_RATE_FILE_NAME, SBIT_RATE_OR_DIR};

/// A single completed scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanDescriptor {
    pub chamber: String,
    pub scandate: String,
    /// Used to label this scan in legends.
    pub label: String,
}

impl ScanDescriptor {
    /// The directory containing all OR-mode S-bit rate scans for this scan's
    /// chamber.
    pub fn scan_dir(&self, data_path: &Path) -> PathBuf {
        data_path.join(&self.chamber).join(SBIT_RATE_OR_DIR)
    }

    /// The directory of this particular scan.
    pub fn scandate_dir(&self, data_path: &Path) -> PathBuf {
        self.scan_dir(data_path).join(&self.scandate)
    }

    /// The result file written by this scan.
    pub fn result_path(&self, data_path: &Path) -> PathBuf {
        self.scandate_dir(data_path).join(SBIT_RATE_FILE_NAME)
    }
}

/// An ordered, non-empty list of scans.
#[derive(Debug, Clone)]
pub struct ScanList {
    /// The name of the third column of the header.
    pub thr_dac_name: String,

    pub descriptors: Vec1<ScanDescriptor>,
}

impl ScanList {
    /// The chamber name of the first scan. Outputs are named after this.
    pub fn chamber(&self) -> &str {
        &self.descriptors.first().chamber
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Parse a list of scandates. Unless `alpha_labels` is true, the labels must
/// be numbers.
pub fn parse_list_of_scan_dates<P: AsRef<Path>>(
    file: P,
    alpha_labels: bool,
) -> Result<ScanList, ScanListError> {
    let file = file.as_ref();
    debug!("Parsing list of scandates {}", file.display());
    let csv_err = |err| ScanListError::Csv {
        file: file.to_path_buf(),
        err,
    };

    if !file.exists() {
        return Err(ScanListError::DoesNotExist(file.to_path_buf()));
    }
    let reader = BufReader::new(File::open(file).map_err(|e| csv_err(e.into()))?);
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(csv_err)?;
    if headers.len() != 3 {
        return Err(ScanListError::BadHeader {
            file: file.to_path_buf(),
            found: headers.len(),
        });
    }
    let thr_dac_name = headers[2].to_string();
    trace!("Header: {headers:?}");

    let mut descriptors = vec![];
    for record in csv_reader.records() {
        let record = record.map_err(csv_err)?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        if record.len() != 3 {
            return Err(ScanListError::BadRow {
                file: file.to_path_buf(),
                line,
                found: record.len(),
            });
        }

        for (column, value) in ["chamber name", "scandate", "label"].into_iter().zip(&record) {
            if value.is_empty() {
                return Err(ScanListError::EmptyField {
                    file: file.to_path_buf(),
                    line,
                    column,
                });
            }
        }

        let label = record[2].to_string();
        if !alpha_labels && label.parse::<f64>().is_err() {
            return Err(ScanListError::NonNumericLabel {
                file: file.to_path_buf(),
                line,
                label,
            });
        }

        descriptors.push(ScanDescriptor {
            chamber: record[0].to_string(),
            scandate: record[1].to_string(),
            label,
        });
    }

    let descriptors = Vec1::try_from_vec(descriptors)
        .map_err(|_| ScanListError::Empty(file.to_path_buf()))?;
    debug!("Found {} scans", descriptors.len());
    Ok(ScanList {
        thr_dac_name,
        descriptors,
    })
}
