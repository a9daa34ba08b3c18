// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all gemplotting-related errors. This should be the *only*
//! error enum that is publicly visible.

use thiserror::Error;

use super::sbit_thresh_comp::SbitThreshCompArgsError;
use crate::{
    calibration::CalibrationError,
    gain::GainError,
    io::{container::ContainerError, result_file::ResultFileError},
    params::SbitThreshCompError,
    scans::ScanListError,
};

/// `sysexits.h` `EX_DATAERR`: the input data was incorrect in some way.
const EX_DATAERR: i32 = 65;
/// `sysexits.h` `EX_IOERR`: an error occurred while doing I/O on some file.
const EX_IOERR: i32 = 74;

/// The *only* publicly visible error from gemplotting. Variants are the
/// categories that determine the exit code.
#[derive(Error, Debug)]
pub enum GemPlottingError {
    /// The environment or the arguments are unusable.
    #[error("{0}\n\nSee 'gemplotting sbit-thresh-comp --help'")]
    Config(String),

    /// Something the inputs refer to doesn't exist.
    #[error("{0}")]
    MissingData(String),

    /// An input file exists but its contents are malformed.
    #[error("{0}")]
    DataFormat(String),

    /// Reading or writing a file failed.
    #[error("{0}")]
    Io(String),

    /// A gain curve couldn't be fit.
    #[error("{0}")]
    Fit(String),

    /// An error related to drawing plots.
    #[error("{0}\n\nIf fonts can't be found, try compiling with the \"fontconfig-dlopen\" feature.")]
    Plot(String),

    /// An error related to argument files.
    #[error("{0}\n\nArgument files are TOML or JSON files with the same keys as the long CLI arguments (with underscores).")]
    ArgFile(String),

    /// A generic error that can't be clarified further.
    #[error("{0}")]
    Generic(String),
}

impl GemPlottingError {
    /// The process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingData(_) | Self::DataFormat(_) | Self::Config(_) => EX_DATAERR,
            Self::Io(_) => EX_IOERR,
            Self::Fit(_) | Self::Plot(_) | Self::ArgFile(_) | Self::Generic(_) => 1,
        }
    }
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

// Binary sub-command errors.

impl From<SbitThreshCompArgsError> for GemPlottingError {
    fn from(e: SbitThreshCompArgsError) -> Self {
        match e {
            SbitThreshCompArgsError::NoScanList | SbitThreshCompArgsError::MissingEnv(_) => {
                Self::Config(e.to_string())
            }
        }
    }
}

impl From<SbitThreshCompError> for GemPlottingError {
    fn from(e: SbitThreshCompError) -> Self {
        let s = e.to_string();
        match e {
            SbitThreshCompError::MissingScan { .. } => Self::MissingData(s),
            SbitThreshCompError::ResultFile { err, .. } => match err {
                ResultFileError::DoesNotExist(_) => Self::MissingData(s),
                ResultFileError::MissingVfat { .. } | ResultFileError::BadShape { .. } => {
                    Self::DataFormat(s)
                }
                ResultFileError::Fits(_) | ResultFileError::Fitsio(_) | ResultFileError::IO(_) => {
                    Self::Io(s)
                }
            },
            SbitThreshCompError::Calibration(_) => Self::DataFormat(s),
            SbitThreshCompError::Container(err) => Self::from(err),
            SbitThreshCompError::IO(_) => Self::Io(s),
            #[cfg(feature = "plotting")]
            SbitThreshCompError::Draw(_) => Self::Plot(s),
            #[cfg(not(feature = "plotting"))]
            SbitThreshCompError::NoPlottingFeature => Self::Plot(s),
        }
    }
}

// Library errors.

impl From<GainError> for GemPlottingError {
    fn from(e: GainError) -> Self {
        let s = e.to_string();
        match e {
            GainError::IO { err, .. } if err.kind() == std::io::ErrorKind::NotFound => {
                Self::MissingData(s)
            }
            GainError::IO { .. } => Self::Io(s),
            GainError::Parse { .. } => Self::DataFormat(s),
            GainError::LengthMismatch { .. }
            | GainError::Underdetermined(_)
            | GainError::NonPositiveGain { .. }
            | GainError::NonFiniteCurrent { .. } => Self::Fit(s),
        }
    }
}

impl From<ScanListError> for GemPlottingError {
    fn from(e: ScanListError) -> Self {
        let s = e.to_string();
        match e {
            ScanListError::DoesNotExist(_) => Self::MissingData(s),
            ScanListError::Empty(_)
            | ScanListError::BadHeader { .. }
            | ScanListError::BadRow { .. }
            | ScanListError::EmptyField { .. }
            | ScanListError::NonNumericLabel { .. }
            | ScanListError::Csv { .. } => Self::DataFormat(s),
        }
    }
}

impl From<CalibrationError> for GemPlottingError {
    fn from(e: CalibrationError) -> Self {
        let s = e.to_string();
        match e {
            CalibrationError::DoesNotExist(_) => Self::MissingData(s),
            CalibrationError::IO { .. } => Self::Io(s),
            CalibrationError::Empty(_)
            | CalibrationError::MissingColumn { .. }
            | CalibrationError::BadRow { .. }
            | CalibrationError::Parse { .. }
            | CalibrationError::DuplicateVfat { .. }
            | CalibrationError::MissingVfat(_) => Self::DataFormat(s),
        }
    }
}

impl From<ContainerError> for GemPlottingError {
    fn from(e: ContainerError) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<std::io::Error> for GemPlottingError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
