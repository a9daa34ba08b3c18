// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calibration analysis utilities for GEM detectors.
//!
//! Two independent tools live here: an effective-gain estimator (see
//! [`gain`]) and a comparison of S-bit threshold scans across many scandates
//! (see [`overlay`] and the `sbit-thresh-comp` subcommand).

pub mod calibration;
mod cli;
pub mod constants;
pub mod gain;
pub mod io;
pub mod overlay;
mod params;
#[cfg(feature = "plotting")]
mod plotting;
pub mod scans;

// Re-exports.
pub use calibration::{ArmDacCalibration, CalibrationTable};
pub use cli::{GemPlotting, GemPlottingError};
pub use gain::{estimate_effective_gains, EffectiveGain, FitParameters, GainCurve};
pub use overlay::{AxisSpec, Comparison, Curve, Legend, LegendEntry, Overlay};
pub use scans::{ScanDescriptor, ScanList};

use crossbeam_utils::atomic::AtomicCell;

/// Should progress bars be drawn? This is set by the CLI.
pub(crate) static PROGRESS_BARS: AtomicCell<bool> = AtomicCell::new(false);
