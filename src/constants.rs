// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All physical constants *must* be double precision.
 */

/// The drift voltages [V] at which the effective gain is evaluated. The MPV
/// charge measurements these are paired with are documented at
/// <https://cds.cern.ch/record/2298721/>.
pub const DRIFT_VOLTAGES: [f64; 9] = [
    3000.0, 3050.0, 3100.0, 3150.0, 3200.0, 3250.0, 3300.0, 3350.0, 3400.0,
];

/// The resistance of the high-voltage divider chain [Ohm].
pub const DIVIDER_RESISTANCE: f64 = 5_000_000.0;

/// The number of VFATs (front-end readout chips) on a single detector.
pub const NUM_VFATS: usize = 24;

/// The name of the file produced by an S-bit rate scan inside its scandate
/// directory.
pub const SBIT_RATE_FILE_NAME: &str = "SBitRatePlots.fits";

/// The directory, relative to a chamber's data directory, containing S-bit
/// rate scans taken in OR mode.
pub const SBIT_RATE_OR_DIR: &str = "sbitRate/orMode";

/// The environment variable pointing at the base data directory.
pub const DATA_PATH_ENV: &str = "DATA_PATH";

/// The environment variable pointing at the output (e-log) directory.
pub const ELOG_PATH_ENV: &str = "ELOG_PATH";

/// The default name of the threshold DAC.
pub const THR_ARM_DAC_NAME: &str = "CFG_THR_ARM_DAC";

/// The lower end of the rate axis [Hz].
pub const RATE_AXIS_MIN: f64 = 1e-1;

/// The upper end of the rate axis [Hz]. The S-bit rate saturates at 40 MHz.
pub const RATE_AXIS_MAX: f64 = 5e8;

/// The upper end of the threshold axis when it is in DAC units.
pub const DAC_AXIS_MAX: f64 = 125.0;

/// The upper end of the threshold axis when it is in charge units [fC].
pub const CHARGE_AXIS_MAX: f64 = 20.0;

/// The number of rows in the summary grid.
pub const SUMMARY_ROWS: usize = 3;

/// The number of columns in the summary grid.
pub const SUMMARY_COLS: usize = 8;
