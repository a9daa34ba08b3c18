// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The data model of a threshold-scan comparison.
//!
//! Every scan contributes one [`Curve`] (S-bit rate vs. threshold) to the
//! [`Overlay`] of each VFAT, tagged with the position of the scan in the list
//! of scandates. Rendering and persistence only ever see a finished
//! [`Comparison`].


use log::{debug, trace};

use crate::{
    calibration::{CalibrationError, CalibrationTable},
    constants::{
        CHARGE_AXIS_MAX, DAC_AXIS_MAX, NUM_VFATS, RATE_AXIS_MAX, RATE_AXIS_MIN, THR_ARM_DAC_NAME,
    },
    scans::ScanDescriptor,
};

/// The per-VFAT curves of a single threshold scan, as read from its result
/// file. Points are (threshold, rate).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThresholdScan {
    pub vfats: [Vec<(f64, f64)>; NUM_VFATS],
}

#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    /// The position of the scan that made this curve in the list of
    /// scandates. Colours and markers are chosen with this.
    pub style_index: usize,

    /// (threshold, rate)
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub vfat: usize,
    pub curves: Vec<Curve>,
}

impl Overlay {
    pub fn new(vfat: usize) -> Overlay {
        Overlay {
            vfat,
            curves: vec![],
        }
    }

    /// The title drawn on this overlay's plots.
    pub fn title(&self) -> String {
        format!("VFAT{}", self.vfat)
    }

    /// The name of the canvas this overlay is drawn on.
    pub fn canvas_name(&self) -> String {
        format!("canvSBitRate_VFAT{}", self.vfat)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub style_index: usize,
    pub label: String,
    pub scandate: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisSpec {
    pub title: String,
    pub unit: String,
    pub min: f64,
    pub max: f64,
    pub log: bool,
}

impl AxisSpec {
    /// The threshold axis in DAC units.
    pub fn threshold_dac() -> AxisSpec {
        AxisSpec {
            title: THR_ARM_DAC_NAME.to_string(),
            unit: "DAC".to_string(),
            min: 0.0,
            max: DAC_AXIS_MAX,
            log: false,
        }
    }

    /// The threshold axis in charge units.
    pub fn threshold_charge() -> AxisSpec {
        AxisSpec {
            title: "Threshold".to_string(),
            unit: "fC".to_string(),
            min: 0.0,
            max: CHARGE_AXIS_MAX,
            log: false,
        }
    }

    pub fn rate() -> AxisSpec {
        AxisSpec {
            title: "Rate".to_string(),
            unit: "Hz".to_string(),
            min: RATE_AXIS_MIN,
            max: RATE_AXIS_MAX,
            log: true,
        }
    }

    /// e.g. "Rate (Hz)"
    pub fn label(&self) -> String {
        format!("{} ({})", self.title, self.unit)
    }
}

/// All of the scans of a list of scandates, overlaid per VFAT.
#[derive(Debug, Clone)]
pub struct Comparison {
    /// The chamber of the first scan.
    pub chamber: String,

    /// What the scan labels describe.
    pub thr_dac_name: String,

    pub overlays: [Overlay; NUM_VFATS],

    pub legend: Legend,

    pub x_axis: AxisSpec,

    pub y_axis: AxisSpec,

    /// Were thresholds converted into charge?
    pub calibrated: bool,
}

impl Comparison {
    pub fn new(chamber: String, thr_dac_name: String, calibrated: bool) -> Comparison {
        Comparison {
            chamber,
            thr_dac_name,
            overlays: std::array::from_fn(Overlay::new),
            legend: Legend::default(),
            x_axis: if calibrated {
                AxisSpec::threshold_charge()
            } else {
                AxisSpec::threshold_dac()
            },
            y_axis: AxisSpec::rate(),
            calibrated,
        }
    }

    /// The number of scans added so far.
    pub fn num_scans(&self) -> usize {
        self.legend.entries.len()
    }

    /// Add the curves of the next scan in the list. If `calibrations` is
    /// given, each VFAT's thresholds are converted into charge with its own
    /// calibration.
    pub fn add_scan(
        &mut self,
        descriptor: &ScanDescriptor,
        scan: ThresholdScan,
        calibrations: Option<&CalibrationTable>,
    ) -> Result<(), CalibrationError> {
        if let Some(calibrations) = calibrations {
            calibrations.check_complete(NUM_VFATS)?;
        }
        let style_index = self.num_scans();
        debug!(
            "Adding scan {} ({}) with style {style_index}",
            descriptor.scandate, descriptor.label
        );

        for (vfat, (overlay, mut points)) in self.overlays.iter_mut().zip(scan.vfats).enumerate()
        {
            if let Some(calibrations) = calibrations {
                calibrations.get(vfat)?.apply_to_points(&mut points);
            }
            trace!("VFAT {vfat}: {} points", points.len());
            overlay.curves.push(Curve {
                style_index,
                points,
            });

            // Only one legend entry per scan.
            if vfat == 0 {
                self.legend.entries.push(LegendEntry {
                    style_index,
                    label: format!("{} = {}", self.thr_dac_name, descriptor.label),
                    scandate: descriptor.scandate.clone(),
                });
            }
        }

        Ok(())
    }
}
