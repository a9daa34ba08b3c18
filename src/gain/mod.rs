// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Effective-gain estimation.
//!
//! A measured gain vs. divider current curve is fit with an exponential
//! `gain = exp(b) * exp(m * current)` (i.e. a linear least-squares fit of
//! `ln(gain)` against `current`), and the fit is evaluated at the divider
//! currents corresponding to [`DRIFT_VOLTAGES`].

mod error;
#[cfg(test)]
mod tests;

pub use error::GainError;

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use compute::predict::PolynomialRegressor;
use itertools::Itertools;
use log::{debug, trace};
use ndarray::prelude::*;

use crate::constants::{DIVIDER_RESISTANCE, DRIFT_VOLTAGES};

/// Samples of gain against divider current. Construction validates that the
/// curve can be fit.
#[derive(Debug, Clone)]
pub struct GainCurve {
    /// Divider currents [A].
    currents: Array1<f64>,

    /// Effective gains at each of the currents. All strictly positive.
    gains: Array1<f64>,
}

/// The parameters of `ln(gain) = slope * current + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitParameters {
    pub slope: f64,
    pub intercept: f64,
}

impl FitParameters {
    /// Evaluate the exponential at a divider current.
    pub fn evaluate(&self, current: f64) -> f64 {
        self.intercept.exp() * (self.slope * current).exp()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveGain {
    /// [V]
    pub drift_voltage: f64,

    /// [A]
    pub divider_current: f64,

    pub gain: f64,
}

impl GainCurve {
    pub fn new(currents: Vec<f64>, gains: Vec<f64>) -> Result<GainCurve, GainError> {
        if currents.len() != gains.len() {
            return Err(GainError::LengthMismatch {
                currents: currents.len(),
                gains: gains.len(),
            });
        }
        if let Some((index, &current)) = currents.iter().find_position(|c| !c.is_finite()) {
            return Err(GainError::NonFiniteCurrent { index, current });
        }
        if let Some((index, &gain)) = gains
            .iter()
            .find_position(|g| !g.is_finite() || **g <= 0.0)
        {
            return Err(GainError::NonPositiveGain { index, gain });
        }
        let num_distinct = currents
            .iter()
            .copied()
            .sorted_by(f64::total_cmp)
            .dedup()
            .count();
        if num_distinct < 2 {
            return Err(GainError::Underdetermined(num_distinct));
        }

        Ok(GainCurve {
            currents: Array1::from(currents),
            gains: Array1::from(gains),
        })
    }

    /// Read a gain curve from a text file. Each line has a current and a gain
    /// separated by whitespace (or a comma). Anything after a `#` is ignored,
    /// as are blank lines and a non-numeric header on the first data line.
    pub fn read_text<P: AsRef<Path>>(file: P) -> Result<GainCurve, GainError> {
        let file = file.as_ref();
        debug!("Reading gain curve from {}", file.display());
        let io_err = |err| GainError::IO {
            file: file.to_path_buf(),
            err,
        };

        let reader = BufReader::new(File::open(file).map_err(io_err)?);
        let mut currents = vec![];
        let mut gains = vec![];
        let mut seen_data = false;
        for (i_line, line) in reader.lines().enumerate() {
            let line = line.map_err(io_err)?;
            let text = match line.split_once('#') {
                Some((before, _)) => before,
                None => line.as_str(),
            }
            .trim();
            if text.is_empty() {
                continue;
            }

            let parsed = text
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<f64>())
                .collect::<Result<Vec<_>, _>>();
            match parsed.as_deref() {
                Ok([current, gain]) => {
                    currents.push(*current);
                    gains.push(*gain);
                    seen_data = true;
                }
                // Allow a single header line before any data.
                Err(_) if !seen_data => {
                    trace!("Skipping header line '{text}'");
                    seen_data = true;
                }
                _ => {
                    return Err(GainError::Parse {
                        file: file.to_path_buf(),
                        line: i_line + 1,
                        text: text.to_string(),
                    })
                }
            }
        }

        GainCurve::new(currents, gains)
    }

    pub fn len(&self) -> usize {
        self.currents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currents.is_empty()
    }

    pub fn currents(&self) -> ArrayView1<'_, f64> {
        self.currents.view()
    }

    pub fn gains(&self) -> ArrayView1<'_, f64> {
        self.gains.view()
    }

    /// Ordinary least-squares fit of `ln(gain)` against `current`.
    ///
    /// Currents are standardised before the regression; divider currents are
    /// ~1e-4 A, and the normal equations of the raw values are badly
    /// conditioned.
    pub fn fit(&self) -> FitParameters {
        let log_gains = self.gains.mapv(f64::ln);
        // The curve has at least 2 distinct currents, so the mean exists and
        // the scale is non-zero.
        let mean_current = self.currents.mean().unwrap_or_default();
        let scale = self.currents.std(0.0);
        let standardised = self.currents.mapv(|c| (c - mean_current) / scale);

        let mut regressor = PolynomialRegressor::new(1);
        regressor.fit(&standardised.to_vec(), &log_gains.to_vec());
        trace!("Standardised gain fit coefficients: {:?}", regressor.coef);
        let (c0, c1) = (regressor.coef[0], regressor.coef[1]);

        let slope = c1 / scale;
        let intercept = c0 - slope * mean_current;
        trace!("Gain fit: slope {slope}, intercept {intercept}");
        FitParameters { slope, intercept }
    }
}

/// The current through the high-voltage divider for a drift voltage, by Ohm's
/// law.
pub fn divider_current(drift_voltage: f64) -> f64 {
    drift_voltage / DIVIDER_RESISTANCE
}

/// Fit the gain curve and evaluate the effective gain at each of the fixed
/// drift voltages. The results are in the same order as [`DRIFT_VOLTAGES`].
pub fn estimate_effective_gains(curve: &GainCurve) -> (FitParameters, [EffectiveGain; 9]) {
    let fit = curve.fit();
    let gains = DRIFT_VOLTAGES.map(|drift_voltage| {
        let divider_current = divider_current(drift_voltage);
        EffectiveGain {
            drift_voltage,
            divider_current,
            gain: fit.evaluate(divider_current),
        }
    });
    (fit, gains)
}
