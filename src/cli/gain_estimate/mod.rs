// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.


use std::path::PathBuf;

use clap::Parser;
use log::{debug, info};

use super::common::InfoPrinter;
use crate::{
    gain::{estimate_effective_gains, EffectiveGain, GainCurve},
    GemPlottingError,
};

#[derive(Parser, Debug, Clone)]
pub(super) struct GainEstimateArgs {
    /// A text file of (divider current [A], effective gain) pairs, one pair
    /// per line. Columns may be separated by whitespace or a comma, and
    /// anything after a '#' is ignored.
    #[clap(name = "GAIN_CURVE_FILE", parse(from_os_str))]
    pub(super) gain_curve_file: PathBuf,
}

impl GainEstimateArgs {
    pub(super) fn run(self, dry_run: bool) -> Result<(), GemPlottingError> {
        debug!("{:#?}", self);

        let curve = GainCurve::read_text(&self.gain_curve_file)?;
        let mut printer = InfoPrinter::new("Estimating effective gains".into());
        printer.push_block(vec![
            format!("Gain curve: {}", self.gain_curve_file.display()).into(),
            format!("{} samples", curve.len()).into(),
        ]);
        printer.display();

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        let (fit, gains) = estimate_effective_gains(&curve);
        let mut printer = InfoPrinter::new("Fit of ln(gain) vs. divider current".into());
        printer.push_block(vec![
            format!("slope:     {:.6e} / A", fit.slope).into(),
            format!("intercept: {:.6}", fit.intercept).into(),
        ]);
        printer.display();

        for line in gain_table(&gains) {
            info!("{line}");
        }
        Ok(())
    }
}

/// A header line, then a line per drift voltage.
fn gain_table(gains: &[EffectiveGain]) -> Vec<String> {
    let mut lines = Vec::with_capacity(gains.len() + 1);
    lines.push(format!(
        "{:>14} {:>14} {:>14}",
        "Drift HV [V]", "Current [uA]", "Eff. gain"
    ));
    for g in gains {
        lines.push(format!(
            "{:>14.0} {:>14.2} {:>14.1}",
            g.drift_voltage,
            g.divider_current * 1e6,
            g.gain
        ));
    }
    lines
}
