// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.


use std::{borrow::Cow, path::PathBuf};

use clap::Parser;
use itertools::Itertools;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::common::{display_warnings, InfoPrinter, Warn, ARG_FILE_HELP};
use crate::{
    calibration::parse_arm_dac_cal_file,
    constants::{DATA_PATH_ENV, ELOG_PATH_ENV, NUM_VFATS},
    params::SbitThreshCompParams,
    scans::parse_list_of_scan_dates,
    GemPlottingError,
};

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct SbitThreshCompArgs {
    #[clap(long, help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    /// Tab-delimited file listing the scans to compare. The header names the
    /// columns (chamber name, scandate, and the quantity the labels describe,
    /// e.g. CFG_THR_ARM_DAC), and each following line is a single scan.
    #[clap(name = "FILENAME", parse(from_os_str))]
    pub(super) filename: Option<PathBuf>,

    /// Allow the labels of the scans to be alphanumeric. By default, they must
    /// be numbers.
    #[clap(short, long, alias = "alphaLabels")]
    #[serde(default)]
    pub(super) alpha_labels: bool,

    /// A file of ARM DAC calibrations (charge = quartic of CFG_THR_ARM_DAC),
    /// one line per VFAT. If given, thresholds are plotted as charge [fC].
    #[clap(short = 'c', long, alias = "calFileARM", parse(from_os_str))]
    pub(super) cal_file_arm: Option<PathBuf>,

    /// Don't draw legends.
    #[clap(short, long, alias = "noLeg")]
    #[serde(default)]
    pub(super) no_leg: bool,

    /// Also write a PNG of every VFAT's comparison. The summary of all VFATs
    /// is always written.
    #[clap(short, long, alias = "savePlots")]
    #[serde(default)]
    pub(super) save_plots: bool,
}

impl SbitThreshCompArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<SbitThreshCompArgs, GemPlottingError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Read in the file arguments. Ensure all of the file args are
            // accounted for by pattern matching.
            let SbitThreshCompArgs {
                args_file: _,
                filename,
                alpha_labels,
                cal_file_arm,
                no_leg,
                save_plots,
            } = unpack_arg_file!(arg_file);

            // Merge all the arguments, preferring the CLI args when available.
            Ok(SbitThreshCompArgs {
                args_file: None,
                filename: cli_args.filename.or(filename),
                alpha_labels: cli_args.alpha_labels || alpha_labels,
                cal_file_arm: cli_args.cal_file_arm.or(cal_file_arm),
                no_leg: cli_args.no_leg || no_leg,
                save_plots: cli_args.save_plots || save_plots,
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn parse(self) -> Result<SbitThreshCompParams, GemPlottingError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            filename,
            alpha_labels,
            cal_file_arm,
            no_leg,
            save_plots,
        } = self;

        let scan_list_file = filename.ok_or(SbitThreshCompArgsError::NoScanList)?;
        let data_path = env_dir(DATA_PATH_ENV)?;
        let elog_path = env_dir(ELOG_PATH_ENV)?;

        let scan_list = parse_list_of_scan_dates(&scan_list_file, alpha_labels)?;
        let chambers = scan_list
            .descriptors
            .iter()
            .map(|d| d.chamber.as_str())
            .unique()
            .collect::<Vec<_>>();
        if chambers.len() > 1 {
            format!(
                "The list of scandates has scans of {} chambers ({}); outputs are named after {}",
                chambers.len(),
                chambers.iter().join(", "),
                scan_list.chamber()
            )
            .warn();
        }

        let calibrations = match &cal_file_arm {
            Some(file) => {
                let calibrations = parse_arm_dac_cal_file(file)?;
                calibrations.check_complete(NUM_VFATS)?;
                if calibrations.len() > NUM_VFATS {
                    format!(
                        "The ARM DAC calibration file has {} VFATs, but only the first {NUM_VFATS} are used",
                        calibrations.len()
                    )
                    .warn();
                }
                Some(calibrations)
            }
            None => None,
        };

        let mut printer = InfoPrinter::new("Comparing S-bit threshold scans".into());
        let mut block: Vec<Cow<'static, str>> = vec![format!(
            "{} scans of {} from {}",
            scan_list.len(),
            scan_list.chamber(),
            scan_list_file.display()
        )
        .into()];
        block.extend(scan_list.descriptors.iter().map(|d| {
            format!("{}: {} = {}", d.scandate, scan_list.thr_dac_name, d.label).into()
        }));
        printer.push_block(block);
        printer.push_line(match &cal_file_arm {
            Some(file) => format!("Thresholds in charge, calibrated by {}", file.display()).into(),
            None => "Thresholds in DAC units".into(),
        });
        printer.push_block(vec![
            format!("Scans from:    {}", data_path.display()).into(),
            format!("Outputs to:    {}", elog_path.display()).into(),
        ]);
        if no_leg {
            printer.push_line("No legends".into());
        }
        if save_plots {
            printer.push_line("Saving a plot of every VFAT".into());
        }
        printer.display();
        display_warnings();

        Ok(SbitThreshCompParams {
            scan_list_file,
            scan_list,
            calibrations,
            data_path,
            elog_path,
            show_legend: !no_leg,
            save_plots,
        })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), GemPlottingError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        let outputs = params.run()?;
        debug!(
            "Wrote {} and {} PNG(s)",
            outputs.container.display(),
            outputs.pngs.len()
        );
        Ok(())
    }
}

/// A directory named by an environment variable. Unset and empty are the same.
fn env_dir(var: &'static str) -> Result<PathBuf, SbitThreshCompArgsError> {
    match std::env::var_os(var) {
        Some(value) if !value.is_empty() => Ok(PathBuf::from(value)),
        _ => Err(SbitThreshCompArgsError::MissingEnv(var)),
    }
}

#[derive(thiserror::Error, Debug)]
pub(super) enum SbitThreshCompArgsError {
    #[error("No list of scandates was specified")]
    NoScanList,

    #[error("The environment variable {0} isn't set; {DATA_PATH_ENV} must point at the scan data and {ELOG_PATH_ENV} at where outputs are written")]
    MissingEnv(&'static str),
}
