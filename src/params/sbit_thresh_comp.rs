// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, info};

use crate::{
    calibration::{CalibrationError, CalibrationTable},
    io::{
        container::{self, Canvas, ContainerError},
        result_file::{self, ResultFileError},
    },
    overlay::{Comparison, ThresholdScan},
    scans::ScanList,
    PROGRESS_BARS,
};

pub(crate) struct SbitThreshCompParams {
    /// The file the scan list came from. Only used for reporting.
    pub(crate) scan_list_file: PathBuf,

    pub(crate) scan_list: ScanList,

    /// If available, thresholds are converted into charge.
    pub(crate) calibrations: Option<CalibrationTable>,

    /// Where scan results are found.
    pub(crate) data_path: PathBuf,

    /// Where outputs are written.
    pub(crate) elog_path: PathBuf,

    pub(crate) show_legend: bool,

    /// Write a PNG for every VFAT, not just the summary.
    pub(crate) save_plots: bool,
}

/// The files written by [`SbitThreshCompParams::run`].
#[derive(Debug)]
pub(crate) struct SbitThreshCompOutputs {
    pub(crate) container: PathBuf,
    pub(crate) pngs: Vec<PathBuf>,
}

impl SbitThreshCompParams {
    pub(crate) fn run(&self) -> Result<SbitThreshCompOutputs, SbitThreshCompError> {
        // Everything is read before anything is written, so a bad scan leaves
        // no outputs behind.
        let scans = self.load_scans()?;
        let comparison = self.compare(scans)?;
        let canvases = render(&comparison, self.show_legend)?;

        std::fs::create_dir_all(&self.elog_path)?;
        let container = container::container_path(&self.elog_path, self.scan_list.chamber());
        container::write(&container, &comparison, &canvases)?;
        let pngs = save_pngs(&canvases, &self.elog_path, self.save_plots)?;

        info!("You can find all comparison data in:");
        info!("    {}", container.display());
        info!("You can find all plots in:");
        info!("    {}", self.elog_path.display());

        Ok(SbitThreshCompOutputs { container, pngs })
    }

    /// Read the result file of every scan, in list order.
    pub(crate) fn load_scans(&self) -> Result<Vec<ThresholdScan>, SbitThreshCompError> {
        let progress = ProgressBar::with_draw_target(
            Some(self.scan_list.len() as u64),
            if PROGRESS_BARS.load() {
                ProgressDrawTarget::stdout()
            } else {
                ProgressDrawTarget::hidden()
            },
        )
        .with_style(
            ProgressStyle::with_template(
                "{msg:18}: [{wide_bar:.blue}] {pos:2}/{len:2} scans ({elapsed_precise}<{eta_precise})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
        )
        .with_position(0)
        .with_message("Loading scans");

        let mut scans = Vec::with_capacity(self.scan_list.len());
        for descriptor in &self.scan_list.descriptors {
            let scandate_dir = descriptor.scandate_dir(&self.data_path);
            if !scandate_dir.is_dir() {
                progress.abandon();
                return Err(SbitThreshCompError::MissingScan {
                    dir: scandate_dir,
                    scan_list: self.scan_list_file.clone(),
                });
            }
            let file = descriptor.result_path(&self.data_path);
            let scan = result_file::read(&file).map_err(|err| {
                progress.abandon();
                SbitThreshCompError::ResultFile {
                    scan_list: self.scan_list_file.clone(),
                    err,
                }
            })?;
            scans.push(scan);
            progress.inc(1);
        }
        progress.finish_with_message("Loaded scans");
        Ok(scans)
    }

    /// Overlay the scans, converting thresholds into charge if calibrations are
    /// available.
    pub(crate) fn compare(
        &self,
        scans: Vec<ThresholdScan>,
    ) -> Result<Comparison, SbitThreshCompError> {
        let mut comparison = Comparison::new(
            self.scan_list.chamber().to_string(),
            self.scan_list.thr_dac_name.clone(),
            self.calibrations.is_some(),
        );
        for (descriptor, scan) in self.scan_list.descriptors.iter().zip(scans) {
            comparison.add_scan(descriptor, scan, self.calibrations.as_ref())?;
        }
        debug!(
            "Overlaid {} scans for chamber {}",
            comparison.num_scans(),
            comparison.chamber
        );
        Ok(comparison)
    }
}

/// Render a canvas per VFAT and the summary grid (last).
#[cfg(feature = "plotting")]
fn render(comparison: &Comparison, show_legend: bool) -> Result<Vec<Canvas>, SbitThreshCompError> {
    use crate::plotting::{render_overlay, render_summary};

    let mut canvases = Vec::with_capacity(comparison.overlays.len() + 1);
    for overlay in &comparison.overlays {
        canvases.push(render_overlay(comparison, overlay, show_legend)?);
    }
    canvases.push(render_summary(comparison, show_legend)?);
    Ok(canvases)
}

#[cfg(not(feature = "plotting"))]
fn render(_: &Comparison, _: bool) -> Result<Vec<Canvas>, SbitThreshCompError> {
    Err(SbitThreshCompError::NoPlottingFeature)
}

/// The summary is always written as a PNG. The per-VFAT canvases only are if
/// `save_plots` is true.
#[cfg(feature = "plotting")]
fn save_pngs(
    canvases: &[Canvas],
    dir: &Path,
    save_plots: bool,
) -> Result<Vec<PathBuf>, SbitThreshCompError> {
    use crate::plotting::{save_png, SUMMARY_CANVAS_NAME};

    let mut pngs = vec![];
    for canvas in canvases {
        if save_plots || canvas.name == SUMMARY_CANVAS_NAME {
            let png = save_png(canvas, dir)?;
            debug!("Wrote {}", png.display());
            pngs.push(png);
        }
    }
    Ok(pngs)
}

#[cfg(not(feature = "plotting"))]
fn save_pngs(_: &[Canvas], _: &Path, _: bool) -> Result<Vec<PathBuf>, SbitThreshCompError> {
    Err(SbitThreshCompError::NoPlottingFeature)
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum SbitThreshCompError {
    #[error("The scan directory {dir} doesn't exist!\nPlease cross-check your list of scandates: {scan_list}")]
    MissingScan { dir: PathBuf, scan_list: PathBuf },

    #[error("{err}\nPlease double check your list of scandates: {scan_list}")]
    ResultFile {
        scan_list: PathBuf,
        err: ResultFileError,
    },

    #[cfg(not(feature = "plotting"))]
    #[error("gemplotting was not compiled with the \"plotting\" feature.\nYou need to compile gemplotting with this feature to compare threshold scans.")]
    NoPlottingFeature,

    #[cfg(feature = "plotting")]
    #[error(transparent)]
    Draw(#[from] crate::plotting::DrawError),

    #[error(transparent)]
    Calibration(#[from] CalibrationError),

    #[error(transparent)]
    Container(#[from] ContainerError),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
