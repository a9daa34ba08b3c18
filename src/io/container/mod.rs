// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to read and write threshold-scan comparison containers.
//!
//! A container is a FITS file. Its primary HDU describes the comparison
//! (chamber, axes, number of scans) in header keys. It is followed by
//!
//! - a `LEGEND` binary table (`STYLE`, `LABEL`, `SCANDATE`);
//! - a `VFAT{n}` binary table per VFAT (`SCAN`, `THRESHOLD`, `RATE`), one row
//!   per point, where `SCAN` is the style index of the curve the point belongs
//!   to;
//! - an 8-bit RGB image HDU per rendered canvas, named after the canvas.

mod error;
#[cfg(test)]
mod tests;

pub use error::ContainerError;

use std::path::{Path, PathBuf};

use fitsio::{
    images::{ImageDescription, ImageType},
    tables::{ColumnDataType, ColumnDescription},
    FitsFile,
};
use log::{debug, trace};

use super::fits::*;
use crate::{
    constants::NUM_VFATS,
    overlay::{AxisSpec, Comparison, Curve, Legend, LegendEntry},
};

/// A rendered plot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    /// The name of the image HDU this canvas is stored in.
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// 8-bit RGB, row-major, top row first.
    pub pixels: Vec<u8>,
}

impl Canvas {
    fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

/// Where the comparison of a chamber's scans is written.
pub fn container_path(elog_path: &Path, chamber: &str) -> PathBuf {
    elog_path.join(format!("compSbitThresh_{chamber}.fits"))
}

/// The name of the binary table holding the overlay of `vfat`.
pub fn vfat_table_name(vfat: usize) -> String {
    format!("VFAT{vfat}")
}

fn write_axis(
    fptr: &mut FitsFile,
    hdu: &fitsio::hdu::FitsHdu,
    prefix: char,
    axis: &AxisSpec,
) -> Result<(), fitsio::errors::Error> {
    hdu.write_key(fptr, &format!("{prefix}TITLE"), axis.title.as_str())?;
    hdu.write_key(fptr, &format!("{prefix}UNIT"), axis.unit.as_str())?;
    hdu.write_key(fptr, &format!("{prefix}MIN"), axis.min)?;
    hdu.write_key(fptr, &format!("{prefix}MAX"), axis.max)?;
    hdu.write_key(fptr, &format!("LOG{prefix}"), i64::from(axis.log))?;
    Ok(())
}

fn read_axis(
    fptr: &mut FitsFile,
    hdu: &fitsio::hdu::FitsHdu,
    prefix: char,
) -> Result<AxisSpec, FitsError> {
    let log: i64 = fits_get_required_key(fptr, hdu, &format!("LOG{prefix}"))?;
    Ok(AxisSpec {
        title: fits_get_required_key(fptr, hdu, &format!("{prefix}TITLE"))?,
        unit: fits_get_required_key(fptr, hdu, &format!("{prefix}UNIT"))?,
        min: fits_get_required_key(fptr, hdu, &format!("{prefix}MIN"))?,
        max: fits_get_required_key(fptr, hdu, &format!("{prefix}MAX"))?,
        log: log != 0,
    })
}

/// Write a comparison and its rendered canvases to a new container,
/// clobbering anything already at `file`. The file is closed when this
/// function returns, whether it succeeded or not.
pub fn write(
    file: &Path,
    comparison: &Comparison,
    canvases: &[Canvas],
) -> Result<(), ContainerError> {
    // Don't create anything if a canvas is malformed.
    for canvas in canvases {
        if canvas.pixels.len() != canvas.expected_len() {
            return Err(ContainerError::BadCanvas {
                name: canvas.name.clone(),
                expected: canvas.expected_len(),
                found: canvas.pixels.len(),
            });
        }
    }

    debug!("Writing comparison container {}", file.display());
    if file.exists() {
        std::fs::remove_file(file)?;
    }
    let mut fptr = FitsFile::create(file).open()?;
    let hdu = fits_open_hdu(&mut fptr, 0)?;

    hdu.write_key(&mut fptr, "CHAMBER", comparison.chamber.as_str())?;
    hdu.write_key(&mut fptr, "THRDAC", comparison.thr_dac_name.as_str())?;
    hdu.write_key(&mut fptr, "NSCANS", comparison.num_scans() as i64)?;
    hdu.write_key(&mut fptr, "NVFATS", NUM_VFATS as i64)?;
    write_axis(&mut fptr, &hdu, 'X', &comparison.x_axis)?;
    write_axis(&mut fptr, &hdu, 'Y', &comparison.y_axis)?;
    hdu.write_key(&mut fptr, "CALIB", i64::from(comparison.calibrated))?;
    hdu.write_key(
        &mut fptr,
        "SOFTWARE",
        format!(
            "Created by {} v{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        ),
    )?;

    // Legend ("LEGEND" HDU).
    {
        let entries = &comparison.legend.entries;
        // String columns need a width of at least 1.
        let label_width = entries.iter().map(|e| e.label.len()).max().unwrap_or(0).max(1);
        let scandate_width = entries
            .iter()
            .map(|e| e.scandate.len())
            .max()
            .unwrap_or(0)
            .max(1);
        let style_col = ColumnDescription::new("STYLE")
            .with_type(ColumnDataType::Int)
            .create()?;
        let label_col = ColumnDescription::new("LABEL")
            .with_type(ColumnDataType::String)
            .that_repeats(label_width)
            .create()?;
        let scandate_col = ColumnDescription::new("SCANDATE")
            .with_type(ColumnDataType::String)
            .that_repeats(scandate_width)
            .create()?;
        let hdu = fptr.create_table("LEGEND", &[style_col, label_col, scandate_col])?;
        hdu.write_col(
            &mut fptr,
            "STYLE",
            &entries
                .iter()
                .map(|e| e.style_index as i32)
                .collect::<Vec<_>>(),
        )?;
        hdu.write_col(
            &mut fptr,
            "LABEL",
            &entries.iter().map(|e| e.label.clone()).collect::<Vec<_>>(),
        )?;
        hdu.write_col(
            &mut fptr,
            "SCANDATE",
            &entries
                .iter()
                .map(|e| e.scandate.clone())
                .collect::<Vec<_>>(),
        )?;
    }

    // Overlays ("VFAT{n}" HDUs).
    for overlay in &comparison.overlays {
        let scan_col = ColumnDescription::new("SCAN")
            .with_type(ColumnDataType::Int)
            .create()?;
        let threshold_col = ColumnDescription::new("THRESHOLD")
            .with_type(ColumnDataType::Double)
            .create()?;
        let rate_col = ColumnDescription::new("RATE")
            .with_type(ColumnDataType::Double)
            .create()?;
        let hdu = fptr.create_table(
            vfat_table_name(overlay.vfat),
            &[scan_col, threshold_col, rate_col],
        )?;

        let num_points = overlay.curves.iter().map(|c| c.points.len()).sum();
        let mut scans = Vec::with_capacity(num_points);
        let mut thresholds = Vec::with_capacity(num_points);
        let mut rates = Vec::with_capacity(num_points);
        for curve in &overlay.curves {
            for &(threshold, rate) in &curve.points {
                scans.push(curve.style_index as i32);
                thresholds.push(threshold);
                rates.push(rate);
            }
        }
        trace!("VFAT {}: writing {num_points} points", overlay.vfat);
        hdu.write_col(&mut fptr, "SCAN", &scans)?;
        hdu.write_col(&mut fptr, "THRESHOLD", &thresholds)?;
        hdu.write_col(&mut fptr, "RATE", &rates)?;
    }

    // Canvases.
    for canvas in canvases {
        let dim = [canvas.height as usize, canvas.width as usize, 3];
        let image_description = ImageDescription {
            data_type: ImageType::UnsignedByte,
            dimensions: &dim,
        };
        let hdu = fptr.create_image(canvas.name.as_str(), &image_description)?;
        hdu.write_image(&mut fptr, &canvas.pixels)?;
    }

    Ok(())
}

/// Read a comparison back out of a container.
pub fn read(file: &Path) -> Result<Comparison, ContainerError> {
    debug!("Reading comparison container {}", file.display());
    let mut fptr = fits_open(file)?;
    let hdu = fits_open_hdu(&mut fptr, 0)?;

    let chamber: String = fits_get_required_key(&mut fptr, &hdu, "CHAMBER")?;
    let thr_dac_name: String = fits_get_required_key(&mut fptr, &hdu, "THRDAC")?;
    let num_scans: usize = fits_get_required_key(&mut fptr, &hdu, "NSCANS")?;
    let num_vfats: usize = fits_get_required_key(&mut fptr, &hdu, "NVFATS")?;
    if num_vfats != NUM_VFATS {
        return Err(ContainerError::VfatCount {
            file: file.to_path_buf(),
            expected: NUM_VFATS,
            found: num_vfats,
        });
    }
    let calibrated: i64 = fits_get_required_key(&mut fptr, &hdu, "CALIB")?;
    let x_axis = read_axis(&mut fptr, &hdu, 'X')?;
    let y_axis = read_axis(&mut fptr, &hdu, 'Y')?;

    let mut comparison = Comparison::new(chamber, thr_dac_name, calibrated != 0);
    comparison.x_axis = x_axis;
    comparison.y_axis = y_axis;

    let hdu = fits_open_hdu(&mut fptr, "LEGEND")?;
    let styles: Vec<i32> = fits_get_col(&mut fptr, &hdu, "STYLE")?;
    let labels: Vec<String> = fits_get_col(&mut fptr, &hdu, "LABEL")?;
    let scandates: Vec<String> = fits_get_col(&mut fptr, &hdu, "SCANDATE")?;
    if styles.len() != labels.len() || styles.len() != scandates.len() {
        return Err(ContainerError::BadShape {
            file: file.to_path_buf(),
            thing: "LEGEND",
        });
    }
    comparison.legend = Legend {
        entries: styles
            .into_iter()
            .zip(labels)
            .zip(scandates)
            .map(|((style, label), scandate)| LegendEntry {
                style_index: style as usize,
                label,
                scandate,
            })
            .collect(),
    };

    for overlay in comparison.overlays.iter_mut() {
        let hdu = fits_open_hdu(&mut fptr, vfat_table_name(overlay.vfat).as_str())?;
        let scans: Vec<i32> = fits_get_col(&mut fptr, &hdu, "SCAN")?;
        let thresholds: Vec<f64> = fits_get_col(&mut fptr, &hdu, "THRESHOLD")?;
        let rates: Vec<f64> = fits_get_col(&mut fptr, &hdu, "RATE")?;
        if scans.len() != thresholds.len() || scans.len() != rates.len() {
            return Err(ContainerError::BadShape {
                file: file.to_path_buf(),
                thing: "VFAT",
            });
        }

        // Every scan has a curve, even if it has no points.
        overlay.curves = (0..num_scans)
            .map(|style_index| Curve {
                style_index,
                points: vec![],
            })
            .collect();
        for ((scan, threshold), rate) in scans.into_iter().zip(thresholds).zip(rates) {
            match usize::try_from(scan)
                .ok()
                .and_then(|s| overlay.curves.get_mut(s))
            {
                Some(curve) => curve.points.push((threshold, rate)),
                None => {
                    return Err(ContainerError::BadScanIndex {
                        file: file.to_path_buf(),
                        vfat: overlay.vfat,
                        scan,
                        num_scans,
                    })
                }
            }
        }
    }

    Ok(comparison)
}

/// Read a rendered canvas out of a container, if it's there.
pub fn read_canvas(file: &Path, name: &str) -> Result<Option<Canvas>, ContainerError> {
    let mut fptr = fits_open(file)?;
    let hdu = match fits_open_optional_hdu(&mut fptr, name)? {
        Some(hdu) => hdu,
        None => return Ok(None),
    };
    let (height, width) = match fits_get_image_size(&fptr, &hdu)?.as_slice() {
        [height, width, 3] => (*height as u32, *width as u32),
        _ => {
            return Err(ContainerError::BadShape {
                file: file.to_path_buf(),
                thing: "canvas",
            })
        }
    };
    let pixels: Vec<u8> = fits_get_image(&mut fptr, &hdu)?;
    Ok(Some(Canvas {
        name: name.to_string(),
        width,
        height,
        pixels,
    }))
}
