// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to render threshold-scan comparisons.
//!
//! Canvases are drawn into memory first, so the same pixels can go into the
//! comparison container and (optionally) a PNG.

mod error;
#[cfg(test)]
mod tests;

pub(crate) use error::DrawError;

use std::path::{Path, PathBuf};

use log::trace;
use plotters::{coord::Shift, prelude::*};

use crate::{
    constants::{SUMMARY_COLS, SUMMARY_ROWS},
    io::container::Canvas,
    overlay::{AxisSpec, Comparison, Legend, Overlay},
};

/// The number of pixels on each side of a single VFAT's canvas.
pub(crate) const CANVAS_PIXELS: u32 = 700;
/// The number of pixels on each side of a cell of the summary grid.
const SUMMARY_CELL_PIXELS: u32 = 350;

/// The name of the summary canvas.
pub(crate) const SUMMARY_CANVAS_NAME: &str = "canvSBitRate_Summary";

/// Curve colours, cycled through by style index.
const PALETTE: [RGBColor; 8] = [
    BLACK,
    RED,
    BLUE,
    GREEN,
    MAGENTA,
    CYAN,
    RGBColor(255, 140, 0),
    RGBColor(128, 0, 128),
];

pub(crate) fn style_colour(style_index: usize) -> RGBColor {
    PALETTE[style_index % PALETTE.len()]
}

/// Draw a single overlay. Rates span many decades, so the y axis is always
/// logarithmic. Only what lies within the axis ranges is drawn; see
/// [`clip_to_axes`]. If a legend is given, it's drawn on top of the curves.
fn draw_overlay<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    overlay: &Overlay,
    legend: Option<&Legend>,
    x_axis: &AxisSpec,
    y_axis: &AxisSpec,
    font_size: i32,
) -> Result<(), DrawError> {
    let draw_err = |e: String| DrawError::Overlay {
        vfat: overlay.vfat,
        err: e,
    };

    let mut chart = ChartBuilder::on(area)
        .caption(overlay.title(), ("sans-serif", font_size))
        .margin(font_size / 2)
        .x_label_area_size(font_size * 2)
        .y_label_area_size(font_size * 3)
        .build_cartesian_2d(
            x_axis.min..x_axis.max,
            (y_axis.min..y_axis.max).log_scale(),
        )
        .map_err(|e| draw_err(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(x_axis.label())
        .y_desc(y_axis.label())
        .y_label_formatter(&|y| format!("{y:.0e}"))
        .label_style(("sans-serif", font_size * 3 / 4))
        .light_line_style(&WHITE)
        .draw()
        .map_err(|e| draw_err(e.to_string()))?;

    for curve in &overlay.curves {
        let colour = style_colour(curve.style_index);
        let (lines, points) = clip_to_axes(&curve.points, x_axis, y_axis);
        trace!(
            "VFAT {}, style {}: drawing {} of {} points in {} line(s)",
            overlay.vfat,
            curve.style_index,
            points.len(),
            curve.points.len(),
            lines.len()
        );

        let series = chart
            .draw_series(
                lines
                    .into_iter()
                    .map(|line| PathElement::new(line, colour.stroke_width(2))),
            )
            .map_err(|e| draw_err(e.to_string()))?;
        if let Some(entry) =
            legend.and_then(|l| l.entries.iter().find(|e| e.style_index == curve.style_index))
        {
            series
                .label(entry.label.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], colour.stroke_width(2))
                });
        }

        // Cycle through marker shapes as well as colours.
        let marker_size = font_size / 5;
        match curve.style_index % 3 {
            0 => chart.draw_series(
                points
                    .iter()
                    .map(|&p| Circle::new(p, marker_size, colour.filled())),
            ),
            1 => chart.draw_series(
                points
                    .iter()
                    .map(|&p| TriangleMarker::new(p, marker_size + 1, colour.filled())),
            ),
            _ => chart.draw_series(
                points
                    .iter()
                    .map(|&p| Cross::new(p, marker_size, colour.stroke_width(2))),
            ),
        }
        .map_err(|e| draw_err(e.to_string()))?;
    }

    if legend.is_some() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font(("sans-serif", font_size * 3 / 4))
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(|e| draw_err(e.to_string()))?;
    }

    Ok(())
}

/// A value in the space where `axis` is linear, or `None` if it can't be shown
/// on the axis at all.
fn to_linear(axis: &AxisSpec, value: f64) -> Option<f64> {
    match (value.is_finite(), axis.log) {
        (false, _) => None,
        (true, true) => (value > 0.0).then(|| value.ln()),
        (true, false) => Some(value),
    }
}

fn from_linear(axis: &AxisSpec, value: f64) -> f64 {
    if axis.log {
        value.exp()
    } else {
        value
    }
}

/// Liang-Barsky clipping of the segment `a -> b` to the box `lo..=hi`. Returns
/// the parameters `0 <= t0 <= t1 <= 1` of the part of the segment inside.
fn clip_segment(
    a: (f64, f64),
    b: (f64, f64),
    lo: (f64, f64),
    hi: (f64, f64),
) -> Option<(f64, f64)> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-dx, a.0 - lo.0),
        (dx, hi.0 - a.0),
        (-dy, a.1 - lo.1),
        (dy, hi.1 - a.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else if p < 0.0 {
            t0 = t0.max(q / p);
        } else {
            t1 = t1.min(q / p);
        }
    }
    (t0 <= t1).then_some((t0, t1))
}

/// Cut a curve down to what lies within the axis ranges. Returns the
/// polylines to draw and the points that get markers.
///
/// Segments crossing the frame end on it; clipping is done where the axes are
/// linear, so a cut segment keeps its slope on a log axis. A point that can't
/// be shown (e.g. a zero rate on a log axis) breaks the line.
pub(crate) fn clip_to_axes(
    points: &[(f64, f64)],
    x_axis: &AxisSpec,
    y_axis: &AxisSpec,
) -> (Vec<Vec<(f64, f64)>>, Vec<(f64, f64)>) {
    let bound = |axis: &AxisSpec, value: f64, fallback: f64| {
        to_linear(axis, value).unwrap_or(fallback)
    };
    let lo = (
        bound(x_axis, x_axis.min, f64::NEG_INFINITY),
        bound(y_axis, y_axis.min, f64::NEG_INFINITY),
    );
    let hi = (
        bound(x_axis, x_axis.max, f64::INFINITY),
        bound(y_axis, y_axis.max, f64::INFINITY),
    );

    // Each point alongside where it is in linear space.
    let linear: Vec<Option<((f64, f64), (f64, f64))>> = points
        .iter()
        .map(|&(x, y)| Some(((x, y), (to_linear(x_axis, x)?, to_linear(y_axis, y)?))))
        .collect();

    let markers = linear
        .iter()
        .flatten()
        .filter(|(_, (x, y))| (lo.0..=hi.0).contains(x) && (lo.1..=hi.1).contains(y))
        .map(|&(p, _)| p)
        .collect();

    let mut lines = vec![];
    let mut line: Vec<(f64, f64)> = vec![];
    for pair in linear.windows(2) {
        let clipped = match (pair[0], pair[1]) {
            (Some((a, a_lin)), Some((b, b_lin))) => {
                clip_segment(a_lin, b_lin, lo, hi).map(|(t0, t1)| {
                    // Unclipped ends are kept exactly as given.
                    let at = |t: f64| {
                        (
                            from_linear(x_axis, a_lin.0 + t * (b_lin.0 - a_lin.0)),
                            from_linear(y_axis, a_lin.1 + t * (b_lin.1 - a_lin.1)),
                        )
                    };
                    let start = if t0 > 0.0 { at(t0) } else { a };
                    let end = if t1 < 1.0 { at(t1) } else { b };
                    (start, end)
                })
            }
            _ => None,
        };
        match clipped {
            Some((start, end)) if line.last() == Some(&start) => line.push(end),
            Some((start, end)) => {
                if line.len() > 1 {
                    lines.push(std::mem::take(&mut line));
                }
                line = vec![start, end];
            }
            None => {
                if line.len() > 1 {
                    lines.push(std::mem::take(&mut line));
                }
                line.clear();
            }
        }
    }
    if line.len() > 1 {
        lines.push(line);
    }

    (lines, markers)
}

/// Render the overlay of a single VFAT onto its own canvas.
pub(crate) fn render_overlay(
    comparison: &Comparison,
    overlay: &Overlay,
    show_legend: bool,
) -> Result<Canvas, DrawError> {
    let name = overlay.canvas_name();
    let (width, height) = (CANVAS_PIXELS, CANVAS_PIXELS);
    let mut pixels = vec![0; width as usize * height as usize * 3];
    {
        let canvas_err = |e: String| DrawError::Canvas {
            canvas: name.clone(),
            err: e,
        };
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| canvas_err(e.to_string()))?;
        draw_overlay(
            &root,
            overlay,
            show_legend.then_some(&comparison.legend),
            &comparison.x_axis,
            &comparison.y_axis,
            20,
        )?;
        root.present().map_err(|e| canvas_err(e.to_string()))?;
    }

    Ok(Canvas {
        name,
        width,
        height,
        pixels,
    })
}

/// Render all overlays onto a single grid, VFAT 0 at the top left and VFATs
/// increasing along each row. Only the first cell gets a legend.
pub(crate) fn render_summary(
    comparison: &Comparison,
    show_legend: bool,
) -> Result<Canvas, DrawError> {
    let name = SUMMARY_CANVAS_NAME.to_string();
    let width = SUMMARY_CELL_PIXELS * SUMMARY_COLS as u32;
    let height = SUMMARY_CELL_PIXELS * SUMMARY_ROWS as u32;
    let mut pixels = vec![0; width as usize * height as usize * 3];
    {
        let canvas_err = |e: String| DrawError::Canvas {
            canvas: name.clone(),
            err: e,
        };
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| canvas_err(e.to_string()))?;
        let cells = root.split_evenly((SUMMARY_ROWS, SUMMARY_COLS));
        for (overlay, cell) in comparison.overlays.iter().zip(cells.iter()) {
            let legend = if show_legend && overlay.vfat == 0 {
                Some(&comparison.legend)
            } else {
                None
            };
            draw_overlay(
                cell,
                overlay,
                legend,
                &comparison.x_axis,
                &comparison.y_axis,
                14,
            )?;
        }
        root.present().map_err(|e| canvas_err(e.to_string()))?;
    }

    Ok(Canvas {
        name,
        width,
        height,
        pixels,
    })
}

/// Write a rendered canvas to `<dir>/<canvas name>.png`.
pub(crate) fn save_png(canvas: &Canvas, dir: &Path) -> Result<PathBuf, DrawError> {
    let file = dir.join(format!("{}.png", canvas.name));
    let png_err = |e: String| DrawError::Png {
        file: file.clone(),
        err: e,
    };
    let mut backend = BitMapBackend::new(&file, (canvas.width, canvas.height));
    backend
        .blit_bitmap((0, 0), (canvas.width, canvas.height), &canvas.pixels)
        .map_err(|e| png_err(e.to_string()))?;
    backend.present().map_err(|e| png_err(e.to_string()))?;
    drop(backend);
    Ok(file)
}
