// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use tempfile::TempDir;

use super::*;
use crate::{constants::NUM_VFATS, overlay::ThresholdScan, scans::ScanDescriptor};

fn comparison() -> Comparison {
    let mut comparison = Comparison::new(
        "GE11-X-S-CERN-0001".to_string(),
        "CFG_THR_ARM_DAC".to_string(),
        false,
    );
    for (i_scan, label) in ["25", "40"].into_iter().enumerate() {
        let descriptor = ScanDescriptor {
            chamber: "GE11-X-S-CERN-0001".to_string(),
            scandate: format!("2018.06.2{i_scan}.14.07"),
            label: label.to_string(),
        };
        let scan = ThresholdScan {
            vfats: std::array::from_fn(|_| {
                // Include a zero rate, which can't go on a log axis.
                (0..=25)
                    .map(|i| {
                        let dac = i as f64 * 5.0;
                        let rate = if i == 25 {
                            0.0
                        } else {
                            4e7 * (-dac / (10.0 + 5.0 * i_scan as f64)).exp()
                        };
                        (dac, rate)
                    })
                    .collect()
            }),
        };
        comparison.add_scan(&descriptor, scan, None).unwrap();
    }
    comparison
}

fn is_blank(canvas: &Canvas) -> bool {
    canvas.pixels.iter().all(|&p| p == 255)
}

#[test]
fn test_style_colours_cycle() {
    assert_eq!(style_colour(0), BLACK);
    assert_eq!(style_colour(1), RED);
    assert_eq!(style_colour(8), style_colour(0));
    assert_ne!(style_colour(6), style_colour(7));
}

#[test]
fn test_render_overlay() {
    let comparison = comparison();
    let canvas = render_overlay(&comparison, &comparison.overlays[3], true).unwrap();
    assert_eq!(canvas.name, "canvSBitRate_VFAT3");
    assert_eq!((canvas.width, canvas.height), (700, 700));
    assert_eq!(canvas.pixels.len(), 700 * 700 * 3);
    assert!(!is_blank(&canvas));
}

#[test]
fn test_legend_changes_the_canvas() {
    let comparison = comparison();
    let with_legend = render_overlay(&comparison, &comparison.overlays[0], true).unwrap();
    let without_legend = render_overlay(&comparison, &comparison.overlays[0], false).unwrap();
    assert_ne!(with_legend.pixels, without_legend.pixels);
}

#[test]
fn test_render_summary() {
    let comparison = comparison();
    assert_eq!(comparison.overlays.len(), NUM_VFATS);
    let canvas = render_summary(&comparison, true).unwrap();
    assert_eq!(canvas.name, "canvSBitRate_Summary");
    assert_eq!((canvas.width, canvas.height), (8 * 350, 3 * 350));
    assert_eq!(
        canvas.pixels.len(),
        canvas.width as usize * canvas.height as usize * 3
    );
    assert!(!is_blank(&canvas));
}

#[test]
fn test_save_png() {
    let tmp_dir = TempDir::new().unwrap();
    let comparison = comparison();
    let canvas = render_overlay(&comparison, &comparison.overlays[23], false).unwrap();
    let file = save_png(&canvas, tmp_dir.path()).unwrap();
    assert_eq!(file, tmp_dir.path().join("canvSBitRate_VFAT23.png"));
    let bytes = std::fs::read(&file).unwrap();
    // The PNG signature.
    assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']);
}

#[test]
fn test_clip_to_axes_cuts_segments_at_the_frame() {
    let x_axis = AxisSpec::threshold_dac();
    let y_axis = AxisSpec::rate();
    let (lines, markers) = clip_to_axes(
        &[(100.0, 1e3), (150.0, 1e3), (255.0, 1e3)],
        &x_axis,
        &y_axis,
    );
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].len(), 2);
    assert_eq!(lines[0][0], (100.0, 1e3));
    assert_relative_eq!(lines[0][1].0, 125.0);
    assert_relative_eq!(lines[0][1].1, 1e3, max_relative = 1e-12);
    assert_eq!(markers, vec![(100.0, 1e3)]);
}

#[test]
fn test_clip_to_axes_interpolates_on_the_log_axis() {
    // A decade per DAC unit; the line leaves the top of the frame (5e8 Hz)
    // at log10(5e8) - 7 DAC past x = 1.
    let (lines, markers) = clip_to_axes(
        &[(1.0, 1e7), (2.0, 1e8), (3.0, 1e9), (4.0, 1e10)],
        &AxisSpec::threshold_dac(),
        &AxisSpec::rate(),
    );
    assert_eq!(lines.len(), 1);
    let line = &lines[0];
    assert_eq!(line.len(), 3);
    assert_relative_eq!(line[2].0, 1.0 + 5e8_f64.log10() - 7.0, max_relative = 1e-12);
    assert_relative_eq!(line[2].1, 5e8, max_relative = 1e-12);
    assert_eq!(markers, vec![(1.0, 1e7), (2.0, 1e8)]);
}

#[test]
fn test_clip_to_axes_breaks_lines_at_unshowable_points() {
    let (lines, markers) = clip_to_axes(
        &[(0.0, 1e4), (5.0, 1e3), (10.0, 0.0), (15.0, 1e2), (20.0, 1e1)],
        &AxisSpec::threshold_dac(),
        &AxisSpec::rate(),
    );
    assert_eq!(
        lines,
        vec![vec![(0.0, 1e4), (5.0, 1e3)], vec![(15.0, 1e2), (20.0, 1e1)]]
    );
    assert_eq!(markers.len(), 4);

    // Entirely outside the frame.
    let (lines, markers) = clip_to_axes(
        &[(130.0, 1e3), (255.0, 1e2)],
        &AxisSpec::threshold_dac(),
        &AxisSpec::rate(),
    );
    assert!(lines.is_empty());
    assert!(markers.is_empty());
}

#[test]
fn test_points_beyond_the_axis_range_stay_inside_the_frame() {
    let mut comparison = Comparison::new(
        "GE11-X-S-CERN-0001".to_string(),
        "CFG_THR_ARM_DAC".to_string(),
        false,
    );
    for (i_scan, label) in ["25", "40"].into_iter().enumerate() {
        let descriptor = ScanDescriptor {
            chamber: "GE11-X-S-CERN-0001".to_string(),
            scandate: format!("2018.06.2{i_scan}.14.07"),
            label: label.to_string(),
        };
        // Real scans run to 255 DAC, past the end of the threshold axis.
        let scan = ThresholdScan {
            vfats: std::array::from_fn(|_| vec![(100.0, 1e3), (255.0, 1e3)]),
        };
        comparison.add_scan(&descriptor, scan, None).unwrap();
    }
    let canvas = render_overlay(&comparison, &comparison.overlays[0], false).unwrap();

    // The second scan is drawn in pure red. Count red pixels in the rightmost
    // columns, which are outside the chart's frame.
    let width = canvas.width as usize;
    let red_in_margin = canvas
        .pixels
        .chunks_exact(3)
        .enumerate()
        .filter(|(i, rgb)| i % width >= width - 8 && *rgb == [255, 0, 0])
        .count();
    assert_eq!(red_in_margin, 0);

    // The clipped line is still drawn inside the frame.
    let red = canvas
        .pixels
        .chunks_exact(3)
        .filter(|rgb| *rgb == [255, 0, 0])
        .count();
    assert!(red > 0);
}
