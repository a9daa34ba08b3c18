// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use tempfile::TempDir;

use super::*;
use crate::{overlay::ThresholdScan, scans::ScanDescriptor};

fn comparison(num_scans: usize) -> Comparison {
    let mut comparison = Comparison::new(
        "GE11-X-S-CERN-0001".to_string(),
        "CFG_THR_ARM_DAC".to_string(),
        false,
    );
    for i_scan in 0..num_scans {
        let descriptor = ScanDescriptor {
            chamber: "GE11-X-S-CERN-0001".to_string(),
            scandate: format!("2018.06.{:02}.14.07", 20 + i_scan),
            label: format!("{}", 25 + 5 * i_scan),
        };
        let scan = ThresholdScan {
            vfats: std::array::from_fn(|vfat| {
                (0..3 + i_scan)
                    .map(|i| (i as f64 * 5.0, (vfat + 1) as f64 * 1e5 / (i + 1) as f64))
                    .collect()
            }),
        };
        comparison.add_scan(&descriptor, scan, None).unwrap();
    }
    comparison
}

fn canvas(name: &str) -> Canvas {
    Canvas {
        name: name.to_string(),
        width: 4,
        height: 2,
        pixels: (0..24).collect(),
    }
}

#[test]
fn test_container_path() {
    assert_eq!(
        container_path(Path::new("/elog"), "GE11-X-S-CERN-0001"),
        PathBuf::from("/elog/compSbitThresh_GE11-X-S-CERN-0001.fits")
    );
}

#[test]
fn test_read_what_was_written() {
    let tmp_dir = TempDir::new().unwrap();
    let file = tmp_dir.path().join("compSbitThresh_GE11-X-S-CERN-0001.fits");
    let comparison = comparison(2);
    write(&file, &comparison, &[canvas("canvSBitRate_Summary")]).unwrap();

    let read_back = read(&file).unwrap();
    assert_eq!(read_back.chamber, "GE11-X-S-CERN-0001");
    assert_eq!(read_back.thr_dac_name, "CFG_THR_ARM_DAC");
    assert!(!read_back.calibrated);
    assert_eq!(read_back.num_scans(), 2);
    assert_eq!(read_back.legend, comparison.legend);
    assert_eq!(read_back.x_axis, comparison.x_axis);
    assert_eq!(read_back.y_axis, comparison.y_axis);
    assert_eq!(read_back.overlays, comparison.overlays);
}

#[test]
fn test_canvases_are_stored() {
    let tmp_dir = TempDir::new().unwrap();
    let file = tmp_dir.path().join("comp.fits");
    let canvases = [canvas("canvSBitRate_VFAT0"), canvas("canvSBitRate_Summary")];
    write(&file, &comparison(1), &canvases).unwrap();

    for expected in &canvases {
        let stored = read_canvas(&file, &expected.name).unwrap().unwrap();
        assert_eq!(&stored, expected);
    }
    assert!(read_canvas(&file, "canvSBitRate_VFAT1").unwrap().is_none());
}

#[test]
fn test_malformed_canvas_creates_nothing() {
    let tmp_dir = TempDir::new().unwrap();
    let file = tmp_dir.path().join("comp.fits");
    let mut bad = canvas("canvSBitRate_Summary");
    bad.pixels.pop();

    let result = write(&file, &comparison(1), &[bad]);
    assert!(matches!(
        result,
        Err(ContainerError::BadCanvas {
            expected: 24,
            found: 23,
            ..
        })
    ));
    assert!(!file.exists());
}

#[test]
fn test_write_clobbers() {
    let tmp_dir = TempDir::new().unwrap();
    let file = tmp_dir.path().join("comp.fits");
    write(&file, &comparison(3), &[]).unwrap();
    write(&file, &comparison(1), &[]).unwrap();
    assert_eq!(read(&file).unwrap().num_scans(), 1);
}
