// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use tempfile::TempDir;

use super::*;

fn sample_scan() -> ThresholdScan {
    ThresholdScan {
        vfats: std::array::from_fn(|vfat| {
            (0..5)
                .map(|i| (i as f64 * 25.0, 4e7 / (1.0 + vfat as f64 + i as f64)))
                .collect()
        }),
    }
}

#[test]
fn test_read_what_was_written() {
    let tmp_dir = TempDir::new().unwrap();
    let file = tmp_dir.path().join("SBitRatePlots.fits");
    let scan = sample_scan();
    write(&file, &scan).unwrap();

    let read_back = read(&file).unwrap();
    assert_eq!(read_back, scan);
}

#[test]
fn test_write_clobbers() {
    let tmp_dir = TempDir::new().unwrap();
    let file = tmp_dir.path().join("SBitRatePlots.fits");
    write(&file, &ThresholdScan::default()).unwrap();
    let scan = sample_scan();
    write(&file, &scan).unwrap();
    assert_eq!(read(&file).unwrap(), scan);
}

#[test]
fn test_missing_file() {
    let tmp_dir = TempDir::new().unwrap();
    let file = tmp_dir.path().join("SBitRatePlots.fits");
    assert!(matches!(read(&file), Err(ResultFileError::DoesNotExist(_))));
}

#[test]
fn test_missing_vfat_is_an_error() {
    let tmp_dir = TempDir::new().unwrap();
    let file = tmp_dir.path().join("SBitRatePlots.fits");
    {
        // Only VFATs 0 to 10 are present.
        let mut fptr = FitsFile::create(&file).open().unwrap();
        for vfat in 0..11 {
            let threshold_col = ColumnDescription::new(THRESHOLD_COL)
                .with_type(ColumnDataType::Double)
                .create()
                .unwrap();
            let rate_col = ColumnDescription::new(RATE_COL)
                .with_type(ColumnDataType::Double)
                .create()
                .unwrap();
            let hdu = fptr
                .create_table(hdu_name(vfat), &[threshold_col, rate_col])
                .unwrap();
            hdu.write_col(&mut fptr, THRESHOLD_COL, &[0.0, 10.0])
                .unwrap();
            hdu.write_col(&mut fptr, RATE_COL, &[1e6, 1e3]).unwrap();
        }
    }

    let result = read(&file);
    match result {
        Err(ResultFileError::MissingVfat { vfat, hdu, .. }) => {
            assert_eq!(vfat, 11);
            assert_eq!(hdu, "VFAT11_THR_ARM_DAC");
        }
        other => panic!("Expected a missing VFAT error, got {other:?}"),
    }
}

#[test]
fn test_not_a_fits_file() {
    let tmp_dir = TempDir::new().unwrap();
    let file = tmp_dir.path().join("SBitRatePlots.fits");
    std::fs::write(&file, "definitely not FITS").unwrap();
    assert!(matches!(
        read(&file),
        Err(ResultFileError::Fits(FitsError::Open { .. }))
    ));
}
