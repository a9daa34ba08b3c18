// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use gemplotting::{
    io::{container, result_file},
    overlay::ThresholdScan,
    ScanDescriptor,
};

use crate::{gemplotting_bin, get_cmd_output};

const CHAMBER: &str = "GE11-X-S-CERN-0002";

/// Write a result file for each scandate under `<dir>/data` and return the
/// list of scandates.
fn make_scans(dir: &Path, scandates: &[&str]) -> PathBuf {
    let data_path = dir.join("data");
    let mut list = "ChamberName\tscandate\tCFG_THR_ARM_DAC\n".to_string();
    for (i_scan, scandate) in scandates.iter().enumerate() {
        let descriptor = ScanDescriptor {
            chamber: CHAMBER.to_string(),
            scandate: scandate.to_string(),
            label: format!("{}", 20 + 10 * i_scan),
        };
        std::fs::create_dir_all(descriptor.scandate_dir(&data_path)).unwrap();
        let scan = ThresholdScan {
            vfats: std::array::from_fn(|vfat| {
                (0..=25)
                    .map(|i| {
                        let dac = i as f64 * 5.0;
                        (dac, 1e7 / (1.0 + dac + vfat as f64 + i_scan as f64))
                    })
                    .collect()
            }),
        };
        result_file::write(&descriptor.result_path(&data_path), &scan).unwrap();
        list.push_str(&format!("{CHAMBER}\t{scandate}\t{}\n", descriptor.label));
    }
    let file = dir.join("listOfScanDates.txt");
    std::fs::write(&file, list).unwrap();
    file
}

#[test]
fn test_missing_env_var_is_a_data_error() {
    let tmp_dir = TempDir::new().unwrap();
    let list = make_scans(tmp_dir.path(), &["2018.06.29.14.07"]);
    gemplotting_bin()
        .env_remove("DATA_PATH")
        .env("ELOG_PATH", tmp_dir.path().join("elog"))
        .args(["sbit-thresh-comp", &list.display().to_string()])
        .assert()
        .failure()
        .code(65);
}

#[test]
fn test_missing_scan_is_a_data_error() {
    let tmp_dir = TempDir::new().unwrap();
    let list = make_scans(tmp_dir.path(), &["2018.06.29.14.07"]);
    let mut contents = std::fs::read_to_string(&list).unwrap();
    contents.push_str(&format!("{CHAMBER}\t2018.07.01.00.00\t30\n"));
    std::fs::write(&list, contents).unwrap();

    let elog_path = tmp_dir.path().join("elog");
    let cmd = gemplotting_bin()
        .env("DATA_PATH", tmp_dir.path().join("data"))
        .env("ELOG_PATH", &elog_path)
        .args(["sbit-thresh-comp", &list.display().to_string()])
        .assert();
    cmd.failure().code(65);
    assert!(!container::container_path(&elog_path, CHAMBER).exists());
}

#[test]
fn test_dry_run_with_arguments_file() {
    let tmp_dir = TempDir::new().unwrap();
    let list = make_scans(tmp_dir.path(), &["2018.06.29.14.07"]);
    let args_file = tmp_dir.path().join("args.toml");
    std::fs::write(
        &args_file,
        format!("filename = {:?}\nno_leg = true\n", list.display().to_string()),
    )
    .unwrap();
    let saved = tmp_dir.path().join("saved.toml");

    let elog_path = tmp_dir.path().join("elog");
    let cmd = gemplotting_bin()
        .env("DATA_PATH", tmp_dir.path().join("data"))
        .env("ELOG_PATH", &elog_path)
        .args([
            "sbit-thresh-comp",
            "--args-file",
            &args_file.display().to_string(),
            "--dry-run",
            "--save-toml",
            &saved.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "dry run failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Dry run"));
    assert!(!elog_path.exists());

    let saved = std::fs::read_to_string(saved).unwrap();
    assert!(saved.contains("no_leg = true"));
    assert!(saved.contains("listOfScanDates.txt"));
}

#[test]
#[cfg(feature = "plotting")]
fn test_compare_two_scans() {
    let tmp_dir = TempDir::new().unwrap();
    let list = make_scans(tmp_dir.path(), &["2018.06.29.14.07", "2018.06.30.09.12"]);
    let elog_path = tmp_dir.path().join("elog");

    let cmd = gemplotting_bin()
        .env("DATA_PATH", tmp_dir.path().join("data"))
        .env("ELOG_PATH", &elog_path)
        .args([
            "sbit-thresh-comp",
            "--no-progress-bars",
            &list.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "sbit-thresh-comp failed: {}", cmd.err().unwrap());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    let file = container::container_path(&elog_path, CHAMBER);
    assert!(stdout.contains(&file.display().to_string()));

    let comparison = container::read(&file).unwrap();
    assert_eq!(comparison.overlays.len(), 24);
    assert!(comparison.overlays.iter().all(|o| o.curves.len() == 2));
    assert_eq!(comparison.legend.entries.len(), 2);
    assert_eq!(comparison.x_axis.title, "CFG_THR_ARM_DAC");
    assert_eq!((comparison.x_axis.min, comparison.x_axis.max), (0.0, 125.0));
    assert!(elog_path.join("canvSBitRate_Summary.png").exists());
    assert!(!elog_path.join("canvSBitRate_VFAT0.png").exists());
}
