// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io::Write;

use indoc::indoc;
use tempfile::NamedTempFile;

use crate::{gemplotting_bin, get_cmd_output};

#[test]
fn test_gain_estimate_prints_a_table() {
    let mut file = NamedTempFile::new().unwrap();
    // gain = 2 * exp(10000 * current)
    file.write_all(
        indoc! {"
            current,gain
            0.00055,489.3
            0.00060,806.9
            0.00065,1330.3
        "}
        .as_bytes(),
    )
    .unwrap();

    let cmd = gemplotting_bin()
        .args(["gain-estimate", &file.path().display().to_string()])
        .ok();
    assert!(cmd.is_ok(), "gain-estimate failed: {}", cmd.err().unwrap());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    for voltage in ["3000", "3050", "3100", "3150", "3200", "3250", "3300", "3350", "3400"] {
        assert!(stdout.contains(voltage), "{voltage} missing from:\n{stdout}");
    }
}

#[test]
fn test_gain_estimate_missing_file() {
    let cmd = gemplotting_bin()
        .args(["gain-estimate", "/does/not/exist.txt"])
        .assert();
    cmd.failure().code(65);
}

#[test]
fn test_gain_estimate_rejects_non_positive_gain() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"0.00055 100.0\n0.00060 0.0\n").unwrap();
    let cmd = gemplotting_bin()
        .args(["gain-estimate", &file.path().display().to_string()])
        .assert();
    cmd.failure().code(1);
}
