// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests to ensure there is no stderr output for successful commands.

use tempfile::TempDir;

use crate::{get_cmd_output, opd_sim, GAMMA_CAS_RUN};

#[test]
fn test_simulate_no_stderr() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let output_dir = tmp_dir.path().join("delays");

    let cmd = opd_sim()
        .arg("simulate")
        .args(GAMMA_CAS_RUN)
        .args(["--output-dir", &format!("{}", output_dir.display())])
        .ok();
    assert!(
        cmd.is_ok(),
        "simulate failed on a simple run: {}",
        cmd.err().unwrap()
    );
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
}

#[test]
fn test_catalogue_no_stderr() {
    let cmd = opd_sim().arg("catalogue").ok();
    assert!(cmd.is_ok(), "catalogue failed: {}", cmd.err().unwrap());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
}
