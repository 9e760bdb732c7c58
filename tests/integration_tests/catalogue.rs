// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests of the catalogue subcommand.

use tempfile::TempDir;

use crate::{get_cmd_output, opd_sim};

#[test]
fn test_builtin_catalogue_is_listed() {
    let cmd = opd_sim().arg("catalogue").ok();
    assert!(cmd.is_ok(), "catalogue failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Built-in catalogue"), "{stdout}");
    assert!(stdout.contains("Navi"), "{stdout}");
    assert!(stdout.contains("gam Cas"), "{stdout}");
}

#[test]
fn test_bad_catalogue_file_fails() {
    let tmp_dir = TempDir::new().unwrap();
    let file = tmp_dir.path().join("sources.json");
    std::fs::write(
        &file,
        r#"{"sources": [{"name": "Bad", "ra_deg": 400.0, "dec_deg": 0.0}]}"#,
    )
    .unwrap();

    let cmd = opd_sim()
        .args(["catalogue", &format!("{}", file.display())])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("not within 0 to 360"), "{stderr}");
}
