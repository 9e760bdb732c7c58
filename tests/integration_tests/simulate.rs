// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests of the simulate subcommand.

use indoc::formatdoc;
use tempfile::TempDir;

use crate::{get_cmd_output, opd_sim, read_delay_files, GAMMA_CAS_RUN, PAIR_LABELS};

#[test]
fn test_simulate_writes_every_pair() {
    let tmp_dir = TempDir::new().unwrap();
    let output_dir = tmp_dir.path().join("delays");

    let cmd = opd_sim()
        .arg("simulate")
        .args(GAMMA_CAS_RUN)
        .args(["--output-dir", &format!("{}", output_dir.display())])
        .ok();
    assert!(cmd.is_ok(), "simulate failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("opd-sim simulate complete."), "{stdout}");

    for contents in read_delay_files(&output_dir, "") {
        let lines: Vec<_> = contents.lines().collect();
        // 5 frames and the row of zeros.
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "0   0   0   0   0   0");
        for (i, line) in lines[1..].iter().enumerate() {
            let fields: Vec<&str> = line.split("   ").collect();
            assert_eq!(fields.len(), 6, "{line}");
            assert_eq!(fields[0], format!("{}", i + 1));
            assert_eq!(fields[1], format!("{:.6}", i as f64 * 2.0));
            for field in &fields[1..] {
                let (_, decimals) = field.split_once('.').unwrap();
                assert_eq!(decimals.len(), 6, "{line}");
            }
        }
    }
}

#[test]
fn test_simulate_is_reproducible() {
    let tmp_dir = TempDir::new().unwrap();
    let first = tmp_dir.path().join("first");
    let second = tmp_dir.path().join("second");

    for dir in [&first, &second] {
        let cmd = opd_sim()
            .arg("delays")
            .args(GAMMA_CAS_RUN)
            .args(["--output-dir", &format!("{}", dir.display())])
            .ok();
        assert!(cmd.is_ok(), "simulate failed: {}", cmd.err().unwrap());
    }

    assert_eq!(read_delay_files(&first, ""), read_delay_files(&second, ""));
}

#[test]
fn test_simulate_bad_frame_size_writes_nothing() {
    let tmp_dir = TempDir::new().unwrap();
    let output_dir = tmp_dir.path().join("delays");
    let mut tokens = GAMMA_CAS_RUN;
    tokens[2] = "0";

    let cmd = opd_sim()
        .arg("simulate")
        .args(tokens)
        .args(["--output-dir", &format!("{}", output_dir.display())])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.starts_with("Error: "), "{stderr}");
    assert!(!output_dir.exists());
}

#[test]
fn test_simulate_unknown_source_writes_nothing() {
    let tmp_dir = TempDir::new().unwrap();
    let output_dir = tmp_dir.path().join("delays");
    let mut tokens = GAMMA_CAS_RUN;
    tokens[3] = "Crab";
    tokens[4] = "Nebula";

    let result = opd_sim()
        .arg("simulate")
        .args(tokens)
        .args(["--output-dir", &format!("{}", output_dir.display())])
        .output()
        .unwrap();
    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8(result.stderr).unwrap();
    assert!(stderr.contains("Crab Nebula"), "{stderr}");
    assert!(!output_dir.exists());
}

#[test]
fn test_simulate_dry_run() {
    let tmp_dir = TempDir::new().unwrap();
    let output_dir = tmp_dir.path().join("delays");

    let cmd = opd_sim()
        .arg("simulate")
        .args(GAMMA_CAS_RUN)
        .args(["--output-dir", &format!("{}", output_dir.display())])
        .arg("--dry-run")
        .ok();
    assert!(cmd.is_ok(), "simulate failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Dry run"), "{stdout}");
    for label in PAIR_LABELS {
        assert!(!output_dir.join(format!("{label}.txt")).exists());
    }
    assert!(!output_dir.exists());
}

#[test]
fn test_simulate_invalid_run_doesnt_save_toml() {
    let tmp_dir = TempDir::new().unwrap();
    let output_dir = tmp_dir.path().join("delays");
    let saved = tmp_dir.path().join("saved.toml");

    let cmd = opd_sim()
        .arg("simulate")
        .args(["10", "5", "2", "Gamma", "Cas", "2023-11-03", "12:30:60"])
        .args(["--output-dir", &format!("{}", output_dir.display())])
        .args(["--save-toml", &format!("{}", saved.display())])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.starts_with("Error: "), "{stderr}");
    assert!(!saved.exists());
    assert!(!output_dir.exists());
}

#[test]
fn test_simulate_args_file_and_save_toml() {
    let tmp_dir = TempDir::new().unwrap();
    let output_dir = tmp_dir.path().join("from_file");
    let args_file = tmp_dir.path().join("args.toml");
    std::fs::write(
        &args_file,
        formatdoc! {r#"
            [run]
            run_duration = 6.0
            frame_size = 2.0
            source_a = "Vega"
            start_date = "2023-11-03"
            start_time = "21:30"

            [output]
            output_dir = "{}"
            output_prefix = "pyinfo"
        "#,
            output_dir.display()
        },
    )
    .unwrap();
    let saved = tmp_dir.path().join("saved.toml");

    let cmd = opd_sim()
        .args([
            "simulate",
            "--args-file",
            &format!("{}", args_file.display()),
            "--save-toml",
            &format!("{}", saved.display()),
        ])
        .ok();
    assert!(cmd.is_ok(), "simulate failed: {}", cmd.err().unwrap());

    for contents in read_delay_files(&output_dir, "pyinfo") {
        assert_eq!(contents.lines().count(), 4);
    }

    // The saved arguments reproduce the run.
    let saved_contents = std::fs::read_to_string(&saved).unwrap();
    assert!(saved_contents.contains("source_a = \"Vega\""), "{saved_contents}");
    assert!(saved_contents.contains("[output]"), "{saved_contents}");
}

#[test]
fn test_simulate_cable_delays_change_delays_only() {
    let tmp_dir = TempDir::new().unwrap();
    let plain = tmp_dir.path().join("plain");
    let cabled = tmp_dir.path().join("cabled");

    for (dir, extra) in [(&plain, None), (&cabled, Some("--apply-cable-delays"))] {
        let mut cmd = opd_sim();
        cmd.arg("simulate")
            .args(GAMMA_CAS_RUN)
            .args(["--output-dir", &format!("{}", dir.display())]);
        if let Some(extra) = extra {
            cmd.arg(extra);
        }
        let result = cmd.ok();
        assert!(result.is_ok(), "simulate failed: {}", result.err().unwrap());
    }

    for (a, b) in read_delay_files(&plain, "")
        .into_iter()
        .zip(read_delay_files(&cabled, ""))
    {
        for (line_a, line_b) in a.lines().zip(b.lines()).skip(1) {
            let fields_a: Vec<_> = line_a.split("   ").collect();
            let fields_b: Vec<_> = line_b.split("   ").collect();
            assert_eq!(fields_a[..5], fields_b[..5]);
            assert_ne!(fields_a[5], fields_b[5]);
        }
    }
}
