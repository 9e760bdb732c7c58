// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod catalogue;
mod no_stderr;
mod simulate;

use std::{path::Path, process::Output, str::from_utf8};

use assert_cmd::{output::OutputError, Command};

/// The positional arguments of a 10 second run of 2 second frames towards
/// Gamma Cas.
const GAMMA_CAS_RUN: [&str; 7] = ["10", "5", "2", "Gamma", "Cas", "2023-11-03", "21:30:00"];

const PAIR_LABELS: [&str; 6] = ["T1T2", "T1T3", "T1T4", "T2T3", "T2T4", "T3T4"];

fn opd_sim() -> Command {
    Command::cargo_bin("opd-sim").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

/// Read all of the per-pair files in a directory, in pair order.
fn read_delay_files(dir: &Path, prefix: &str) -> Vec<String> {
    PAIR_LABELS
        .iter()
        .map(|label| {
            let file = dir.join(format!("{prefix}{label}.txt"));
            std::fs::read_to_string(&file)
                .unwrap_or_else(|e| panic!("couldn't read {}: {e}", file.display()))
        })
        .collect()
}
