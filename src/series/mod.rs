// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Per-pair time series of projected baselines and delays, and writing them
//! out.
//!
//! Each output file starts with a row of zeros. This row is not data; the
//! analysis that reads these files skips the first row.


use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use log::{debug, trace};
use marlu::HADec;
use thiserror::Error;

use crate::{
    array::{ArrayLayout, Baseline, TelescopePair},
    constants::NUM_PAIRS,
    direction::{normalise_hour_angle, ResolvedDirection},
    projection::{ProjectedSample, Projector},
    time::ObservationInstant,
};

const SENTINEL_ROW: &str = "0   0   0   0   0   0";

/// One row of a [`PairSeries`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeriesRecord {
    pub frame: usize,
    pub elapsed_seconds: f64,
    pub sample: ProjectedSample,
}

/// The samples of one telescope pair, in time order.
#[derive(Clone, Debug)]
pub struct PairSeries {
    pair: TelescopePair,
    records: Vec<SeriesRecord>,
}

impl PairSeries {
    pub fn new(pair: TelescopePair) -> PairSeries {
        PairSeries {
            pair,
            records: vec![],
        }
    }

    pub fn push(&mut self, instant: &ObservationInstant, sample: ProjectedSample) {
        debug_assert!(self
            .records
            .last()
            .map(|r| r.elapsed_seconds <= instant.elapsed_seconds)
            .unwrap_or(true));
        self.records.push(SeriesRecord {
            frame: instant.frame,
            elapsed_seconds: instant.elapsed_seconds,
            sample,
        });
    }

    pub fn pair(&self) -> TelescopePair {
        self.pair
    }

    pub fn records(&self) -> &[SeriesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Projects every baseline of the array at each instant it's given, and keeps
/// the results.
pub struct SeriesCollector {
    baselines: [Baseline; NUM_PAIRS],
    series: [PairSeries; NUM_PAIRS],
}

impl SeriesCollector {
    pub fn new(layout: &ArrayLayout) -> SeriesCollector {
        let baselines = layout.baselines();
        SeriesCollector {
            baselines,
            series: baselines.map(|b| PairSeries::new(b.pair)),
        }
    }

    /// Add the samples of all pairs for this instant. The hour angle is
    /// normalised first with [`normalise_hour_angle`], and the projection uses
    /// the latitude that came with the direction.
    pub fn add_instant(&mut self, instant: &ObservationInstant, direction: ResolvedDirection) {
        let ResolvedDirection {
            hadec,
            latitude_rad,
        } = direction;
        let hadec = HADec {
            ha: normalise_hour_angle(hadec.ha),
            dec: hadec.dec,
        };
        trace!(
            "Frame {}: HA {:.6} rad, Dec {:.6} rad, latitude {:.6} rad",
            instant.frame,
            hadec.ha,
            hadec.dec,
            latitude_rad
        );
        let projector = Projector::new(hadec, latitude_rad);
        for (baseline, series) in self.baselines.iter().zip(self.series.iter_mut()) {
            series.push(instant, projector.project(baseline.vector));
        }
    }

    pub fn series(&self) -> &[PairSeries; NUM_PAIRS] {
        &self.series
    }

    pub fn into_series(self) -> [PairSeries; NUM_PAIRS] {
        self.series
    }
}

/// The path that the series of `pair` is written to.
pub fn output_path(output_dir: &Path, prefix: &str, pair: TelescopePair) -> PathBuf {
    output_dir.join(format!("{prefix}{}.txt", pair.label()))
}

/// Write a series as text. If supplied, `delay_offset_ns` is added to every
/// delay.
pub fn write_series<W: Write>(
    out: &mut W,
    series: &PairSeries,
    delay_offset_ns: Option<f64>,
) -> std::io::Result<()> {
    writeln!(out, "{SENTINEL_ROW}")?;
    for record in series.records() {
        let delay_ns = match delay_offset_ns {
            Some(offset) => record.sample.delay_ns() + offset,
            None => record.sample.delay_ns(),
        };
        writeln!(
            out,
            "{}   {:.6}   {:.6}   {:.6}   {:.6}   {:.6}",
            record.frame,
            record.elapsed_seconds,
            record.sample.u,
            record.sample.v,
            record.sample.baseline_length(),
            delay_ns
        )?;
    }
    Ok(())
}

/// Write each series to its own file in `output_dir`. The paths of the
/// written files are returned in the order of `series`.
pub fn write_all_series(
    output_dir: &Path,
    prefix: &str,
    series: &[PairSeries],
    delay_offsets_ns: Option<&[f64; NUM_PAIRS]>,
) -> Result<Vec<PathBuf>, SeriesWriteError> {
    let mut paths = Vec::with_capacity(series.len());
    for (i, pair_series) in series.iter().enumerate() {
        let path = output_path(output_dir, prefix, pair_series.pair());
        debug!("Writing {} rows to {}", pair_series.len(), path.display());

        let file = File::create(&path).map_err(|source| SeriesWriteError::Create {
            path: path.clone(),
            source,
        })?;
        let mut out = BufWriter::new(file);
        let offset = delay_offsets_ns.map(|offsets| offsets[i]);
        write_series(&mut out, pair_series, offset)
            .and_then(|()| out.flush())
            .map_err(|source| SeriesWriteError::Write {
                path: path.clone(),
                source,
            })?;
        paths.push(path);
    }
    Ok(paths)
}

#[derive(Error, Debug)]
pub enum SeriesWriteError {
    #[error("Couldn't create output file '{}': {source}", .path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Couldn't write to output file '{}': {source}; the file is incomplete", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
