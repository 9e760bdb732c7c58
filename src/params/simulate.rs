// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Step through an observation run and write the delays of every telescope
//! pair.

use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use itertools::Itertools;
use log::{debug, info};
use marlu::LatLngHeight;
use thiserror::Error;

use crate::{
    array::{ArrayLayout, TelescopePair},
    constants::NUM_PAIRS,
    direction::DirectionResolver,
    series::{output_path, write_all_series, SeriesCollector, SeriesWriteError},
    time::TimeStepper,
    PROGRESS_BARS,
};

/// Parameters needed to simulate the delays of a run.
pub(crate) struct SimulateParams {
    /// The telescope positions and cable delays.
    pub(crate) layout: ArrayLayout,

    /// The Earth position of the array.
    pub(crate) array_position: LatLngHeight,

    /// Where the source is at any time.
    pub(crate) direction: Box<dyn DirectionResolver>,

    /// The instants of the run.
    pub(crate) stepper: TimeStepper,

    /// The directory that the series files are written to.
    pub(crate) output_dir: PathBuf,

    /// Prepended to each pair label to make the output file names.
    pub(crate) output_prefix: String,

    /// Should the static cable delays be added to the written delays?
    pub(crate) apply_cable_delays: bool,
}

impl SimulateParams {
    /// The paths of the files written by [`SimulateParams::run`], in pair
    /// order.
    pub(crate) fn output_paths(&self) -> [PathBuf; NUM_PAIRS] {
        TelescopePair::all().map(|pair| output_path(&self.output_dir, &self.output_prefix, pair))
    }

    /// Returns the paths of the written files, in pair order.
    pub(crate) fn run(&self) -> Result<Vec<PathBuf>, SimulateError> {
        let SimulateParams {
            layout,
            array_position,
            direction,
            stepper,
            output_dir,
            output_prefix,
            apply_cable_delays,
        } = self;

        let progress = ProgressBar::with_draw_target(
            Some(stepper.num_steps() as _),
            if PROGRESS_BARS.load() {
                ProgressDrawTarget::stdout()
            } else {
                ProgressDrawTarget::hidden()
            },
        )
        .with_style(
            ProgressStyle::default_bar()
                .template("{msg:12}: [{wide_bar:.blue}] {pos:2}/{len:2} frames ({elapsed_precise}<{eta_precise})").unwrap()
                .progress_chars("=> "),
        )
        .with_position(0)
        .with_message("Projecting");

        debug!(
            "Array position: {:.6}° {:.6}° {:.3}m",
            array_position.longitude_rad.to_degrees(),
            array_position.latitude_rad.to_degrees(),
            array_position.height_metres
        );
        let mut collector = SeriesCollector::new(layout);
        for instant in stepper {
            collector.add_instant(&instant, direction.resolve(instant.epoch));
            progress.inc(1);
        }
        progress.abandon_with_message("Finished projecting baselines");

        let cable_offsets_ns = if *apply_cable_delays {
            debug!("Adding static cable delays to the written delays");
            Some(TelescopePair::all().map(|pair| layout.differential_cable_delay(pair) * 1e9))
        } else {
            None
        };
        let paths = write_all_series(
            output_dir,
            output_prefix,
            &collector.into_series(),
            cable_offsets_ns.as_ref(),
        )?;
        info!(
            "Delays written to: {}",
            paths.iter().map(|p| p.display()).join(", ")
        );

        Ok(paths)
    }
}

#[derive(Error, Debug)]
pub(crate) enum SimulateError {
    #[error(transparent)]
    SeriesWrite(#[from] SeriesWriteError),
}
