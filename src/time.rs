// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helper functions and types around time: the start of an observation and the
//! instants at which the geometry is evaluated.

use chrono::{Datelike, NaiveDateTime, Timelike};
use hifitime::{Duration, Epoch};
use thiserror::Error;

/// The largest number of steps a run is allowed to have.
const MAX_NUM_STEPS: usize = 100_000_000;

/// The formats accepted for the local start date and time, once they've been
/// joined with a space.
const START_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// A single time step of an observation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObservationInstant {
    /// 1-based frame number.
    pub frame: usize,

    /// Time since the start of the run \[seconds\].
    pub elapsed_seconds: f64,

    /// The (UTC) time of this step.
    pub epoch: Epoch,
}

/// Produces the instants of an observation run; `start`, `start + frame`,
/// `start + 2 * frame`, ... until (but not including) `start + run`. The
/// stepper can be iterated over as many times as needed.
#[derive(Clone, Copy, Debug)]
pub struct TimeStepper {
    start: Epoch,
    frame_seconds: f64,
    run_seconds: f64,
    num_steps: usize,
}

impl TimeStepper {
    pub fn new(
        start: Epoch,
        frame_seconds: f64,
        run_seconds: f64,
    ) -> Result<TimeStepper, TimeStepperError> {
        if !frame_seconds.is_finite() || frame_seconds <= 0.0 {
            return Err(TimeStepperError::InvalidFrameDuration(frame_seconds));
        }
        if !run_seconds.is_finite() || run_seconds <= 0.0 {
            return Err(TimeStepperError::InvalidRunDuration(run_seconds));
        }

        let ratio = (run_seconds / frame_seconds).ceil();
        if ratio > MAX_NUM_STEPS as f64 {
            return Err(TimeStepperError::TooManySteps {
                run: run_seconds,
                frame: frame_seconds,
            });
        }
        // The division above may be off by one; the elapsed times are what
        // decide the count.
        let mut num_steps = ratio as usize;
        while num_steps > 0 && (num_steps - 1) as f64 * frame_seconds >= run_seconds {
            num_steps -= 1;
        }
        while (num_steps as f64) * frame_seconds < run_seconds {
            num_steps += 1;
        }

        Ok(TimeStepper {
            start,
            frame_seconds,
            run_seconds,
            num_steps,
        })
    }

    pub fn start(&self) -> Epoch {
        self.start
    }

    pub fn frame_seconds(&self) -> f64 {
        self.frame_seconds
    }

    pub fn run_seconds(&self) -> f64 {
        self.run_seconds
    }

    /// The total number of steps, i.e. ceil(run / frame).
    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    pub fn iter(&self) -> TimeSteps {
        TimeSteps {
            stepper: *self,
            index: 0,
        }
    }
}

impl<'a> IntoIterator for &'a TimeStepper {
    type Item = ObservationInstant;
    type IntoIter = TimeSteps;

    fn into_iter(self) -> TimeSteps {
        self.iter()
    }
}

/// Iterator over the instants of a [`TimeStepper`].
#[derive(Clone, Debug)]
pub struct TimeSteps {
    stepper: TimeStepper,
    index: usize,
}

impl Iterator for TimeSteps {
    type Item = ObservationInstant;

    fn next(&mut self) -> Option<ObservationInstant> {
        if self.index >= self.stepper.num_steps {
            return None;
        }

        // Multiply rather than accumulate, so that float error doesn't build
        // up over long runs.
        let elapsed_seconds = self.index as f64 * self.stepper.frame_seconds;
        let instant = ObservationInstant {
            frame: self.index + 1,
            elapsed_seconds,
            epoch: self.stepper.start + Duration::from_seconds(elapsed_seconds),
        };
        self.index += 1;
        Some(instant)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.stepper.num_steps - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TimeSteps {}

/// Convert a local date (e.g. "2023-11-03") and time (e.g. "21:30:00") into a
/// UTC [`Epoch`] by adding `utc_offset_hours` to the local time.
pub fn local_to_utc(
    date: &str,
    time: &str,
    utc_offset_hours: f64,
) -> Result<Epoch, StartTimeError> {
    if !utc_offset_hours.is_finite() || utc_offset_hours.abs() > 24.0 {
        return Err(StartTimeError::BadUtcOffset(utc_offset_hours));
    }

    let joined = format!("{} {}", date.trim(), time.trim());
    let local = START_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&joined, format).ok())
        .ok_or_else(|| StartTimeError::Parse {
            date: date.to_string(),
            time: time.to_string(),
        })?;

    let parse_error = || StartTimeError::Parse {
        date: date.to_string(),
        time: time.to_string(),
    };
    // chrono represents a leap second with nanoseconds >= 1e9. Local leap
    // seconds aren't accepted.
    if local.nanosecond() >= 1_000_000_000 {
        return Err(parse_error());
    }
    let local = Epoch::maybe_from_gregorian_utc(
        local.year(),
        local.month() as u8,
        local.day() as u8,
        local.hour() as u8,
        local.minute() as u8,
        local.second() as u8,
        local.nanosecond(),
    )
    .map_err(|_| parse_error())?;
    Ok(local + Duration::from_seconds(utc_offset_hours * 3600.0))
}

#[derive(Error, Debug)]
pub enum TimeStepperError {
    #[error("The frame duration must be a positive number of seconds, but got {0}")]
    InvalidFrameDuration(f64),

    #[error("The run duration must be a positive number of seconds, but got {0}")]
    InvalidRunDuration(f64),

    #[error("A run of {run} seconds with {frame} second frames has more than {MAX_NUM_STEPS} steps")]
    TooManySteps { run: f64, frame: f64 },
}

#[derive(Error, Debug)]
pub enum StartTimeError {
    #[error("Couldn't parse the start date '{date}' and time '{time}'; expected something like '2023-11-03' '21:30:00'")]
    Parse { date: String, time: String },

    #[error("The UTC offset must be between -24 and 24 hours, but got {0}")]
    BadUtcOffset(f64),
}
