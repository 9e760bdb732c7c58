// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Simulate the (u, v, w) and delays of every telescope pair over a run.


use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

use clap::Parser;
use console::style;
use hifitime::Duration;
use itertools::Itertools;
use log::{debug, info, trace};
use marlu::{LatLngHeight, RADec};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::common::{
    can_write_to_file, display_warnings, InfoPrinter, Warn, ARG_FILE_HELP, ARRAY_POSITION_HELP,
    OUTPUT_DIR_HELP, SITE_HELP, SOURCE_CATALOGUE_HELP, UTC_OFFSET_HELP,
};
use crate::{
    array::{ArrayLayout, Site, TelescopePosition, SITES_COMMA_SEPARATED},
    constants::{
        DEFAULT_OUTPUT_DIR, DEFAULT_UTC_OFFSET_HOURS, NUM_TELESCOPES, VERITAS_CABLE_DELAYS,
        VERITAS_TELESCOPE_POSITIONS,
    },
    direction::{Catalogue, SiderealResolver},
    params::SimulateParams,
    time::{local_to_utc, TimeStepper},
    OpdSimError,
};

/// The run itself. The positional arguments are given in order, e.g.
/// `600 300 2 Gamma Cas 2023-11-03 21:30:00`.
#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct RunArgs {
    /// The length of the run [seconds].
    #[clap(name = "RUN_DURATION", allow_hyphen_values = true)]
    pub(super) run_duration: Option<f64>,

    /// The expected number of frames in the run. This isn't used to do
    /// anything; if it disagrees with the run duration and frame size, a
    /// warning is emitted.
    #[clap(name = "NUM_FRAMES")]
    pub(super) num_frames: Option<usize>,

    /// The time between frames [seconds].
    #[clap(name = "FRAME_SIZE", allow_hyphen_values = true)]
    pub(super) frame_size: Option<f64>,

    /// The first word of the source name, e.g. "Gamma".
    #[clap(name = "SOURCE_A")]
    pub(super) source_a: Option<String>,

    /// The second word of the source name, e.g. "Cas".
    #[clap(name = "SOURCE_B")]
    pub(super) source_b: Option<String>,

    /// The local date of the start of the run, e.g. 2023-11-03.
    #[clap(name = "START_DATE")]
    pub(super) start_date: Option<String>,

    /// The local time of the start of the run, e.g. 21:30:00.
    #[clap(name = "START_TIME")]
    pub(super) start_time: Option<String>,

    #[clap(long, help = UTC_OFFSET_HELP.as_str(), allow_hyphen_values = true, help_heading = "RUN")]
    pub(super) utc_offset: Option<f64>,
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct ArrayArgs {
    #[clap(long, help = SITE_HELP.as_str(), help_heading = "ARRAY")]
    pub(super) site: Option<String>,

    #[clap(
        long, help = ARRAY_POSITION_HELP.as_str(), help_heading = "ARRAY",
        number_of_values = 3,
        allow_hyphen_values = true,
        value_names = &["LONG_DEG", "LAT_DEG", "HEIGHT_M"]
    )]
    pub(super) array_position: Option<Vec<f64>>,

    /// The east, north and up positions of each of the 4 telescopes
    /// [metres]. Default: the 2023 VERITAS survey.
    #[clap(
        long,
        help_heading = "ARRAY",
        number_of_values = 12,
        allow_hyphen_values = true,
        value_names = &["E1", "N1", "U1", "E2", "N2", "U2", "E3", "N3", "U3", "E4", "N4", "U4"]
    )]
    pub(super) telescope_positions: Option<Vec<f64>>,

    /// The signal cable delay of each of the 4 telescopes [nanoseconds].
    /// Default: the VERITAS cable delays.
    #[clap(
        long,
        help_heading = "ARRAY",
        number_of_values = 4,
        allow_hyphen_values = true,
        value_names = &["T1", "T2", "T3", "T4"]
    )]
    pub(super) cable_delays: Option<Vec<f64>>,
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct SourceArgs {
    /// The right ascension of the source [degrees, J2000]. If this and the
    /// declination are given, the source name isn't looked up.
    #[clap(short, long, help_heading = "SOURCE")]
    pub(super) ra: Option<f64>,

    /// The declination of the source [degrees, J2000].
    #[clap(short, long, allow_hyphen_values = true, help_heading = "SOURCE")]
    pub(super) dec: Option<f64>,

    #[clap(long, help = SOURCE_CATALOGUE_HELP.as_str(), help_heading = "SOURCE")]
    pub(super) source_catalogue: Option<PathBuf>,

    /// Use this value as the DUT1 [seconds]. Default: 0
    #[clap(long, allow_hyphen_values = true, help_heading = "SOURCE")]
    pub(super) dut1: Option<f64>,

    /// Don't precess the array's LMST to J2000. This treats the J2000 source
    /// coordinates as if they were of date.
    #[clap(long, help_heading = "SOURCE")]
    #[serde(default)]
    pub(super) no_precession: bool,
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct OutputArgs {
    #[clap(short, long, help = OUTPUT_DIR_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) output_dir: Option<PathBuf>,

    /// Prepended to the pair label of each output file, e.g. with "pyinfo",
    /// files are named like "pyinfoT1T2.txt".
    #[clap(long, help_heading = "OUTPUT FILES")]
    pub(super) output_prefix: Option<String>,

    /// Add the difference in the static cable delays of each pair to the
    /// written delays.
    #[clap(long, help_heading = "OUTPUT FILES")]
    #[serde(default)]
    pub(super) apply_cable_delays: bool,
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct SimulateArgs {
    #[clap(long, help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "run")]
    #[serde(default)]
    pub(super) run_args: RunArgs,

    #[clap(flatten)]
    #[serde(rename = "array")]
    #[serde(default)]
    pub(super) array_args: ArrayArgs,

    #[clap(flatten)]
    #[serde(rename = "source")]
    #[serde(default)]
    pub(super) source_args: SourceArgs,

    #[clap(flatten)]
    #[serde(rename = "output")]
    #[serde(default)]
    pub(super) output_args: OutputArgs,
}

impl SimulateArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<SimulateArgs, OpdSimError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Read in the file arguments. Ensure all of the file args are
            // accounted for by pattern matching.
            let SimulateArgs {
                args_file: _,
                run_args,
                array_args,
                source_args,
                output_args,
            } = unpack_arg_file!(arg_file);

            // Merge all the arguments, preferring the CLI args when available.
            Ok(SimulateArgs {
                args_file: None,
                run_args: cli_args.run_args.merge(run_args),
                array_args: cli_args.array_args.merge(array_args),
                source_args: cli_args.source_args.merge(source_args),
                output_args: cli_args.output_args.merge(output_args),
            })
        } else {
            Ok(cli_args)
        }
    }

    /// Make sense of the arguments. Nothing on disk is touched here.
    fn parse(self) -> Result<SimulateParams, OpdSimError> {
        debug!("{:#?}", self);

        // Expose all the struct fields to ensure they're all used.
        let SimulateArgs {
            args_file: _,
            run_args:
                RunArgs {
                    run_duration,
                    num_frames,
                    frame_size,
                    source_a,
                    source_b,
                    start_date,
                    start_time,
                    utc_offset,
                },
            array_args:
                ArrayArgs {
                    site,
                    array_position,
                    telescope_positions,
                    cable_delays,
                },
            source_args:
                SourceArgs {
                    ra,
                    dec,
                    source_catalogue,
                    dut1,
                    no_precession,
                },
            output_args:
                OutputArgs {
                    output_dir,
                    output_prefix,
                    apply_cable_delays,
                },
        } = self;

        // Time.
        let run_duration = run_duration.ok_or(SimulateArgsError::Missing("RUN_DURATION"))?;
        let frame_size = frame_size.ok_or(SimulateArgsError::Missing("FRAME_SIZE"))?;
        let start_date = start_date.ok_or(SimulateArgsError::Missing("START_DATE"))?;
        let start_time = start_time.ok_or(SimulateArgsError::Missing("START_TIME"))?;
        let utc_offset = utc_offset.unwrap_or(DEFAULT_UTC_OFFSET_HOURS);
        let start = local_to_utc(&start_date, &start_time, utc_offset)?;
        let stepper = TimeStepper::new(start, frame_size, run_duration)?;
        if let Some(num_frames) = num_frames {
            if num_frames != stepper.num_steps() {
                format!(
                    "{num_frames} frames were expected, but a {run_duration}s run with {frame_size}s frames has {}",
                    stepper.num_steps()
                )
                .warn();
            }
        }

        // Site and array.
        let site = match site {
            Some(s) => Site::from_str(&s.to_lowercase())
                .map_err(|_| SimulateArgsError::UnknownSite(s))?,
            None => Site::default(),
        };
        let array_position = match array_position {
            Some(v) => {
                if v.len() != 3
                    || v.iter().any(|x| !x.is_finite())
                    || !(-90.0..=90.0).contains(&v[1])
                {
                    return Err(SimulateArgsError::BadArrayPosition { pos: v }.into());
                }
                LatLngHeight {
                    longitude_rad: v[0].to_radians(),
                    latitude_rad: v[1].to_radians(),
                    height_metres: v[2],
                }
            }
            None => site.position(),
        };
        let positions: Vec<TelescopePosition> = match telescope_positions {
            Some(v) => {
                if v.len() % 3 != 0 {
                    return Err(SimulateArgsError::BadTelescopePositions { num: v.len() }.into());
                }
                v.chunks_exact(3)
                    .map(|c| TelescopePosition::new(c[0], c[1], c[2]))
                    .collect()
            }
            None => VERITAS_TELESCOPE_POSITIONS
                .iter()
                .copied()
                .map(TelescopePosition::from)
                .collect(),
        };
        let cable_delays: Vec<f64> = match cable_delays {
            // ns -> s
            Some(v) => v.into_iter().map(|d| d * 1e-9).collect(),
            None => VERITAS_CABLE_DELAYS.to_vec(),
        };
        let layout = ArrayLayout::new(&positions, &cable_delays)?;

        // Source.
        let source_name = [source_a, source_b].into_iter().flatten().join(" ");
        let (source_name, source) = match (ra, dec) {
            (Some(ra), Some(dec)) => {
                // Verify that the input coordinates are sensible.
                if !(0.0..=360.0).contains(&ra) {
                    return Err(SimulateArgsError::RaInvalid.into());
                }
                if !(-90.0..=90.0).contains(&dec) {
                    return Err(SimulateArgsError::DecInvalid.into());
                }
                let name = if source_name.is_empty() {
                    "<user coordinates>".to_string()
                } else {
                    source_name
                };
                (name, RADec::from_degrees(ra, dec))
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(SimulateArgsError::OnlyOneRAOrDec.into())
            }
            (None, None) => {
                if source_name.is_empty() {
                    return Err(SimulateArgsError::Missing("SOURCE_A").into());
                }
                let catalogue = match source_catalogue {
                    Some(f) => Catalogue::read_file(&f)?,
                    None => Catalogue::builtin(),
                };
                let entry = catalogue.lookup(&source_name)?;
                trace!("'{source_name}' resolved to catalogue entry '{}'", entry.name);
                (entry.name.clone(), entry.radec())
            }
        };

        let dut1 = match dut1 {
            Some(d) if !d.is_finite() => return Err(SimulateArgsError::BadDut1(d).into()),
            Some(d) => Duration::from_seconds(d),
            None => Duration::default(),
        };
        let direction = SiderealResolver::new(source, array_position, dut1, !no_precession);

        // Printing.
        let mut source_printer = InfoPrinter::new(
            format!("Simulating delays towards {}", style(&source_name).bold()).into(),
        );
        source_printer.push_block(vec![
            style("                   RA        Dec").bold().to_string().into(),
            format!(
                "Source:            {:>8.4}° {:>8.4}° (J2000)",
                source.ra.to_degrees(),
                source.dec.to_degrees()
            )
            .into(),
        ]);
        source_printer.push_line(
            format!(
                "Array position:    {:>8.4}° {:>8.4}° {:.4}m",
                array_position.longitude_rad.to_degrees(),
                array_position.latitude_rad.to_degrees(),
                array_position.height_metres
            )
            .into(),
        );
        if no_precession {
            source_printer.push_line("Not precessing the array LMST".into());
        }
        source_printer.display();

        let mut time_printer = InfoPrinter::new("Time info".into());
        time_printer.push_block(vec![
            format!("Local start: {start_date} {start_time} ({utc_offset:+}h to UTC)").into(),
            format!("First timestamp: {start}").into(),
            format!("First timestamp (GPS): {}", start.to_gpst_seconds()).into(),
            {
                let (lst, latitude) = direction.lst_and_latitude(start);
                format!(
                    "First LMST: {:.6}°, array latitude: {:.6}°{}",
                    lst.to_degrees(),
                    latitude.to_degrees(),
                    if no_precession { "" } else { " (J2000)" }
                )
                .into()
            },
        ]);
        time_printer.push_line(
            format!(
                "{} frames of {frame_size}s over {run_duration}s",
                stepper.num_steps()
            )
            .into(),
        );
        time_printer.push_line(format!("DUT1: {:.10} s", dut1.to_seconds()).into());
        time_printer.display();

        let mut array_printer = InfoPrinter::new("Array info".into());
        let mut block = vec![style("Pair      East (m)   North (m)      Up (m)")
            .bold()
            .to_string()
            .into()];
        for baseline in layout.baselines() {
            block.push(
                format!(
                    "{}  {:>10.3}  {:>10.3}  {:>10.3}",
                    baseline.pair.label(),
                    baseline.vector.east,
                    baseline.vector.north,
                    baseline.vector.up
                )
                .into(),
            );
        }
        array_printer.push_block(block);
        if apply_cable_delays {
            array_printer.push_line(
                format!(
                    "Applying cable delays [ns]: {}",
                    layout
                        .cable_delays()
                        .iter()
                        .map(|d| format!("{:.1}", d * 1e9))
                        .join(", ")
                )
                .into(),
            );
        }
        array_printer.display();

        let output_dir = output_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        let output_prefix = output_prefix.unwrap_or_default();
        let mut output_printer = InfoPrinter::new("Output info".into());
        output_printer.push_line(format!("Writing delays to: {}", output_dir.display()).into());
        output_printer.display();

        Ok(SimulateParams {
            layout,
            array_position,
            direction: Box::new(direction),
            stepper,
            output_dir,
            output_prefix,
            apply_cable_delays,
        })
    }

    /// If `save_toml` is given, the arguments are written there once they're
    /// known to be valid.
    pub(super) fn run(self, dry_run: bool, save_toml: Option<&Path>) -> Result<(), OpdSimError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let toml_str = match save_toml {
            Some(_) => Some(toml::to_string(&self).map_err(|e| {
                OpdSimError::Generic(format!("Couldn't serialise the arguments to toml: {e}"))
            })?),
            None => None,
        };
        let params = self.parse()?;

        // A dry run doesn't create the output directory.
        if !dry_run {
            for path in params.output_paths() {
                can_write_to_file(&path)?;
            }
        }
        display_warnings();

        if let (Some(toml_file), Some(toml_str)) = (save_toml, toml_str) {
            let mut f = BufWriter::new(File::create(toml_file)?);
            f.write_all(toml_str.as_bytes())?;
            f.flush()?;
            info!("Arguments saved to {}", toml_file.display());
        }

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        params.run()?;
        Ok(())
    }
}

#[derive(Error, Debug)]
pub(super) enum SimulateArgsError {
    #[error("{0} was not specified")]
    Missing(&'static str),

    #[error("Unknown site '{0}'; supported sites are: {}", *SITES_COMMA_SEPARATED)]
    UnknownSite(String),

    #[error("Array position specified as {pos:?}, not [<Longitude>, <Latitude>, <Height>]")]
    BadArrayPosition { pos: Vec<f64> },

    #[error("{num} telescope position values were given, but {} (east, north, up) triples are needed", NUM_TELESCOPES)]
    BadTelescopePositions { num: usize },

    #[error("DUT1 must be a finite number of seconds, but got {0}")]
    BadDut1(f64),

    #[error("Right Ascension was not within 0 to 360!")]
    RaInvalid,

    #[error("Declination was not within -90 to 90!")]
    DecInvalid,

    #[error("One of RA and Dec was specified, but none or both are required!")]
    OnlyOneRAOrDec,
}

impl RunArgs {
    fn merge(self, other: Self) -> Self {
        Self {
            run_duration: self.run_duration.or(other.run_duration),
            num_frames: self.num_frames.or(other.num_frames),
            frame_size: self.frame_size.or(other.frame_size),
            source_a: self.source_a.or(other.source_a),
            source_b: self.source_b.or(other.source_b),
            start_date: self.start_date.or(other.start_date),
            start_time: self.start_time.or(other.start_time),
            utc_offset: self.utc_offset.or(other.utc_offset),
        }
    }
}

impl ArrayArgs {
    fn merge(self, other: Self) -> Self {
        Self {
            site: self.site.or(other.site),
            array_position: self.array_position.or(other.array_position),
            telescope_positions: self.telescope_positions.or(other.telescope_positions),
            cable_delays: self.cable_delays.or(other.cable_delays),
        }
    }
}

impl SourceArgs {
    fn merge(self, other: Self) -> Self {
        Self {
            ra: self.ra.or(other.ra),
            dec: self.dec.or(other.dec),
            source_catalogue: self.source_catalogue.or(other.source_catalogue),
            dut1: self.dut1.or(other.dut1),
            no_precession: self.no_precession || other.no_precession,
        }
    }
}

impl OutputArgs {
    fn merge(self, other: Self) -> Self {
        Self {
            output_dir: self.output_dir.or(other.output_dir),
            output_prefix: self.output_prefix.or(other.output_prefix),
            apply_cable_delays: self.apply_cable_delays || other.apply_cable_delays,
        }
    }
}
