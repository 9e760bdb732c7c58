// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all opd-sim-related errors. This should be the *only* error
//! enum that is publicly visible from the CLI.

use thiserror::Error;

use super::{common::FileWriteError, simulate::SimulateArgsError};
use crate::{
    array::ArrayLayoutError,
    direction::CatalogueError,
    params::SimulateError,
    series::SeriesWriteError,
    time::{StartTimeError, TimeStepperError},
};

/// The *only* publicly visible error from opd-sim.
#[derive(Error, Debug)]
pub enum OpdSimError {
    /// Something was wrong with the supplied parameters; nothing has been
    /// computed or written.
    #[error("{0}\n\nSee `opd-sim simulate --help` for the expected arguments.")]
    Configuration(String),

    /// An error related to argument files.
    #[error("{0}\n\nArgument files hold the same options as the command line, e.g. for toml:\n\n[output]\noutput_dir = \"delays\"")]
    ArgFile(String),

    /// An error related to resolving a source name.
    #[error("{0}\n\nUse `opd-sim catalogue` to list the known sources, or supply --ra and --dec.")]
    Catalogue(String),

    /// An error while writing the output files.
    #[error("{0}")]
    Write(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

impl From<SimulateArgsError> for OpdSimError {
    fn from(e: SimulateArgsError) -> Self {
        Self::Configuration(e.to_string())
    }
}

impl From<ArrayLayoutError> for OpdSimError {
    fn from(e: ArrayLayoutError) -> Self {
        Self::Configuration(e.to_string())
    }
}

impl From<TimeStepperError> for OpdSimError {
    fn from(e: TimeStepperError) -> Self {
        Self::Configuration(e.to_string())
    }
}

impl From<StartTimeError> for OpdSimError {
    fn from(e: StartTimeError) -> Self {
        Self::Configuration(e.to_string())
    }
}

impl From<CatalogueError> for OpdSimError {
    fn from(e: CatalogueError) -> Self {
        match e {
            CatalogueError::IO(e) => Self::from(e),
            _ => Self::Catalogue(e.to_string()),
        }
    }
}

impl From<FileWriteError> for OpdSimError {
    fn from(e: FileWriteError) -> Self {
        match e {
            FileWriteError::IO(e) => Self::from(e),
            _ => Self::Write(e.to_string()),
        }
    }
}

impl From<SeriesWriteError> for OpdSimError {
    fn from(e: SeriesWriteError) -> Self {
        Self::Write(e.to_string())
    }
}

impl From<SimulateError> for OpdSimError {
    fn from(e: SimulateError) -> Self {
        match e {
            SimulateError::SeriesWrite(e) => Self::from(e),
        }
    }
}

impl From<std::io::Error> for OpdSimError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
