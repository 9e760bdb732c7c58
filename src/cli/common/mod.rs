// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Things shared by the command-line interfaces: help texts, argument files,
//! pretty printing and output-file checks.

mod printers;

pub(super) use printers::InfoPrinter;
pub(crate) use printers::{display_warnings, Warn};

use std::path::{Path, PathBuf};

use itertools::Itertools;
use log::trace;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::{
    array::SITES_COMMA_SEPARATED,
    constants::{
        DEFAULT_OUTPUT_DIR, DEFAULT_UTC_OFFSET_HOURS, VERITAS_HEIGHT_M, VERITAS_LAT_DEG,
        VERITAS_LONG_DEG,
    },
    direction::CATALOGUE_TYPES_COMMA_SEPARATED,
};

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);

    pub(super) static ref SITE_HELP: String =
        format!("The observatory site. Supported sites: {}. Default: veritas", *SITES_COMMA_SEPARATED);

    pub(super) static ref ARRAY_POSITION_HELP: String =
        format!("The Earth longitude, latitude, and height of the array [degrees, degrees, meters]. Overrides --site. Default (VERITAS): ({VERITAS_LONG_DEG}°, {VERITAS_LAT_DEG}°, {VERITAS_HEIGHT_M}m)");

    pub(super) static ref UTC_OFFSET_HELP: String =
        format!("The number of hours added to the local start time to get UTC [hours]. Default: {DEFAULT_UTC_OFFSET_HOURS}");

    pub(super) static ref SOURCE_CATALOGUE_HELP: String =
        format!("A catalogue file to look up the source name in, instead of the built-in catalogue. Supported formats: {}", *CATALOGUE_TYPES_COMMA_SEPARATED);

    pub(super) static ref OUTPUT_DIR_HELP: String =
        format!("The directory to write the per-pair delay files to. Default: {DEFAULT_OUTPUT_DIR}");
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

/// Read an arguments struct from a toml or json file. The type is determined by
/// the file extension. Errors are returned as [`OpdSimError::ArgFile`] from the
/// calling function.
///
/// [`OpdSimError::ArgFile`]: crate::OpdSimError::ArgFile
macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::{fs::File, io::Read, str::FromStr};

        use crate::cli::common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED};

        debug!("Attempting to parse argument file {}", $arg_file.display());

        let mut contents = String::new();
        let arg_file_type = $arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());

        match arg_file_type {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match toml::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(OpdSimError::ArgFile(format!(
                            "Couldn't decode toml structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }
            Some(ArgFileTypes::Json) => {
                debug!("Parsing json file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match serde_json::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(OpdSimError::ArgFile(format!(
                            "Couldn't decode json structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }

            None => {
                return Err(OpdSimError::ArgFile(format!(
                    "Argument file '{:?}' doesn't have a recognised file extension! Valid extensions are: {}", $arg_file, *ARG_FILE_TYPES_COMMA_SEPARATED)
                ))
            }
        }
    });
}

/// Check if we are able to write to a file path. If the directory containing
/// the file doesn't exist, it is created; if it can't be created, or the file
/// isn't writable, an error is returned. If the file exists, emit a warning
/// that it will be overwritten.
///
/// This code _doesn't_ alter the file if it exists.
pub(super) fn can_write_to_file(file: &Path) -> Result<(), FileWriteError> {
    trace!("Testing whether we can write to {}", file.display());

    if file.is_dir() {
        return Err(FileWriteError::IsADirectory(file.to_path_buf()));
    }

    let file_exists = file.exists();
    if !file_exists {
        if let Some(p) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
            match std::fs::DirBuilder::new()
                .recursive(true)
                .create(p)
                .map_err(|e| e.kind())
            {
                Ok(()) => (),
                Err(std::io::ErrorKind::PermissionDenied) => {
                    return Err(FileWriteError::NewDirectory(p.to_path_buf()))
                }
                Err(e) => return Err(FileWriteError::IO(e.into())),
            }
        }
    }

    match std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(file)
        .map_err(|e| e.kind())
    {
        // File is writable. If it didn't already exist, `OpenOptions::new`
        // created it; we don't want to keep the 0-sized file.
        Ok(_) => {
            if !file_exists {
                std::fs::remove_file(file)?;
            }
        }

        Err(std::io::ErrorKind::PermissionDenied) => {
            return Err(FileWriteError::FileNotWritable {
                file: file.to_path_buf(),
            })
        }

        Err(e) => return Err(FileWriteError::IO(e.into())),
    }

    if file_exists {
        format!("Will overwrite the existing file '{}'", file.display()).warn();
    }

    Ok(())
}

#[derive(Error, Debug)]
pub(super) enum FileWriteError {
    #[error("Tried to write to '{}', but it is a directory", .0.display())]
    IsADirectory(PathBuf),

    #[error("Couldn't create directory '{}' for writing", .0.display())]
    NewDirectory(PathBuf),

    #[error("Cannot write to the file '{}'; check its permissions", .file.display())]
    FileNotWritable { file: PathBuf },

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
