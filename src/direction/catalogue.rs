// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Named sources and their J2000 positions.
//!
//! Catalogue files contain a list of sources under a "sources" key, e.g. in
//! yaml:
//!
//! ```yaml
//! sources:
//!   - name: Vega
//!     aliases: [alf Lyr, Alpha Lyr]
//!     ra_deg: 279.234735
//!     dec_deg: 38.783689
//! ```
//!
//! Names and aliases are matched ignoring case and repeated whitespace.

use std::{
    collections::HashMap,
    fs::File,
    io::Read,
    path::{Path, PathBuf},
    str::FromStr,
};

use itertools::Itertools;
use log::{debug, trace};
use marlu::RADec;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

lazy_static::lazy_static! {
    pub static ref CATALOGUE_TYPES_COMMA_SEPARATED: String = CatalogueFileType::iter().join(", ");
}

/// (name, aliases, RA \[degrees\], Dec \[degrees\]), all J2000.
const BUILTIN_SOURCES: &[(&str, &[&str], f64, f64)] = &[
    ("Vega", &["alf Lyr", "Alpha Lyr"], 279.234735, 38.783689),
    ("Sirius", &["alf CMa", "Alpha CMa"], 101.287155, -16.716116),
    ("Betelgeuse", &["alf Ori", "Alpha Ori"], 88.792939, 7.407064),
    ("Rigel", &["bet Ori", "Beta Ori"], 78.634467, -8.201638),
    ("Bellatrix", &["gam Ori", "Gamma Ori"], 81.282764, 6.349703),
    ("Alnilam", &["eps Ori", "Epsilon Ori"], 84.053389, -1.201919),
    ("Alnitak", &["zet Ori", "Zeta Ori"], 85.189694, -1.942572),
    ("Saiph", &["kap Ori", "Kappa Ori"], 86.939120, -9.669605),
    ("Mirzam", &["bet CMa", "Beta CMa"], 95.674939, -17.955919),
    ("Adhara", &["eps CMa", "Epsilon CMa"], 104.656453, -28.972086),
    ("Navi", &["gam Cas", "Gamma Cas"], 14.177215, 60.716740),
    ("Capella", &["alf Aur", "Alpha Aur"], 79.172328, 45.997991),
    ("Aldebaran", &["alf Tau", "Alpha Tau"], 68.980163, 16.509302),
    ("Procyon", &["alf CMi", "Alpha CMi"], 114.825493, 5.224993),
    ("Pollux", &["bet Gem", "Beta Gem"], 116.328958, 28.026199),
    ("Regulus", &["alf Leo", "Alpha Leo"], 152.092962, 11.967208),
    ("Dubhe", &["alf UMa", "Alpha UMa"], 165.931965, 61.751035),
    ("Merak", &["bet UMa", "Beta UMa"], 165.460319, 56.382427),
    ("Alkaid", &["eta UMa", "Benetnasch"], 206.885157, 49.313267),
    ("Spica", &["alf Vir", "Alpha Vir"], 201.298247, -11.161319),
    ("Arcturus", &["alf Boo", "Alpha Boo"], 213.915300, 19.182409),
    ("Antares", &["alf Sco", "Alpha Sco"], 247.351915, -26.432003),
    ("Altair", &["alf Aql", "Alpha Aql"], 297.695827, 8.868321),
    ("Deneb", &["alf Cyg", "Alpha Cyg"], 310.357980, 45.280339),
    ("Polaris", &["alf UMi", "Alpha UMi"], 37.954561, 89.264109),
];

#[derive(Debug, Display, EnumIter, EnumString)]
enum CatalogueFileType {
    #[strum(serialize = "yaml", serialize = "yml")]
    Yaml,
    #[strum(serialize = "json")]
    Json,
    #[strum(serialize = "toml")]
    Toml,
}

/// A source with a known position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogueEntry {
    pub name: String,

    #[serde(default)]
    pub aliases: Vec<String>,

    /// J2000 right ascension \[degrees\]
    pub ra_deg: f64,

    /// J2000 declination \[degrees\]
    pub dec_deg: f64,
}

impl CatalogueEntry {
    pub fn radec(&self) -> RADec {
        RADec::from_degrees(self.ra_deg, self.dec_deg)
    }
}

#[derive(Serialize, Deserialize)]
struct CatalogueFile {
    sources: Vec<CatalogueEntry>,
}

#[derive(Clone, Debug)]
pub struct Catalogue {
    entries: Vec<CatalogueEntry>,

    /// Normalised names and aliases to indices into `entries`.
    lookup: HashMap<String, usize>,
}

impl Catalogue {
    fn new(entries: Vec<CatalogueEntry>) -> Result<Catalogue, CatalogueError> {
        let mut lookup = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            if !(0.0..360.0).contains(&entry.ra_deg) {
                return Err(CatalogueError::RaInvalid {
                    name: entry.name.clone(),
                    ra: entry.ra_deg,
                });
            }
            if !(-90.0..=90.0).contains(&entry.dec_deg) {
                return Err(CatalogueError::DecInvalid {
                    name: entry.name.clone(),
                    dec: entry.dec_deg,
                });
            }

            for key in std::iter::once(&entry.name).chain(entry.aliases.iter()) {
                let key = normalise_name(key);
                if key.is_empty() {
                    return Err(CatalogueError::EmptyName);
                }
                // A source may repeat its own name in its aliases.
                match lookup.insert(key, i) {
                    Some(other) if other != i => {
                        return Err(CatalogueError::Duplicate {
                            name: entry.name.clone(),
                        })
                    }
                    _ => (),
                }
            }
        }

        Ok(Catalogue { entries, lookup })
    }

    /// The catalogue of bright stars that comes with this crate.
    pub fn builtin() -> Catalogue {
        let entries = BUILTIN_SOURCES
            .iter()
            .map(|&(name, aliases, ra_deg, dec_deg)| CatalogueEntry {
                name: name.to_string(),
                aliases: aliases.iter().map(|a| a.to_string()).collect(),
                ra_deg,
                dec_deg,
            })
            .collect();
        // Every built-in position and name is checked by the tests.
        match Catalogue::new(entries) {
            Ok(c) => c,
            Err(e) => panic!("The built-in catalogue is invalid: {e}"),
        }
    }

    /// Read a catalogue from a yaml, json or toml file. The type is determined
    /// by the file extension.
    pub fn read_file(path: &Path) -> Result<Catalogue, CatalogueError> {
        debug!("Attempting to read catalogue file {}", path.display());
        let file_type = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| CatalogueFileType::from_str(&e).ok())
            .ok_or_else(|| CatalogueError::UnsupportedExt {
                path: path.to_path_buf(),
            })?;

        let mut contents = String::new();
        File::open(path)?.read_to_string(&mut contents)?;
        let parse_error = |err: String| CatalogueError::Parse {
            path: path.to_path_buf(),
            err,
        };
        let file: CatalogueFile = match file_type {
            CatalogueFileType::Yaml => {
                serde_yaml::from_str(&contents).map_err(|e| parse_error(e.to_string()))?
            }
            CatalogueFileType::Json => {
                serde_json::from_str(&contents).map_err(|e| parse_error(e.to_string()))?
            }
            CatalogueFileType::Toml => {
                toml::from_str(&contents).map_err(|e| parse_error(e.to_string()))?
            }
        };
        trace!("Read {} catalogue entries", file.sources.len());

        Catalogue::new(file.sources)
    }

    /// Find a source by its name or one of its aliases.
    pub fn lookup(&self, name: &str) -> Result<&CatalogueEntry, CatalogueError> {
        self.lookup
            .get(&normalise_name(name))
            .map(|&i| &self.entries[i])
            .ok_or_else(|| CatalogueError::NotFound {
                name: name.to_string(),
            })
    }

    pub fn entries(&self) -> &[CatalogueEntry] {
        &self.entries
    }
}

fn normalise_name(name: &str) -> String {
    name.split_whitespace().join(" ").to_lowercase()
}

#[derive(Error, Debug)]
pub enum CatalogueError {
    #[error("Couldn't find a source named '{name}' in the catalogue")]
    NotFound { name: String },

    #[error("Catalogue file '{}' doesn't have a recognised file extension! Valid extensions are: {}", .path.display(), *CATALOGUE_TYPES_COMMA_SEPARATED)]
    UnsupportedExt { path: PathBuf },

    #[error("Couldn't decode catalogue file '{}': {err}", .path.display())]
    Parse { path: PathBuf, err: String },

    #[error("Source '{name}' has RA {ra}, which is not within 0 to 360")]
    RaInvalid { name: String, ra: f64 },

    #[error("Source '{name}' has Dec {dec}, which is not within -90 to 90")]
    DecInvalid { name: String, dec: f64 },

    #[error("Source '{name}' shares a name or alias with another source")]
    Duplicate { name: String },

    #[error("A source has an empty name or alias")]
    EmptyName,

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
