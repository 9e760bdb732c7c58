// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Known observatory sites.

use itertools::Itertools;
use marlu::LatLngHeight;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::constants::*;

lazy_static::lazy_static! {
    pub static ref SITES_COMMA_SEPARATED: String = Site::iter().join(", ");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Site {
    #[strum(serialize = "veritas")]
    Veritas,

    #[strum(serialize = "cta-north")]
    CtaNorth,

    #[strum(serialize = "cta-south")]
    CtaSouth,
}

impl Default for Site {
    fn default() -> Self {
        Site::Veritas
    }
}

impl Site {
    /// The Earth position of the site.
    pub fn position(self) -> LatLngHeight {
        let (long_deg, lat_deg, height_m) = match self {
            Site::Veritas => (VERITAS_LONG_DEG, VERITAS_LAT_DEG, VERITAS_HEIGHT_M),
            Site::CtaNorth => (CTA_NORTH_LONG_DEG, CTA_NORTH_LAT_DEG, CTA_NORTH_HEIGHT_M),
            Site::CtaSouth => (CTA_SOUTH_LONG_DEG, CTA_SOUTH_LAT_DEG, CTA_SOUTH_HEIGHT_M),
        };
        LatLngHeight {
            longitude_rad: long_deg.to_radians(),
            latitude_rad: lat_deg.to_radians(),
            height_metres: height_m,
        }
    }
}
