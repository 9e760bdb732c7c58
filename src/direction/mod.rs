// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Where the source is, as seen from the array at a given time.

pub mod catalogue;
#[cfg(test)]
mod tests;

pub use catalogue::{Catalogue, CatalogueEntry, CatalogueError, CATALOGUE_TYPES_COMMA_SEPARATED};

use hifitime::{Duration, Epoch};
use marlu::{
    precession::{get_lmst, precess_time},
    HADec, LatLngHeight, RADec,
};

use crate::constants::TAU;

/// The hour angle and declination of the source, along with the array
/// latitude in the same frame. The projection must use this latitude, not the
/// geographic one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedDirection {
    pub hadec: HADec,

    /// \[radians\]
    pub latitude_rad: f64,
}

/// Something that can tell us the hour angle and declination of the source at
/// any time. Hour angles need not be in any particular range; see
/// [`normalise_hour_angle`].
pub trait DirectionResolver {
    fn resolve(&self, epoch: Epoch) -> ResolvedDirection;
}

/// A source that never moves in the sky. Useful if the geometry at a
/// particular hour angle is all that's wanted.
#[derive(Clone, Copy, Debug)]
pub struct FixedDirection {
    pub hadec: HADec,

    /// \[radians\]
    pub latitude_rad: f64,
}

impl DirectionResolver for FixedDirection {
    fn resolve(&self, _epoch: Epoch) -> ResolvedDirection {
        ResolvedDirection {
            hadec: self.hadec,
            latitude_rad: self.latitude_rad,
        }
    }
}

/// Resolves the direction of a J2000 source with the local sidereal time of
/// the array.
#[derive(Clone, Copy, Debug)]
pub struct SiderealResolver {
    source: RADec,
    array_position: LatLngHeight,
    dut1: Duration,
    precess: bool,
}

impl SiderealResolver {
    /// If `precess` is true, the array's LMST and latitude are precessed back
    /// to J2000 (the frame of the source coordinates) before the hour angle is
    /// found.
    pub fn new(
        source: RADec,
        array_position: LatLngHeight,
        dut1: Duration,
        precess: bool,
    ) -> SiderealResolver {
        SiderealResolver {
            source,
            array_position,
            dut1,
            precess,
        }
    }

    /// The local sidereal time and latitude of the array \[radians\]. Both
    /// are J2000 if precessing, otherwise they're of date.
    pub fn lst_and_latitude(&self, epoch: Epoch) -> (f64, f64) {
        let LatLngHeight {
            longitude_rad,
            latitude_rad,
            ..
        } = self.array_position;
        if self.precess {
            let info = precess_time(longitude_rad, latitude_rad, self.source, epoch, self.dut1);
            (info.lmst_j2000, info.array_latitude_j2000)
        } else {
            (get_lmst(longitude_rad, epoch, self.dut1), latitude_rad)
        }
    }

    /// The local sidereal time at the array \[radians\].
    pub fn lst(&self, epoch: Epoch) -> f64 {
        self.lst_and_latitude(epoch).0
    }
}

impl DirectionResolver for SiderealResolver {
    fn resolve(&self, epoch: Epoch) -> ResolvedDirection {
        let (lst, latitude_rad) = self.lst_and_latitude(epoch);
        ResolvedDirection {
            hadec: HADec {
                ha: site_hour_angle(self.array_position.longitude_rad, lst, self.source.ra),
                dec: self.source.dec,
            },
            latitude_rad,
        }
    }
}

/// The hour angle of a source, found as the difference between the array
/// longitude and the Earth-fixed longitude of the source. The Earth-fixed
/// longitude is kept in [0, 2π), so the result lies in (longitude - 2π,
/// longitude] and may have a magnitude greater than 2π for western sites.
pub fn site_hour_angle(longitude_rad: f64, lst_rad: f64, ra_rad: f64) -> f64 {
    // Greenwich sidereal time.
    let gst = lst_rad - longitude_rad;
    let source_longitude = (ra_rad - gst).rem_euclid(TAU);
    longitude_rad - source_longitude
}

/// Hour angles larger in magnitude than 2π have one full turn added or
/// subtracted. Anything else is returned untouched; in particular, values
/// between π and 2π in magnitude are *not* wrapped to (-π, π].
pub fn normalise_hour_angle(ha: f64) -> f64 {
    if ha > TAU {
        ha - TAU
    } else if ha < -TAU {
        ha + TAU
    } else {
        ha
    }
}
