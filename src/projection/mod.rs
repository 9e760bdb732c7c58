// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Project baselines into (u, v, w) and get the optical path delay.


use marlu::HADec;

use crate::{array::BaselineVector, constants::SPEED_OF_LIGHT};

/// The (u,v,w) coordinates of a baseline \[metres\]. w points toward the
/// source.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProjectedSample {
    pub u: f64,
    pub v: f64,
    pub w: f64,
}

impl ProjectedSample {
    /// The projected baseline length, sqrt(u^2 + v^2) \[metres\].
    pub fn baseline_length(&self) -> f64 {
        ((self.u * self.u) + (self.v * self.v)).sqrt()
    }

    /// The geometric delay between the two telescopes, -w / c \[seconds\].
    pub fn delay(&self) -> f64 {
        -(self.w / SPEED_OF_LIGHT)
    }

    /// The geometric delay between the two telescopes \[nanoseconds\].
    pub fn delay_ns(&self) -> f64 {
        -1.0e9 * (self.w / SPEED_OF_LIGHT)
    }
}

/// The sines and cosines needed to project any baseline for a single source
/// direction. Making one of these per time step means the trigonometry isn't
/// repeated for each baseline.
#[derive(Clone, Copy, Debug)]
pub struct Projector {
    s_ha: f64,
    c_ha: f64,
    s_dec: f64,
    c_dec: f64,
    s_lat: f64,
    c_lat: f64,
}

impl Projector {
    pub fn new(hadec: HADec, latitude_rad: f64) -> Projector {
        Projector {
            s_ha: hadec.ha.sin(),
            c_ha: hadec.ha.cos(),
            s_dec: hadec.dec.sin(),
            c_dec: hadec.dec.cos(),
            s_lat: latitude_rad.sin(),
            c_lat: latitude_rad.cos(),
        }
    }

    /// Rotate a local (east, north, up) baseline into (u, v, w).
    pub fn project(&self, baseline: BaselineVector) -> ProjectedSample {
        let Projector {
            s_ha,
            c_ha,
            s_dec,
            c_dec,
            s_lat,
            c_lat,
        } = *self;
        let BaselineVector {
            east: d0,
            north: d1,
            up: d2,
        } = baseline;

        // The grouping of terms here is kept as-is so that results are
        // reproducible to the last bit.
        let u = (d0 * c_ha) + (-d1 * s_lat * s_ha) + (d2 * c_lat * s_ha);
        let v = (d0 * s_ha * s_dec)
            + (d1 * s_lat * c_ha * s_dec + d1 * c_lat * c_dec)
            + (-d2 * c_lat * c_ha * s_dec + d2 * s_lat * c_dec);
        let w = (-d0 * s_ha * c_dec)
            + (-d1 * s_lat * c_ha * c_dec + d1 * c_lat * s_dec)
            + (d2 * c_lat * c_ha * c_dec + d2 * s_lat * s_dec);

        ProjectedSample { u, v, w }
    }
}

/// Project a single baseline. [`Projector`] is better when projecting many
/// baselines toward the same direction.
pub fn project(baseline: BaselineVector, hadec: HADec, latitude_rad: f64) -> ProjectedSample {
    Projector::new(hadec, latitude_rad).project(baseline)
}
