// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The telescope array: positions, pairs and the baseline vectors between
//! them.
//!
//! The first telescope of a pair is considered to be the origin of that pair's
//! baseline.

mod site;

pub use site::{Site, SITES_COMMA_SEPARATED};

use std::ops::Sub;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    NUM_PAIRS, NUM_TELESCOPES, VERITAS_CABLE_DELAYS, VERITAS_TELESCOPE_POSITIONS,
};

/// The local position of a telescope relative to the array centre \[metres\].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TelescopePosition {
    pub east: f64,
    pub north: f64,
    pub up: f64,
}

impl TelescopePosition {
    pub fn new(east: f64, north: f64, up: f64) -> Self {
        Self { east, north, up }
    }

    fn is_finite(&self) -> bool {
        self.east.is_finite() && self.north.is_finite() && self.up.is_finite()
    }
}

impl From<[f64; 3]> for TelescopePosition {
    fn from([east, north, up]: [f64; 3]) -> Self {
        Self { east, north, up }
    }
}

impl Sub for TelescopePosition {
    type Output = BaselineVector;

    fn sub(self, rhs: Self) -> BaselineVector {
        BaselineVector {
            east: self.east - rhs.east,
            north: self.north - rhs.north,
            up: self.up - rhs.up,
        }
    }
}

/// The separation between two telescopes, pointing from the origin telescope
/// to the target telescope \[metres\].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BaselineVector {
    pub east: f64,
    pub north: f64,
    pub up: f64,
}

impl BaselineVector {
    /// Get the vector from telescope `origin` to telescope `target`. Unlike
    /// the canonical pairs, any two indices are accepted here, including
    /// `origin == target` and `origin > target`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds for `positions`.
    pub fn between(positions: &[TelescopePosition], origin: usize, target: usize) -> Self {
        positions[target] - positions[origin]
    }

    /// The 3-D length of this vector \[metres\].
    pub fn length(&self) -> f64 {
        (self.east * self.east + self.north * self.north + self.up * self.up).sqrt()
    }
}

/// Two telescopes. `origin` is always less than `target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TelescopePair {
    pub origin: usize,
    pub target: usize,
}

impl TelescopePair {
    /// All telescope pairs in the canonical order; (0,1), (0,2), (0,3), (1,2),
    /// (1,3), (2,3). Output files are named in this order too.
    pub fn all() -> [TelescopePair; NUM_PAIRS] {
        let mut pairs = [TelescopePair {
            origin: 0,
            target: 0,
        }; NUM_PAIRS];
        let mut i_pair = 0;
        for origin in 0..NUM_TELESCOPES {
            for target in origin + 1..NUM_TELESCOPES {
                pairs[i_pair] = TelescopePair { origin, target };
                i_pair += 1;
            }
        }
        pairs
    }

    /// The label of this pair, which uses 1-based telescope numbers (e.g.
    /// "T1T2" for the pair (0,1)).
    pub fn label(&self) -> String {
        format!("T{}T{}", self.origin + 1, self.target + 1)
    }
}

/// A baseline vector with the pair of telescopes it came from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Baseline {
    pub pair: TelescopePair,
    pub vector: BaselineVector,
}

/// The positions of all the telescopes in the array, as well as their signal
/// cable delays. Nothing here changes after it's been made.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayLayout {
    positions: [TelescopePosition; NUM_TELESCOPES],

    /// \[seconds\]
    cable_delays: [f64; NUM_TELESCOPES],
}

impl ArrayLayout {
    /// Make a new layout. Exactly [`NUM_TELESCOPES`] positions and cable
    /// delays must be supplied.
    pub fn new(
        positions: &[TelescopePosition],
        cable_delays: &[f64],
    ) -> Result<ArrayLayout, ArrayLayoutError> {
        let positions: [TelescopePosition; NUM_TELESCOPES] =
            positions
                .try_into()
                .map_err(|_| ArrayLayoutError::WrongNumberOfPositions {
                    got: positions.len(),
                })?;
        if let Some(index) = positions.iter().position(|p| !p.is_finite()) {
            return Err(ArrayLayoutError::NonFinitePosition { index });
        }

        let cable_delays: [f64; NUM_TELESCOPES] =
            cable_delays
                .try_into()
                .map_err(|_| ArrayLayoutError::WrongNumberOfCableDelays {
                    got: cable_delays.len(),
                })?;
        if let Some(index) = cable_delays.iter().position(|d| !d.is_finite()) {
            return Err(ArrayLayoutError::NonFiniteCableDelay { index });
        }

        Ok(ArrayLayout {
            positions,
            cable_delays,
        })
    }

    /// The VERITAS telescopes.
    pub fn veritas() -> ArrayLayout {
        ArrayLayout {
            positions: VERITAS_TELESCOPE_POSITIONS.map(TelescopePosition::from),
            cable_delays: VERITAS_CABLE_DELAYS,
        }
    }

    pub fn positions(&self) -> &[TelescopePosition; NUM_TELESCOPES] {
        &self.positions
    }

    pub fn cable_delays(&self) -> &[f64; NUM_TELESCOPES] {
        &self.cable_delays
    }

    /// Get the baseline vector of each telescope pair, in the canonical pair
    /// order.
    pub fn baselines(&self) -> [Baseline; NUM_PAIRS] {
        TelescopePair::all().map(|pair| Baseline {
            pair,
            vector: BaselineVector::between(&self.positions, pair.origin, pair.target),
        })
    }

    /// The difference in signal cable delay between the target and origin
    /// telescopes of a pair \[seconds\].
    pub fn differential_cable_delay(&self, pair: TelescopePair) -> f64 {
        self.cable_delays[pair.target] - self.cable_delays[pair.origin]
    }
}

impl Default for ArrayLayout {
    fn default() -> Self {
        Self::veritas()
    }
}

#[derive(Error, Debug)]
pub enum ArrayLayoutError {
    #[error("Expected {NUM_TELESCOPES} telescope positions, but got {got}")]
    WrongNumberOfPositions { got: usize },

    #[error("Expected {NUM_TELESCOPES} cable delays, but got {got}")]
    WrongNumberOfCableDelays { got: usize },

    #[error("The position of telescope {} is not finite", .index + 1)]
    NonFinitePosition { index: usize },

    #[error("The cable delay of telescope {} is not finite", .index + 1)]
    NonFiniteCableDelay { index: usize },
}
