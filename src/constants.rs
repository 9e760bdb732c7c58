// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision. All geometry is done in double
precision.
 */

pub use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// The speed of light used when converting w coordinates to delays \[m/s\].
/// This is the rounded value the downstream analysis uses, not
/// [`marlu::constants::VEL_C`].
pub const SPEED_OF_LIGHT: f64 = 2.998e8;

/// The number of telescopes in the array.
pub const NUM_TELESCOPES: usize = 4;

/// The number of telescope pairs, i.e. `NUM_TELESCOPES` choose 2.
pub const NUM_PAIRS: usize = NUM_TELESCOPES * (NUM_TELESCOPES - 1) / 2;

/// Labels of the telescope pairs, in the canonical pair order. These are also
/// the output file stems.
pub const PAIR_LABELS: [&str; NUM_PAIRS] = ["T1T2", "T1T3", "T1T4", "T2T3", "T2T4", "T3T4"];

/// VERITAS array longitude \[degrees\]
pub const VERITAS_LONG_DEG: f64 = -110.952;
/// VERITAS array latitude \[degrees\]
pub const VERITAS_LAT_DEG: f64 = 31.675;
/// VERITAS array height \[metres\]
pub const VERITAS_HEIGHT_M: f64 = 1270.0;

/// CTA north site longitude \[degrees\]
pub const CTA_NORTH_LONG_DEG: f64 = -17.892;
/// CTA north site latitude \[degrees\]
pub const CTA_NORTH_LAT_DEG: f64 = 28.762;
/// CTA north site height \[metres\]
pub const CTA_NORTH_HEIGHT_M: f64 = 2187.0;

/// CTA south site longitude \[degrees\]
pub const CTA_SOUTH_LONG_DEG: f64 = -70.316;
/// CTA south site latitude \[degrees\]
pub const CTA_SOUTH_LAT_DEG: f64 = -24.683;
/// CTA south site height \[metres\]
pub const CTA_SOUTH_HEIGHT_M: f64 = 2640.0;

/// East, north and up positions of the VERITAS telescopes \[metres\], as
/// surveyed in 2023 to cm precision.
pub const VERITAS_TELESCOPE_POSITIONS: [[f64; 3]; NUM_TELESCOPES] = [
    [135.48, -8.61, 12.23],
    [44.836, -49.601, 5.102],
    [29.335, 60.022, 10.636],
    [-35.885, 11.742, 6.417],
];

/// Signal cable delays of the VERITAS telescopes \[seconds\].
pub const VERITAS_CABLE_DELAYS: [f64; NUM_TELESCOPES] = [676.8e-9, 585.0e-9, 955.0e-9, 1063.7e-9];

/// The number of hours added to the local start time to get UTC, by
/// default. This is right for the VERITAS site (MST, no daylight saving).
pub const DEFAULT_UTC_OFFSET_HOURS: f64 = 7.0;

/// The default directory for the per-pair output files.
pub const DEFAULT_OUTPUT_DIR: &str = "delays";
