// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Projected baselines and optical path delays for a four-telescope array.

For every pair of telescopes, the baseline is projected towards a source at
each frame of an observation run, and the resulting (u, v) coordinates and
delays are written to one text file per pair.
 */

pub mod array;
mod cli;
pub mod constants;
pub mod direction;
mod params;
pub mod projection;
pub mod series;
pub mod time;

// Re-exports.
pub use array::{ArrayLayout, Baseline, BaselineVector, Site, TelescopePair, TelescopePosition};
pub use cli::{OpdSim, OpdSimError};
pub use direction::{DirectionResolver, FixedDirection, ResolvedDirection, SiderealResolver};
pub use projection::{ProjectedSample, Projector};
pub use series::{PairSeries, SeriesCollector};
pub use time::{ObservationInstant, TimeStepper};

use crossbeam_utils::atomic::AtomicCell;

/// Are progress bars being drawn? This should only ever be enabled by CLI
/// code.
pub(crate) static PROGRESS_BARS: AtomicCell<bool> = AtomicCell::new(false);
