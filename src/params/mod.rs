// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parameters that are ready to be run.
//!
//! The code here "mirrors" the code within the `cli` module; `cli` is
//! unparsed, user-facing code, whereas parameters have been parsed and
//! validated and can be used directly.

mod simulate;

pub(crate) use simulate::{SimulateError, SimulateParams};
