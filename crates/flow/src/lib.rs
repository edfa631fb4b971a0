// This file is part of Fundler.
//
// Fundler is free software: you can redistribute it and/or modify it under the
// terms of the GNU Lesser General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version.
//
// Fundler is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with Fundler.
// If not, see https://www.gnu.org/licenses/.

#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]
#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]

//! Fundler deposit flow
//!
//! Orchestrates a gas-sponsored ERC-20 vault deposit: builds the approve and
//! deposit calls, submits them as one sponsored user operation, and tracks
//! the flow state for the frontend surface.

mod builder;
pub use builder::DepositCallBuilder;

mod controller;
pub use controller::{
    BalanceSnapshot, DepositController, FlowState, RefreshSettings, SessionContext,
};

mod emit;
pub use emit::FlowEvent;

mod error;
pub use error::FlowError;

mod submitter;
pub use submitter::{SponsoredSubmitter, SubmitSettings, Submitter};
