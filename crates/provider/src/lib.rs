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

//! Fundler providers
//!
//! Seams to the external services the deposit flow depends on: the chain
//! node for token reads, the smart account layer, the paymaster, and the
//! bundler. Each seam is a trait with one production implementation.

mod alloy;
pub use alloy::{
    account::SimpleSmartAccount, new_alloy_provider, new_simple_smart_account,
    new_token_reader, token::AlloyTokenReader,
};

mod http;
pub use http::{bundler::HttpBundler, paymaster::HttpPaymaster};

mod traits;
pub use traits::*;
