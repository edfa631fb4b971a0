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

use alloy_primitives::{Address, Bytes};

/// A single contract call destined for a user operation bundle.
///
/// Calls are executed by the smart account in the order they appear in the
/// bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCall {
    /// The contract to call
    pub to: Address,
    /// ABI-encoded calldata
    pub data: Bytes,
}

impl UserCall {
    /// Create a call to `to` with the given calldata
    pub fn new(to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            to,
            data: data.into(),
        }
    }
}
