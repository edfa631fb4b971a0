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
use fundler_types::{UserCall, UserOperation};
#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::error::ProviderResult;

/// Trait for the smart account a deposit executes from.
///
/// Covers operation assembly and signing; fee and nonce sourcing are
/// implementation details.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait::async_trait]
pub trait SmartAccount: Send + Sync {
    /// The account's on-chain address
    fn address(&self) -> Address;

    /// Assemble an unsigned user operation executing `calls` in order.
    ///
    /// Gas limit fields are left for the caller to fill from an estimate;
    /// the signature field is empty.
    async fn build_user_operation(&self, calls: Vec<UserCall>) -> ProviderResult<UserOperation>;

    /// Sign the operation's entry-point hash
    async fn sign_user_operation(&self, op: &UserOperation) -> ProviderResult<Bytes>;
}
