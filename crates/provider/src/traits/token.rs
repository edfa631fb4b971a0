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

use alloy_primitives::{Address, U256};
#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::error::ProviderResult;

/// Trait for reading state of a single configured ERC-20 token.
///
/// One round trip per call, no retries. Balances are raw values in the
/// token's smallest unit.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait::async_trait]
pub trait TokenReader: Send + Sync {
    /// The token's contract address
    fn token(&self) -> Address;

    /// The token's decimal precision.
    ///
    /// Implementations memoize this per instance; only the first call may
    /// hit the chain.
    async fn decimals(&self) -> ProviderResult<u8>;

    /// The raw balance of `account` in smallest units
    async fn balance_of(&self, account: Address) -> ProviderResult<U256>;

    /// Fetch decimal precision and raw balance in one go
    async fn fetch_balance(&self, account: Address) -> ProviderResult<(u8, U256)> {
        let decimals = self.decimals().await?;
        let balance = self.balance_of(account).await?;
        Ok((decimals, balance))
    }
}
