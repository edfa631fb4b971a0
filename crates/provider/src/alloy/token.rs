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
use alloy_provider::Provider as AlloyProvider;
use alloy_transport::Transport;
use fundler_contracts::erc20::IERC20::IERC20Instance;
use tokio::sync::OnceCell;

use crate::{ProviderError, ProviderResult, TokenReader};

/// Token reader implementation using [alloy-provider](https://github.com/alloy-rs/alloy)
pub struct AlloyTokenReader<AP, T> {
    erc20: IERC20Instance<T, AP>,
    // decimals are constant for a deployed token, fetch once per session
    decimals: OnceCell<u8>,
}

impl<AP, T> AlloyTokenReader<AP, T>
where
    T: Transport + Clone,
    AP: AlloyProvider<T>,
{
    /// Create a new `AlloyTokenReader` for the token at `token`
    pub fn new(token: Address, provider: AP) -> Self {
        Self {
            erc20: IERC20Instance::new(token, provider),
            decimals: OnceCell::new(),
        }
    }
}

#[async_trait::async_trait]
impl<AP, T> TokenReader for AlloyTokenReader<AP, T>
where
    T: Transport + Clone,
    AP: AlloyProvider<T>,
{
    fn token(&self) -> Address {
        *self.erc20.address()
    }

    async fn decimals(&self) -> ProviderResult<u8> {
        self.decimals
            .get_or_try_init(|| async {
                Ok::<_, ProviderError>(self.erc20.decimals().call().await?._0)
            })
            .await
            .copied()
    }

    async fn balance_of(&self, account: Address) -> ProviderResult<U256> {
        Ok(self.erc20.balanceOf(account).call().await?._0)
    }
}
