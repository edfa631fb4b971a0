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

use alloy_primitives::{Address, B256};
use alloy_rpc_client::RpcClient;
use alloy_transport_http::Http;
use fundler_types::{GasEstimate, UserOperation, UserOperationReceipt};
use reqwest::Client;
use tracing::debug;

use super::new_json_rpc_client;
use crate::{Bundler, ProviderResult};

/// Bundler client speaking the ERC-4337 `eth_*` namespace over HTTP JSON-RPC
pub struct HttpBundler {
    client: RpcClient<Http<Client>>,
    entry_point: Address,
}

impl HttpBundler {
    /// Create a new `HttpBundler` from the service URL and the entry point
    /// operations should be submitted through
    pub fn new(url: &str, entry_point: Address) -> anyhow::Result<Self> {
        Ok(Self {
            client: new_json_rpc_client(url)?,
            entry_point,
        })
    }
}

#[async_trait::async_trait]
impl Bundler for HttpBundler {
    async fn estimate_user_operation_gas(&self, op: &UserOperation) -> ProviderResult<GasEstimate> {
        let estimate: GasEstimate = self
            .client
            .request(
                "eth_estimateUserOperationGas",
                (op.clone(), self.entry_point),
            )
            .await?;
        Ok(estimate)
    }

    async fn send_user_operation(&self, op: &UserOperation) -> ProviderResult<B256> {
        debug!("Sending user operation from {}", op.sender);
        let hash: B256 = self
            .client
            .request("eth_sendUserOperation", (op.clone(), self.entry_point))
            .await?;
        Ok(hash)
    }

    async fn get_user_operation_receipt(
        &self,
        hash: B256,
    ) -> ProviderResult<Option<UserOperationReceipt>> {
        let receipt: Option<UserOperationReceipt> = self
            .client
            .request("eth_getUserOperationReceipt", (hash,))
            .await?;
        Ok(receipt)
    }
}
