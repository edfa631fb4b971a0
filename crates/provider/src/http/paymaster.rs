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

use alloy_rpc_client::RpcClient;
use alloy_transport_http::Http;
use fundler_types::{SponsorshipData, SponsorshipRequest, UserOperation};
use reqwest::Client;
use tracing::debug;

use super::new_json_rpc_client;
use crate::{Paymaster, ProviderResult};

/// Paymaster client speaking `pm_sponsorUserOperation` over HTTP JSON-RPC
pub struct HttpPaymaster {
    client: RpcClient<Http<Client>>,
}

impl HttpPaymaster {
    /// Create a new `HttpPaymaster` from the service URL
    pub fn new(url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            client: new_json_rpc_client(url)?,
        })
    }
}

#[async_trait::async_trait]
impl Paymaster for HttpPaymaster {
    async fn sponsor_user_operation(
        &self,
        op: &UserOperation,
        request: SponsorshipRequest,
    ) -> ProviderResult<SponsorshipData> {
        debug!("Requesting sponsorship for operation from {}", op.sender);
        let data: SponsorshipData = self
            .client
            .request("pm_sponsorUserOperation", (op.clone(), request))
            .await?;
        Ok(data)
    }
}
