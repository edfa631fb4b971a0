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

use alloy_primitives::Address;
use alloy_provider::{Provider as AlloyProvider, ProviderBuilder};
use alloy_rpc_client::ClientBuilder;
use alloy_signer_local::PrivateKeySigner;
use alloy_transport::Transport;
use alloy_transport_http::Http;
use anyhow::Context;
use reqwest::Client;
use url::Url;

pub(crate) mod account;
pub(crate) mod token;

use account::SimpleSmartAccount;
use token::AlloyTokenReader;

/// Create a new alloy provider from a given RPC URL
pub fn new_alloy_provider(
    rpc_url: &str,
) -> anyhow::Result<impl AlloyProvider<Http<Client>> + Clone> {
    let url = Url::parse(rpc_url).context("invalid rpc url")?;
    let client = ClientBuilder::default().http(url);
    Ok(ProviderBuilder::new().on_client(client))
}

/// Create a token reader for `token` on top of an alloy provider
pub fn new_token_reader<AP, T>(token: Address, provider: AP) -> AlloyTokenReader<AP, T>
where
    T: Transport + Clone,
    AP: AlloyProvider<T>,
{
    AlloyTokenReader::new(token, provider)
}

/// Create a simple smart account from a hex-encoded owner key
pub fn new_simple_smart_account<AP, T>(
    account: Address,
    owner_key: &str,
    chain_id: u64,
    entry_point: Address,
    provider: AP,
) -> anyhow::Result<SimpleSmartAccount<AP, T, PrivateKeySigner>>
where
    T: Transport + Clone,
    AP: AlloyProvider<T>,
{
    let signer = owner_key
        .parse::<PrivateKeySigner>()
        .context("invalid owner key")?;
    Ok(SimpleSmartAccount::new(
        account,
        chain_id,
        entry_point,
        provider,
        signer,
    ))
}
