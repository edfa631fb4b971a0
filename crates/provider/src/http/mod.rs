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

//! JSON-RPC clients for the hosted services in the flow: the paymaster and
//! the bundler.

use alloy_rpc_client::{ClientBuilder, RpcClient};
use alloy_transport_http::Http;
use anyhow::Context;
use reqwest::Client;
use url::Url;

pub(crate) mod bundler;
pub(crate) mod paymaster;

pub(crate) fn new_json_rpc_client(url: &str) -> anyhow::Result<RpcClient<Http<Client>>> {
    let url = Url::parse(url).context("invalid service url")?;
    Ok(ClientBuilder::default().http(url))
}
