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

use alloy_transport::TransportError;

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Error enumeration for the provider traits
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// JSON-RPC transport error
    #[error(transparent)]
    Rpc(#[from] TransportError),
    /// Typed contract call error
    #[error("contract error: {0}")]
    Contract(String),
    /// Signing error
    #[error(transparent)]
    Signer(#[from] alloy_signer::Error),
    /// Internal errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<alloy_contract::Error> for ProviderError {
    fn from(error: alloy_contract::Error) -> Self {
        match error {
            alloy_contract::Error::TransportError(e) => Self::Rpc(e),
            other => Self::Contract(other.to_string()),
        }
    }
}
