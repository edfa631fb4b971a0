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

use alloy_primitives::{Bytes, U256};
use serde::{Deserialize, Serialize};

/// Fee payment mode requested from the paymaster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SponsorshipMode {
    /// The paymaster covers the full operation fee
    #[default]
    Sponsored,
}

/// Context sent alongside the operation when requesting sponsorship
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SponsorshipRequest {
    /// Requested payment mode
    pub mode: SponsorshipMode,
}

/// Sponsorship granted by a paymaster for a single user operation.
///
/// Attached to the operation before signing; a grant is single-use and only
/// valid for the exact operation it was issued for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorshipData {
    /// Paymaster address concatenated with its validation data
    pub paymaster_and_data: Bytes,
    /// Pre-verification gas override, if the paymaster requires one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_verification_gas: Option<U256>,
    /// Verification gas limit override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_gas_limit: Option<U256>,
    /// Call gas limit override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_gas_limit: Option<U256>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_wire_format() {
        let json = serde_json::to_string(&SponsorshipRequest::default()).unwrap();
        assert_eq!(json, r#"{"mode":"SPONSORED"}"#);
    }
}
