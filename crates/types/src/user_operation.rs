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

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};

use crate::SponsorshipData;

/// An ERC-4337 v0.6 user operation.
///
/// Built fresh for every submission attempt and immutable once sent. The
/// serde representation matches the JSON wire format expected by bundlers
/// and paymasters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperation {
    /// Smart account the operation executes from
    pub sender: Address,
    /// Anti-replay nonce, tracked by the entry point
    pub nonce: U256,
    /// Account deployment code, empty for an already-deployed sender
    pub init_code: Bytes,
    /// Calldata executed by the sender account
    pub call_data: Bytes,
    /// Gas limit for the execution phase
    pub call_gas_limit: U256,
    /// Gas limit for the verification phase
    pub verification_gas_limit: U256,
    /// Gas charged before verification begins
    pub pre_verification_gas: U256,
    /// Max fee per gas, EIP-1559 style
    pub max_fee_per_gas: U256,
    /// Max priority fee per gas
    pub max_priority_fee_per_gas: U256,
    /// Paymaster address concatenated with its data, empty when unsponsored
    pub paymaster_and_data: Bytes,
    /// Account signature over the operation hash
    pub signature: Bytes,
}

impl UserOperation {
    /// Hash a user operation with the given entry point and chain ID.
    ///
    /// Uniquely identifies the operation in the entry point. Does not
    /// include the signature field.
    pub fn hash(&self, entry_point: Address, chain_id: u64) -> B256 {
        keccak256(
            (
                keccak256(self.pack_for_hash()),
                entry_point,
                U256::from(chain_id),
            )
                .abi_encode(),
        )
    }

    /// Attach a paymaster's sponsorship to the operation.
    ///
    /// Overwrites `paymaster_and_data` and applies any gas overrides the
    /// paymaster returned. Must happen before signing.
    pub fn attach_sponsorship(&mut self, sponsorship: SponsorshipData) {
        self.paymaster_and_data = sponsorship.paymaster_and_data;
        if let Some(pre_verification_gas) = sponsorship.pre_verification_gas {
            self.pre_verification_gas = pre_verification_gas;
        }
        if let Some(verification_gas_limit) = sponsorship.verification_gas_limit {
            self.verification_gas_limit = verification_gas_limit;
        }
        if let Some(call_gas_limit) = sponsorship.call_gas_limit {
            self.call_gas_limit = call_gas_limit;
        }
    }

    /// Apply a gas estimate to the operation's limit fields
    pub fn apply_gas_estimate(&mut self, estimate: &GasEstimate) {
        self.pre_verification_gas = estimate.pre_verification_gas;
        self.verification_gas_limit = estimate.verification_gas_limit;
        self.call_gas_limit = estimate.call_gas_limit;
    }

    fn pack_for_hash(&self) -> Vec<u8> {
        (
            self.sender,
            self.nonce,
            keccak256(&self.init_code),
            keccak256(&self.call_data),
            self.call_gas_limit,
            self.verification_gas_limit,
            self.pre_verification_gas,
            self.max_fee_per_gas,
            self.max_priority_fee_per_gas,
            keccak256(&self.paymaster_and_data),
        )
            .abi_encode()
    }
}

/// Gas limits returned by a bundler's estimation endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasEstimate {
    /// Gas charged before verification begins
    pub pre_verification_gas: U256,
    /// Gas limit for the verification phase
    pub verification_gas_limit: U256,
    /// Gas limit for the execution phase
    pub call_gas_limit: U256,
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, bytes, uint};

    use super::*;

    #[test]
    fn test_wire_format_is_camel_case() {
        let op = UserOperation {
            sender: address!("0000000000000000000000000000000000001234"),
            nonce: uint!(7_U256),
            ..Default::default()
        };
        let json = serde_json::to_value(&op).unwrap();
        let obj = json.as_object().unwrap();
        for key in [
            "sender",
            "nonce",
            "initCode",
            "callData",
            "callGasLimit",
            "verificationGasLimit",
            "preVerificationGas",
            "maxFeePerGas",
            "maxPriorityFeePerGas",
            "paymasterAndData",
            "signature",
        ] {
            assert!(obj.contains_key(key), "missing key {key}");
        }
    }

    #[test]
    fn test_attach_sponsorship() {
        let mut op = UserOperation {
            call_gas_limit: uint!(1_U256),
            ..Default::default()
        };
        op.attach_sponsorship(SponsorshipData {
            paymaster_and_data: bytes!("deadbeef"),
            pre_verification_gas: None,
            verification_gas_limit: Some(uint!(50_000_U256)),
            call_gas_limit: None,
        });
        assert_eq!(op.paymaster_and_data, bytes!("deadbeef"));
        assert_eq!(op.verification_gas_limit, uint!(50_000_U256));
        // untouched fields keep their values
        assert_eq!(op.call_gas_limit, uint!(1_U256));
        assert_eq!(op.pre_verification_gas, U256::ZERO);
    }

    #[test]
    fn test_hash_ignores_signature() {
        let entry_point = address!("5FF137D4b0FDCD49DcA30c7CF57E578a026d2789");
        let mut op = UserOperation::default();
        let unsigned = op.hash(entry_point, 80001);
        op.signature = bytes!("01020304");
        assert_eq!(op.hash(entry_point, 80001), unsigned);
    }

    #[test]
    fn test_hash_commits_to_call_data() {
        let entry_point = address!("5FF137D4b0FDCD49DcA30c7CF57E578a026d2789");
        let op = UserOperation::default();
        let mut other = op.clone();
        other.call_data = bytes!("ff");
        assert_ne!(op.hash(entry_point, 1), other.hash(entry_point, 1));
        // and to the chain id
        assert_ne!(op.hash(entry_point, 1), op.hash(entry_point, 2));
    }
}
