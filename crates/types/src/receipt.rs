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

use alloy_primitives::{Address, B256, U256, U64};
use serde::{Deserialize, Serialize};

/// Receipt for a mined user operation, as returned by a bundler's
/// `eth_getUserOperationReceipt`. Fields we don't consume (logs, full
/// transaction receipt detail) are left to serde's unknown-field handling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationReceipt {
    /// Hash of the user operation
    pub user_op_hash: B256,
    /// Entry point the operation went through
    pub entry_point: Address,
    /// Smart account that executed the operation
    pub sender: Address,
    /// Operation nonce
    pub nonce: U256,
    /// Total gas cost paid for the operation
    pub actual_gas_cost: U256,
    /// Total gas used by the operation
    pub actual_gas_used: U256,
    /// Whether the operation's execution succeeded
    pub success: bool,
    /// Revert reason when execution failed
    #[serde(default)]
    pub reason: Option<String>,
    /// Receipt of the enclosing transaction
    pub receipt: TransactionReceiptLite,
}

/// The slice of the enclosing transaction receipt the flow consumes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceiptLite {
    /// Hash of the transaction that included the operation
    pub transaction_hash: B256,
    /// Hash of the including block
    pub block_hash: B256,
    /// Number of the including block
    pub block_number: U64,
}

/// Terminal result of a successful sponsored submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Hash of the user operation
    pub user_op_hash: B256,
    /// Hash of the transaction that included it
    pub tx_hash: B256,
    /// Block the transaction landed in
    pub block_number: u64,
}

impl From<UserOperationReceipt> for SubmissionReceipt {
    fn from(receipt: UserOperationReceipt) -> Self {
        Self {
            user_op_hash: receipt.user_op_hash,
            tx_hash: receipt.receipt.transaction_hash,
            block_number: receipt.receipt.block_number.to::<u64>(),
        }
    }
}
