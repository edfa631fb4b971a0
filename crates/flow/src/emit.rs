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

use std::fmt::Display;

use alloy_primitives::{utils::format_units, B256, U256};

use crate::controller::FlowState;

/// Deposit flow event, broadcast to whatever surface renders the flow
#[derive(Clone, Debug)]
pub enum FlowEvent {
    /// The controller moved between states
    StateChanged {
        /// State before the transition
        from: FlowState,
        /// State after the transition
        to: FlowState,
    },
    /// A fresh token balance was observed
    BalanceUpdated {
        /// Token decimal precision
        decimals: u8,
        /// Raw balance in smallest units
        balance: U256,
    },
    /// A deposit was confirmed on-chain
    DepositConfirmed {
        /// Hash of the confirmed user operation
        user_op_hash: B256,
        /// Hash of the including transaction
        tx_hash: B256,
        /// Block the transaction landed in
        block_number: u64,
    },
    /// A deposit attempt failed
    DepositFailed {
        /// Human-readable failure message
        message: String,
    },
}

impl Display for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlowEvent::StateChanged { from, to } => {
                write!(f, "Flow state: {from:?} -> {to:?}")
            }
            FlowEvent::BalanceUpdated { decimals, balance } => {
                match format_units(*balance, *decimals) {
                    Ok(formatted) => write!(f, "Token balance: {formatted}"),
                    Err(_) => write!(f, "Token balance (raw): {balance}"),
                }
            }
            FlowEvent::DepositConfirmed {
                tx_hash,
                block_number,
                ..
            } => {
                write!(
                    f,
                    "Deposited ERC-20 in transaction {tx_hash:?}, block {block_number}"
                )
            }
            FlowEvent::DepositFailed { message } => {
                write!(f, "Deposit failed: {message}")
            }
        }
    }
}
