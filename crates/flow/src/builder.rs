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

use alloy_primitives::{
    utils::{parse_units, ParseUnits},
    Address, U256,
};
use alloy_sol_types::SolCall;
use fundler_contracts::{erc20::IERC20, vault::IVault};
use fundler_types::UserCall;

use crate::error::FlowError;

/// Builds the call pair for a vault deposit.
///
/// Pure calldata encoding; the vault is approved as spender before the
/// deposit call within the same bundle.
#[derive(Debug, Clone)]
pub struct DepositCallBuilder {
    token: Address,
    vault: Address,
}

impl DepositCallBuilder {
    /// Create a builder for depositing `token` into `vault`
    pub fn new(token: Address, vault: Address) -> Self {
        Self { token, vault }
    }

    /// Scale a human decimal amount to the token's smallest unit.
    ///
    /// Fails when the amount has more fractional digits than `decimals`
    /// allows, or is not a non-negative decimal number.
    pub fn parse_amount(&self, amount: &str, decimals: u8) -> Result<U256, FlowError> {
        match parse_units(amount, decimals) {
            Ok(ParseUnits::U256(value)) => Ok(value),
            Ok(ParseUnits::I256(_)) => {
                Err(FlowError::Encoding(format!("negative amount {amount}")))
            }
            Err(err) => Err(FlowError::Encoding(err.to_string())),
        }
    }

    /// ERC-20 approval of the vault for `amount`
    pub fn approve_call(&self, amount: U256) -> UserCall {
        UserCall::new(
            self.token,
            IERC20::approveCall {
                spender: self.vault,
                amount,
            }
            .abi_encode(),
        )
    }

    /// Vault deposit of `amount` of the token
    pub fn deposit_call(&self, amount: U256) -> UserCall {
        UserCall::new(
            self.vault,
            IVault::depositCall {
                token: self.token,
                amount,
            }
            .abi_encode(),
        )
    }

    /// The full bundle for a deposit: approval first, then the deposit
    pub fn build(&self, amount: U256) -> Vec<UserCall> {
        vec![self.approve_call(amount), self.deposit_call(amount)]
    }
}
