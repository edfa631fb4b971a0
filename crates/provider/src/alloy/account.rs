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

use alloy_primitives::{aliases::U192, Address, Bytes, U256};
use alloy_provider::Provider as AlloyProvider;
use alloy_signer::Signer;
use alloy_sol_types::SolCall;
use alloy_transport::Transport;
use fundler_contracts::{account::ISimpleAccount, entry_point::IEntryPoint::IEntryPointInstance};
use fundler_types::{UserCall, UserOperation};

use crate::{ProviderResult, SmartAccount};

/// Smart account implementation for the reference `SimpleAccount`,
/// owner-signed with an EIP-191 signature over the operation hash.
pub struct SimpleSmartAccount<AP, T, S> {
    address: Address,
    chain_id: u64,
    entry_point: IEntryPointInstance<T, AP>,
    signer: S,
}

impl<AP, T, S> SimpleSmartAccount<AP, T, S>
where
    T: Transport + Clone,
    AP: AlloyProvider<T>,
    S: Signer + Send + Sync,
{
    /// Create a new `SimpleSmartAccount` at `address`, validated through the
    /// entry point at `entry_point`. The account must already be deployed.
    pub fn new(
        address: Address,
        chain_id: u64,
        entry_point: Address,
        provider: AP,
        signer: S,
    ) -> Self {
        Self {
            address,
            chain_id,
            entry_point: IEntryPointInstance::new(entry_point, provider),
            signer,
        }
    }
}

// Single calls skip the batch wrapper, matching what wallet SDKs emit.
fn encode_execute(calls: Vec<UserCall>) -> Bytes {
    if calls.len() == 1 {
        let call = calls.into_iter().next().unwrap();
        return ISimpleAccount::executeCall {
            dest: call.to,
            value: U256::ZERO,
            func: call.data,
        }
        .abi_encode()
        .into();
    }
    let (dest, func): (Vec<Address>, Vec<Bytes>) =
        calls.into_iter().map(|c| (c.to, c.data)).unzip();
    ISimpleAccount::executeBatchCall { dest, func }
        .abi_encode()
        .into()
}

#[async_trait::async_trait]
impl<AP, T, S> SmartAccount for SimpleSmartAccount<AP, T, S>
where
    T: Transport + Clone,
    AP: AlloyProvider<T>,
    S: Signer + Send + Sync,
{
    fn address(&self) -> Address {
        self.address
    }

    async fn build_user_operation(&self, calls: Vec<UserCall>) -> ProviderResult<UserOperation> {
        let nonce = self
            .entry_point
            .getNonce(self.address, U192::ZERO)
            .call()
            .await?
            .nonce;

        let provider = self.entry_point.provider();
        let gas_price = provider.get_gas_price().await?;
        let priority_fee = provider.get_max_priority_fee_per_gas().await?;

        Ok(UserOperation {
            sender: self.address,
            nonce,
            call_data: encode_execute(calls),
            max_fee_per_gas: U256::from(gas_price),
            max_priority_fee_per_gas: U256::from(priority_fee.min(gas_price)),
            ..Default::default()
        })
    }

    async fn sign_user_operation(&self, op: &UserOperation) -> ProviderResult<Bytes> {
        let hash = op.hash(*self.entry_point.address(), self.chain_id);
        let signature = self.signer.sign_message(hash.as_slice()).await?;
        Ok(signature.as_bytes().to_vec().into())
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::*;

    #[test]
    fn test_single_call_skips_batch() {
        let dest = address!("0000000000000000000000000000000000000001");
        let call = UserCall::new(dest, vec![0xab]);

        let encoded = encode_execute(vec![call.clone()]);
        let decoded = ISimpleAccount::executeCall::abi_decode(&encoded, true).unwrap();
        assert_eq!(decoded.dest, dest);
        assert_eq!(decoded.value, U256::ZERO);
        assert_eq!(decoded.func, call.data);
    }

    #[test]
    fn test_batch_preserves_order() {
        let a = UserCall::new(address!("0000000000000000000000000000000000000001"), vec![1]);
        let b = UserCall::new(address!("0000000000000000000000000000000000000002"), vec![2]);

        let encoded = encode_execute(vec![a.clone(), b.clone()]);
        let decoded = ISimpleAccount::executeBatchCall::abi_decode(&encoded, true).unwrap();
        assert_eq!(decoded.dest, vec![a.to, b.to]);
        assert_eq!(decoded.func, vec![a.data, b.data]);
    }
}
