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

use alloy_primitives::B256;
use fundler_types::{GasEstimate, UserOperation, UserOperationReceipt};
#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::error::ProviderResult;

/// Trait for the bundler the signed operation is submitted to.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait::async_trait]
pub trait Bundler: Send + Sync {
    /// Estimate gas limits for an unsigned operation
    async fn estimate_user_operation_gas(&self, op: &UserOperation) -> ProviderResult<GasEstimate>;

    /// Submit a signed operation, returning its hash.
    ///
    /// Inclusion is atomic at the chain level; nothing is committed until
    /// the bundler's transaction lands.
    async fn send_user_operation(&self, op: &UserOperation) -> ProviderResult<B256>;

    /// Fetch the receipt for a submitted operation, `None` while pending
    async fn get_user_operation_receipt(
        &self,
        hash: B256,
    ) -> ProviderResult<Option<UserOperationReceipt>>;
}
