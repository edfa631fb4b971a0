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

use fundler_types::{SponsorshipData, SponsorshipRequest, UserOperation};
#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::error::ProviderResult;

/// Trait for the fee-sponsoring paymaster service.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait::async_trait]
pub trait Paymaster: Send + Sync {
    /// Request sponsorship for `op`.
    ///
    /// The grant is only valid for the exact operation it was issued for
    /// and must be attached before signing.
    async fn sponsor_user_operation(
        &self,
        op: &UserOperation,
        request: SponsorshipRequest,
    ) -> ProviderResult<SponsorshipData>;
}
