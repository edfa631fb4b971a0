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

use std::time::Duration;

use fundler_provider::ProviderError;

/// Deposit flow error type
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// The entered amount cannot be represented at the token's decimal
    /// precision
    #[error("invalid amount: {0}")]
    Encoding(String),
    /// The paymaster rejected sponsorship or was unreachable
    #[error("sponsorship failed: {0}")]
    Sponsorship(#[source] ProviderError),
    /// The bundler rejected the operation or was unreachable
    #[error("submission failed: {0}")]
    Submission(#[source] ProviderError),
    /// The operation was included but its execution reverted
    #[error("operation reverted: {reason}")]
    Reverted {
        /// Revert reason reported by the bundler, if any
        reason: String,
    },
    /// No confirmation arrived within the configured window
    #[error("no confirmation after {0:?}")]
    ConfirmationTimeout(Duration),
    /// A submission is already in flight for this controller
    #[error("a submission is already in flight")]
    AlreadyInFlight,
    /// Error from assembling or signing the operation
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// Internal errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
