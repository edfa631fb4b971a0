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

use alloy_primitives::B256;
use async_trait::async_trait;
use fundler_provider::{Bundler, Paymaster, SmartAccount};
use fundler_types::{SponsorshipRequest, SubmissionReceipt, UserCall, UserOperationReceipt};
use metrics::{Counter, Histogram};
use metrics_derive::Metrics;
#[cfg(test)]
use mockall::automock;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::error::FlowError;

/// A submitter of call bundles as sponsored user operations.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Submitter: Send + Sync {
    /// Submit `calls` as one sponsored operation and wait for inclusion
    async fn submit(&self, calls: Vec<UserCall>) -> Result<SubmissionReceipt, FlowError>;
}

/// Settings for sponsored submission
#[derive(Debug, Clone)]
pub struct SubmitSettings {
    /// How long to wait for the operation receipt before giving up
    pub confirmation_timeout: Duration,
    /// Interval between receipt polls
    pub receipt_poll_interval: Duration,
}

impl Default for SubmitSettings {
    fn default() -> Self {
        Self {
            confirmation_timeout: Duration::from_secs(120),
            receipt_poll_interval: Duration::from_secs(1),
        }
    }
}

/// Submits call bundles through the sponsored user-operation pipeline:
/// assemble, estimate, sponsor, sign, send, await inclusion. Any step
/// failing aborts the whole submission; nothing commits on-chain before
/// the bundler's transaction lands.
#[derive(Debug)]
pub struct SponsoredSubmitter<A, P, B> {
    account: A,
    paymaster: P,
    bundler: B,
    settings: SubmitSettings,
    metrics: SubmitterMetric,
}

impl<A, P, B> SponsoredSubmitter<A, P, B>
where
    A: SmartAccount,
    P: Paymaster,
    B: Bundler,
{
    /// Create a new `SponsoredSubmitter`
    pub fn new(account: A, paymaster: P, bundler: B, settings: SubmitSettings) -> Self {
        Self {
            account,
            paymaster,
            bundler,
            settings,
            metrics: SubmitterMetric::default(),
        }
    }

    async fn submit_inner(&self, calls: Vec<UserCall>) -> Result<SubmissionReceipt, FlowError> {
        let mut op = self.account.build_user_operation(calls).await?;

        let estimate = self
            .bundler
            .estimate_user_operation_gas(&op)
            .await
            .map_err(FlowError::Submission)?;
        op.apply_gas_estimate(&estimate);

        let sponsorship = self
            .paymaster
            .sponsor_user_operation(&op, SponsorshipRequest::default())
            .await
            .map_err(FlowError::Sponsorship)?;
        op.attach_sponsorship(sponsorship);

        op.signature = self.account.sign_user_operation(&op).await?;

        let op_hash = self
            .bundler
            .send_user_operation(&op)
            .await
            .map_err(FlowError::Submission)?;
        info!("Sent user operation {op_hash:?}");

        let receipt = self.wait_for_receipt(op_hash).await?;
        if !receipt.success {
            return Err(FlowError::Reverted {
                reason: receipt.reason.unwrap_or_else(|| "unknown".to_string()),
            });
        }
        Ok(receipt.into())
    }

    async fn wait_for_receipt(&self, op_hash: B256) -> Result<UserOperationReceipt, FlowError> {
        let deadline = Instant::now() + self.settings.confirmation_timeout;
        loop {
            if let Some(receipt) = self
                .bundler
                .get_user_operation_receipt(op_hash)
                .await
                .map_err(FlowError::Submission)?
            {
                debug!(
                    "User operation {op_hash:?} mined in block {}",
                    receipt.receipt.block_number
                );
                return Ok(receipt);
            }
            if Instant::now() >= deadline {
                warn!("No receipt for user operation {op_hash:?} before deadline");
                return Err(FlowError::ConfirmationTimeout(
                    self.settings.confirmation_timeout,
                ));
            }
            tokio::time::sleep(self.settings.receipt_poll_interval).await;
        }
    }
}

#[async_trait]
impl<A, P, B> Submitter for SponsoredSubmitter<A, P, B>
where
    A: SmartAccount,
    P: Paymaster,
    B: Bundler,
{
    #[instrument(skip_all)]
    async fn submit(&self, calls: Vec<UserCall>) -> Result<SubmissionReceipt, FlowError> {
        self.metrics.submissions_started.increment(1);
        let start = Instant::now();
        match self.submit_inner(calls).await {
            Ok(receipt) => {
                self.metrics.submissions_confirmed.increment(1);
                self.metrics
                    .confirmation_time
                    .record(start.elapsed().as_secs_f64());
                Ok(receipt)
            }
            Err(error) => {
                self.metrics.submissions_failed.increment(1);
                Err(error)
            }
        }
    }
}

#[derive(Metrics)]
#[metrics(scope = "fundler_submitter")]
struct SubmitterMetric {
    #[metric(describe = "the count of sponsored submissions started.")]
    submissions_started: Counter,
    #[metric(describe = "the count of sponsored submissions confirmed on-chain.")]
    submissions_confirmed: Counter,
    #[metric(describe = "the count of sponsored submissions that failed.")]
    submissions_failed: Counter,
    #[metric(describe = "the duration distribution from send to confirmation.")]
    confirmation_time: Histogram,
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, Bytes, U256};
    use fundler_provider::{
        MockBundler, MockPaymaster, MockSmartAccount, ProviderError,
    };
    use fundler_types::{GasEstimate, SponsorshipData, TransactionReceiptLite, UserOperation};
    use mockall::Sequence;

    use super::*;

    fn new_submitter(
        account: MockSmartAccount,
        paymaster: MockPaymaster,
        bundler: MockBundler,
    ) -> SponsoredSubmitter<MockSmartAccount, MockPaymaster, MockBundler> {
        SponsoredSubmitter::new(
            account,
            paymaster,
            bundler,
            SubmitSettings {
                confirmation_timeout: Duration::from_secs(5),
                receipt_poll_interval: Duration::from_millis(100),
            },
        )
    }

    fn calls() -> Vec<UserCall> {
        vec![
            UserCall::new(Address::ZERO, vec![1]),
            UserCall::new(Address::ZERO, vec![2]),
        ]
    }

    fn receipt(op_hash: B256, success: bool) -> UserOperationReceipt {
        UserOperationReceipt {
            user_op_hash: op_hash,
            success,
            reason: (!success).then(|| "vault: paused".to_string()),
            receipt: TransactionReceiptLite {
                transaction_hash: B256::repeat_byte(2),
                block_hash: B256::repeat_byte(3),
                block_number: alloy_primitives::U64::from(42),
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_submit_success_runs_steps_in_order() {
        let mut account = MockSmartAccount::new();
        let mut paymaster = MockPaymaster::new();
        let mut bundler = MockBundler::new();
        let mut seq = Sequence::new();
        let op_hash = B256::repeat_byte(1);

        account
            .expect_build_user_operation()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(UserOperation::default()));
        bundler
            .expect_estimate_user_operation_gas()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(GasEstimate {
                    pre_verification_gas: U256::from(21_000),
                    verification_gas_limit: U256::from(100_000),
                    call_gas_limit: U256::from(50_000),
                })
            });
        paymaster
            .expect_sponsor_user_operation()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|op, _| op.call_gas_limit == U256::from(50_000))
            .returning(|_, _| {
                Ok(SponsorshipData {
                    paymaster_and_data: Bytes::from_static(&[0xaa]),
                    ..Default::default()
                })
            });
        account
            .expect_sign_user_operation()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|op| op.paymaster_and_data == Bytes::from_static(&[0xaa]))
            .returning(|_| Ok(Bytes::from_static(&[0xbb])));
        bundler
            .expect_send_user_operation()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|op| op.signature == Bytes::from_static(&[0xbb]))
            .returning(move |_| Ok(op_hash));
        bundler
            .expect_get_user_operation_receipt()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |hash| Ok(Some(receipt(hash, true))));

        let submitter = new_submitter(account, paymaster, bundler);
        let result = submitter.submit(calls()).await.unwrap();
        assert_eq!(result.user_op_hash, op_hash);
        assert_eq!(result.tx_hash, B256::repeat_byte(2));
        assert_eq!(result.block_number, 42);
    }

    #[tokio::test]
    async fn test_sponsorship_failure_aborts_before_send() {
        let mut account = MockSmartAccount::new();
        let mut paymaster = MockPaymaster::new();
        let mut bundler = MockBundler::new();

        account
            .expect_build_user_operation()
            .returning(|_| Ok(UserOperation::default()));
        bundler
            .expect_estimate_user_operation_gas()
            .returning(|_| Ok(GasEstimate::default()));
        paymaster.expect_sponsor_user_operation().returning(|_, _| {
            Err(ProviderError::Contract("paymaster: not whitelisted".into()))
        });
        // no expectations on sign/send: reaching them fails the test

        let submitter = new_submitter(account, paymaster, bundler);
        let result = submitter.submit(calls()).await;
        assert!(matches!(result, Err(FlowError::Sponsorship(_))));
    }

    #[tokio::test]
    async fn test_bundler_rejection_is_submission_error() {
        let mut account = MockSmartAccount::new();
        let mut paymaster = MockPaymaster::new();
        let mut bundler = MockBundler::new();

        account
            .expect_build_user_operation()
            .returning(|_| Ok(UserOperation::default()));
        account
            .expect_sign_user_operation()
            .returning(|_| Ok(Bytes::new()));
        bundler
            .expect_estimate_user_operation_gas()
            .returning(|_| Ok(GasEstimate::default()));
        paymaster
            .expect_sponsor_user_operation()
            .returning(|_, _| Ok(SponsorshipData::default()));
        bundler
            .expect_send_user_operation()
            .returning(|_| Err(ProviderError::Contract("replacement underpriced".into())));

        let submitter = new_submitter(account, paymaster, bundler);
        let result = submitter.submit(calls()).await;
        assert!(matches!(result, Err(FlowError::Submission(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmation_timeout() {
        let mut account = MockSmartAccount::new();
        let mut paymaster = MockPaymaster::new();
        let mut bundler = MockBundler::new();

        account
            .expect_build_user_operation()
            .returning(|_| Ok(UserOperation::default()));
        account
            .expect_sign_user_operation()
            .returning(|_| Ok(Bytes::new()));
        bundler
            .expect_estimate_user_operation_gas()
            .returning(|_| Ok(GasEstimate::default()));
        paymaster
            .expect_sponsor_user_operation()
            .returning(|_, _| Ok(SponsorshipData::default()));
        bundler
            .expect_send_user_operation()
            .returning(|_| Ok(B256::ZERO));
        // never mined
        bundler
            .expect_get_user_operation_receipt()
            .returning(|_| Ok(None));

        let submitter = new_submitter(account, paymaster, bundler);
        let result = submitter.submit(calls()).await;
        assert!(matches!(result, Err(FlowError::ConfirmationTimeout(_))));
    }

    #[tokio::test]
    async fn test_reverted_operation_is_an_error() {
        let mut account = MockSmartAccount::new();
        let mut paymaster = MockPaymaster::new();
        let mut bundler = MockBundler::new();

        account
            .expect_build_user_operation()
            .returning(|_| Ok(UserOperation::default()));
        account
            .expect_sign_user_operation()
            .returning(|_| Ok(Bytes::new()));
        bundler
            .expect_estimate_user_operation_gas()
            .returning(|_| Ok(GasEstimate::default()));
        paymaster
            .expect_sponsor_user_operation()
            .returning(|_, _| Ok(SponsorshipData::default()));
        bundler
            .expect_send_user_operation()
            .returning(|_| Ok(B256::ZERO));
        bundler
            .expect_get_user_operation_receipt()
            .returning(|hash| Ok(Some(receipt(hash, false))));

        let submitter = new_submitter(account, paymaster, bundler);
        match submitter.submit(calls()).await {
            Err(FlowError::Reverted { reason }) => assert_eq!(reason, "vault: paused"),
            other => panic!("expected revert error, got {other:?}"),
        }
    }
}
