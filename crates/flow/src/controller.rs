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

use alloy_primitives::{Address, U256};
use fundler_provider::TokenReader;
use fundler_types::SubmissionReceipt;
use tokio::{sync::broadcast, time::Instant};
use tracing::{debug, error, warn};

use crate::{
    builder::DepositCallBuilder, emit::FlowEvent, error::FlowError, submitter::Submitter,
};

/// Session context for the deposit surface.
///
/// Everything the flow needs from the surrounding wallet session is passed
/// in explicitly; a missing account turns reads and deposits into no-ops.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionContext {
    /// The connected smart account, if any
    pub account: Option<Address>,
}

/// Deposit flow state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// Waiting for user input
    Idle,
    /// A submission is in flight
    Submitting,
    /// The last submission confirmed
    Success,
    /// The last submission failed
    Failed,
}

/// Last observed token balance for the session account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceSnapshot {
    /// Token decimal precision
    pub decimals: u8,
    /// Raw balance in smallest units
    pub raw: U256,
}

/// Settings for the post-deposit balance refresh
#[derive(Debug, Clone)]
pub struct RefreshSettings {
    /// Interval between balance polls
    pub poll_interval: Duration,
    /// How long to poll for an updated balance before giving up
    pub refresh_timeout: Duration,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            refresh_timeout: Duration::from_secs(30),
        }
    }
}

/// Drives the deposit surface: holds the flow state, balance snapshot, and
/// entered amount, and wires user actions to the call builder and the
/// sponsored submitter.
///
/// Single logical writer; every submission attempt takes a fresh operation
/// token and completions carrying a superseded token are dropped.
#[derive(Debug)]
pub struct DepositController<T, S> {
    context: SessionContext,
    builder: DepositCallBuilder,
    token_reader: T,
    submitter: S,
    settings: RefreshSettings,
    state: FlowState,
    amount: String,
    balance: Option<BalanceSnapshot>,
    next_op_token: u64,
    in_flight: Option<u64>,
    event_sender: broadcast::Sender<FlowEvent>,
}

impl<T, S> DepositController<T, S>
where
    T: TokenReader,
    S: Submitter,
{
    /// Create a new `DepositController`
    pub fn new(
        context: SessionContext,
        builder: DepositCallBuilder,
        token_reader: T,
        submitter: S,
        settings: RefreshSettings,
    ) -> Self {
        let (event_sender, _) = broadcast::channel(64);
        Self {
            context,
            builder,
            token_reader,
            submitter,
            settings,
            state: FlowState::Idle,
            amount: String::new(),
            balance: None,
            next_op_token: 0,
            in_flight: None,
            event_sender,
        }
    }

    /// Subscribe to flow events
    pub fn subscribe(&self) -> broadcast::Receiver<FlowEvent> {
        self.event_sender.subscribe()
    }

    /// Current flow state
    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Last observed balance, if any was fetched
    pub fn balance(&self) -> Option<BalanceSnapshot> {
        self.balance
    }

    /// The currently entered deposit amount
    pub fn amount(&self) -> &str {
        &self.amount
    }

    /// Set the deposit amount, as the user typed it
    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.amount = amount.into();
    }

    /// Fetch the token's decimal precision and the account's balance.
    ///
    /// Silent no-op when no account is connected.
    pub async fn refresh_balance(&mut self) -> Result<Option<BalanceSnapshot>, FlowError> {
        let Some(account) = self.context.account else {
            debug!("No account in session, skipping balance fetch");
            return Ok(None);
        };
        let (decimals, raw) = self.token_reader.fetch_balance(account).await?;
        let snapshot = BalanceSnapshot { decimals, raw };
        self.update_balance(snapshot);
        Ok(Some(snapshot))
    }

    /// Submit the entered amount as a sponsored deposit.
    ///
    /// No-ops when no account is connected or the amount is zero. Fails
    /// fast when a submission is already in flight. On success the input
    /// is cleared and the balance re-read until it reflects the deposit;
    /// on failure the input is cleared and the error surfaced.
    pub async fn deposit(&mut self) -> Result<Option<SubmissionReceipt>, FlowError> {
        let Some(account) = self.context.account else {
            debug!("No account in session, skipping deposit");
            return Ok(None);
        };
        if self.in_flight.is_some() {
            return Err(FlowError::AlreadyInFlight);
        }

        let decimals = match self.balance {
            Some(snapshot) => snapshot.decimals,
            None => self.token_reader.decimals().await?,
        };
        let amount = match self.builder.parse_amount(&self.amount, decimals) {
            Ok(amount) => amount,
            Err(error) => {
                self.amount.clear();
                self.emit(FlowEvent::DepositFailed {
                    message: error.to_string(),
                });
                return Err(error);
            }
        };
        if amount.is_zero() {
            debug!("Zero deposit amount, nothing to submit");
            return Ok(None);
        }

        let op_token = self.begin_submission();
        let result = self.submitter.submit(self.builder.build(amount)).await;
        self.finish_submission(account, op_token, result).await
    }

    fn begin_submission(&mut self) -> u64 {
        self.next_op_token += 1;
        self.in_flight = Some(self.next_op_token);
        self.set_state(FlowState::Submitting);
        self.next_op_token
    }

    async fn finish_submission(
        &mut self,
        account: Address,
        op_token: u64,
        result: Result<SubmissionReceipt, FlowError>,
    ) -> Result<Option<SubmissionReceipt>, FlowError> {
        if self.in_flight != Some(op_token) {
            warn!("Dropping stale completion for operation token {op_token}");
            return Ok(None);
        }
        self.in_flight = None;
        self.amount.clear();

        match result {
            Ok(receipt) => {
                self.set_state(FlowState::Success);
                self.emit(FlowEvent::DepositConfirmed {
                    user_op_hash: receipt.user_op_hash,
                    tx_hash: receipt.tx_hash,
                    block_number: receipt.block_number,
                });
                let previous = self.balance.map(|snapshot| snapshot.raw);
                self.refresh_balance_until_changed(account, previous).await;
                self.set_state(FlowState::Idle);
                Ok(Some(receipt))
            }
            Err(error) => {
                error!("Deposit failed: {error}");
                self.set_state(FlowState::Failed);
                self.emit(FlowEvent::DepositFailed {
                    message: error.to_string(),
                });
                self.set_state(FlowState::Idle);
                Err(error)
            }
        }
    }

    // The confirmation only proves inclusion; the node we read balances
    // from may lag the bundler. Poll until the balance moves or the
    // deadline passes, keeping whatever was last read.
    async fn refresh_balance_until_changed(&mut self, account: Address, previous: Option<U256>) {
        let deadline = Instant::now() + self.settings.refresh_timeout;
        loop {
            match self.token_reader.fetch_balance(account).await {
                Ok((decimals, raw)) => {
                    self.update_balance(BalanceSnapshot { decimals, raw });
                    if Some(raw) != previous {
                        return;
                    }
                }
                Err(error) => warn!("Balance refresh failed: {error}"),
            }
            if Instant::now() >= deadline {
                warn!("Balance did not update before the refresh deadline");
                return;
            }
            tokio::time::sleep(self.settings.poll_interval).await;
        }
    }

    fn update_balance(&mut self, snapshot: BalanceSnapshot) {
        let changed = self.balance != Some(snapshot);
        self.balance = Some(snapshot);
        if changed {
            self.emit(FlowEvent::BalanceUpdated {
                decimals: snapshot.decimals,
                balance: snapshot.raw,
            });
        }
    }

    fn set_state(&mut self, to: FlowState) {
        let from = self.state;
        self.state = to;
        debug!("Flow state {from:?} -> {to:?}");
        self.emit(FlowEvent::StateChanged { from, to });
    }

    fn emit(&self, event: FlowEvent) {
        // nobody listening is fine
        let _ = self.event_sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, B256};
    use fundler_provider::{MockTokenReader, ProviderError};
    use tokio::sync::broadcast::error::TryRecvError;

    use super::*;
    use crate::submitter::MockSubmitter;

    const ACCOUNT: Address = address!("00000000000000000000000000000000000000aa");
    const TOKEN: Address = address!("2791bca1f2de4661ed88a30c99a7a9449aa84174");
    const VAULT: Address = address!("000000000000000000000000000000000000beef");

    fn new_controller(
        account: Option<Address>,
        token_reader: MockTokenReader,
        submitter: MockSubmitter,
    ) -> DepositController<MockTokenReader, MockSubmitter> {
        DepositController::new(
            SessionContext { account },
            DepositCallBuilder::new(TOKEN, VAULT),
            token_reader,
            submitter,
            RefreshSettings::default(),
        )
    }

    fn submission_receipt() -> SubmissionReceipt {
        SubmissionReceipt {
            user_op_hash: B256::repeat_byte(1),
            tx_hash: B256::repeat_byte(2),
            block_number: 42,
        }
    }

    fn drain(events: &mut broadcast::Receiver<FlowEvent>) -> Vec<FlowEvent> {
        let mut out = Vec::new();
        loop {
            match events.try_recv() {
                Ok(event) => out.push(event),
                Err(TryRecvError::Empty) => return out,
                Err(err) => panic!("event stream broken: {err}"),
            }
        }
    }

    #[tokio::test]
    async fn test_zero_amount_is_not_submitted() {
        let mut token_reader = MockTokenReader::new();
        token_reader.expect_decimals().times(1).returning(|| Ok(6));
        // no submitter expectations: any submit call fails the test
        let mut controller = new_controller(Some(ACCOUNT), token_reader, MockSubmitter::new());
        let mut events = controller.subscribe();

        controller.set_amount("0");
        let result = controller.deposit().await.unwrap();

        assert!(result.is_none());
        assert_eq!(controller.state(), FlowState::Idle);
        assert!(drain(&mut events).is_empty());
    }

    #[tokio::test]
    async fn test_missing_account_is_a_silent_noop() {
        // no reader or submitter expectations: nothing may be called
        let mut controller =
            new_controller(None, MockTokenReader::new(), MockSubmitter::new());

        controller.set_amount("1.5");
        assert!(controller.deposit().await.unwrap().is_none());
        assert!(controller.refresh_balance().await.unwrap().is_none());
        assert_eq!(controller.state(), FlowState::Idle);
        // input is not cleared by the no-op
        assert_eq!(controller.amount(), "1.5");
    }

    #[tokio::test]
    async fn test_successful_deposit_full_cycle() {
        let mut token_reader = MockTokenReader::new();
        // initial read, then the post-deposit refresh observing the change
        let mut fetch_seq = mockall::Sequence::new();
        token_reader
            .expect_fetch_balance()
            .times(1)
            .in_sequence(&mut fetch_seq)
            .returning(|_| Ok((6, U256::from(100))));
        token_reader
            .expect_fetch_balance()
            .times(1)
            .in_sequence(&mut fetch_seq)
            .returning(|_| Ok((6, U256::from(1_500_100))));

        let mut submitter = MockSubmitter::new();
        submitter
            .expect_submit()
            .times(1)
            .withf(|calls| calls.len() == 2 && calls[0].to == TOKEN && calls[1].to == VAULT)
            .returning(|_| Ok(submission_receipt()));

        let mut controller = new_controller(Some(ACCOUNT), token_reader, submitter);
        controller.refresh_balance().await.unwrap();
        let mut events = controller.subscribe();

        controller.set_amount("1.5");
        let receipt = controller.deposit().await.unwrap().unwrap();

        assert_eq!(receipt, submission_receipt());
        assert_eq!(controller.state(), FlowState::Idle);
        assert_eq!(controller.amount(), "");
        assert_eq!(
            controller.balance(),
            Some(BalanceSnapshot {
                decimals: 6,
                raw: U256::from(1_500_100)
            })
        );

        let events = drain(&mut events);
        assert!(matches!(
            events[0],
            FlowEvent::StateChanged {
                from: FlowState::Idle,
                to: FlowState::Submitting
            }
        ));
        assert!(matches!(
            events[1],
            FlowEvent::StateChanged {
                to: FlowState::Success,
                ..
            }
        ));
        assert!(matches!(events[2], FlowEvent::DepositConfirmed { .. }));
        assert!(matches!(events[3], FlowEvent::BalanceUpdated { .. }));
        assert!(matches!(
            events[4],
            FlowEvent::StateChanged {
                to: FlowState::Idle,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_failed_deposit_resets_and_surfaces_error() {
        let mut token_reader = MockTokenReader::new();
        // only the initial read; failure must not refresh the balance
        token_reader
            .expect_fetch_balance()
            .times(1)
            .returning(|_| Ok((6, U256::from(100))));

        let mut submitter = MockSubmitter::new();
        submitter.expect_submit().times(1).returning(|_| {
            Err(FlowError::Sponsorship(ProviderError::Contract(
                "paymaster: not whitelisted".into(),
            )))
        });

        let mut controller = new_controller(Some(ACCOUNT), token_reader, submitter);
        controller.refresh_balance().await.unwrap();
        let mut events = controller.subscribe();

        controller.set_amount("1.5");
        let result = controller.deposit().await;

        assert!(matches!(result, Err(FlowError::Sponsorship(_))));
        assert_eq!(controller.state(), FlowState::Idle);
        assert_eq!(controller.amount(), "");
        // balance untouched
        assert_eq!(
            controller.balance(),
            Some(BalanceSnapshot {
                decimals: 6,
                raw: U256::from(100)
            })
        );

        let events = drain(&mut events);
        assert!(matches!(
            events[1],
            FlowEvent::StateChanged {
                to: FlowState::Failed,
                ..
            }
        ));
        assert!(events.iter().any(|event| matches!(
            event,
            FlowEvent::DepositFailed { message } if message.contains("not whitelisted")
        )));
    }

    #[tokio::test]
    async fn test_unparseable_amount_clears_input() {
        let mut token_reader = MockTokenReader::new();
        token_reader.expect_decimals().times(1).returning(|| Ok(6));

        let mut controller = new_controller(Some(ACCOUNT), token_reader, MockSubmitter::new());
        controller.set_amount("1.0000001");
        // 7 fractional digits into 6 decimals
        let result = controller.deposit().await;

        assert!(matches!(result, Err(FlowError::Encoding(_))));
        assert_eq!(controller.amount(), "");
        assert_eq!(controller.state(), FlowState::Idle);
    }

    #[tokio::test]
    async fn test_duplicate_submission_is_rejected() {
        let mut token_reader = MockTokenReader::new();
        token_reader.expect_decimals().returning(|| Ok(6));

        let mut controller = new_controller(Some(ACCOUNT), token_reader, MockSubmitter::new());
        controller.set_amount("1.5");

        // a prior attempt is still in flight
        controller.begin_submission();
        let result = controller.deposit().await;
        assert!(matches!(result, Err(FlowError::AlreadyInFlight)));
    }

    #[tokio::test]
    async fn test_stale_completion_is_dropped() {
        let mut token_reader = MockTokenReader::new();
        token_reader
            .expect_fetch_balance()
            .returning(|_| Ok((6, U256::from(100))));

        let mut controller =
            new_controller(Some(ACCOUNT), token_reader, MockSubmitter::new());

        let stale = controller.begin_submission();
        let current = controller.begin_submission();

        // completion of the superseded attempt is ignored outright
        let result = controller
            .finish_submission(ACCOUNT, stale, Ok(submission_receipt()))
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(controller.state(), FlowState::Submitting);
        assert_eq!(controller.balance(), None);

        // the current attempt still completes
        let result = controller
            .finish_submission(ACCOUNT, current, Ok(submission_receipt()))
            .await
            .unwrap();
        assert!(result.is_some());
        assert_eq!(controller.state(), FlowState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_gives_up_when_balance_never_changes() {
        let mut token_reader = MockTokenReader::new();
        token_reader
            .expect_fetch_balance()
            .returning(|_| Ok((6, U256::from(100))));

        let mut submitter = MockSubmitter::new();
        submitter
            .expect_submit()
            .returning(|_| Ok(submission_receipt()));

        let mut controller = new_controller(Some(ACCOUNT), token_reader, submitter);
        controller.refresh_balance().await.unwrap();

        controller.set_amount("1.5");
        // lagging node: the refresh deadline passes without a new balance
        let receipt = controller.deposit().await.unwrap();
        assert!(receipt.is_some());
        assert_eq!(controller.state(), FlowState::Idle);
        assert_eq!(
            controller.balance(),
            Some(BalanceSnapshot {
                decimals: 6,
                raw: U256::from(100)
            })
        );
    }
}
