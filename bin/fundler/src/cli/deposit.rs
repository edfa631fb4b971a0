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

use anyhow::Context;
use clap::Args;
use fundler_flow::{
    DepositCallBuilder, DepositController, RefreshSettings, SessionContext, SponsoredSubmitter,
    SubmitSettings,
};
use fundler_provider::{
    new_alloy_provider, new_simple_smart_account, new_token_reader, HttpBundler, HttpPaymaster,
};

use super::CommonArgs;

/// CLI options for the deposit command
#[derive(Debug, Args)]
#[command(next_help_heading = "Deposit")]
pub(super) struct DepositCliArgs {
    /// Amount of tokens to deposit, in human units (e.g. "1.5")
    #[arg(long = "amount", name = "amount")]
    amount: String,

    /// Bundler HTTP URL to submit user operations to
    #[arg(
        long = "bundler_url",
        name = "bundler_url",
        env = "BUNDLER_URL"
    )]
    bundler_url: String,

    /// Paymaster HTTP URL to request sponsorship from
    #[arg(
        long = "paymaster_url",
        name = "paymaster_url",
        env = "PAYMASTER_URL"
    )]
    paymaster_url: String,

    /// Hex-encoded private key of the smart account owner
    #[arg(
        long = "owner_key",
        name = "owner_key",
        env = "OWNER_PRIVATE_KEY",
        hide_env_values = true
    )]
    owner_key: String,

    /// Seconds to wait for the operation to confirm
    #[arg(
        long = "confirmation_timeout",
        name = "confirmation_timeout",
        env = "CONFIRMATION_TIMEOUT",
        default_value = "120"
    )]
    confirmation_timeout_seconds: u64,
}

pub(super) async fn run(args: DepositCliArgs, common: CommonArgs) -> anyhow::Result<()> {
    let provider = new_alloy_provider(common.node_http()?)?;
    let token = common.token()?;
    let vault = common.vault()?;

    let token_reader = new_token_reader(token, provider.clone());
    let paymaster = HttpPaymaster::new(&args.paymaster_url)?;
    let bundler = HttpBundler::new(&args.bundler_url, common.entry_point)?;

    let Some(account_address) = common.account else {
        // mirror the surface behavior: nothing to do without a session account
        tracing::warn!("No account configured, nothing to deposit");
        return Ok(());
    };
    let account = new_simple_smart_account(
        account_address,
        &args.owner_key,
        common.chain_id,
        common.entry_point,
        provider,
    )?;

    let submitter = SponsoredSubmitter::new(
        account,
        paymaster,
        bundler,
        SubmitSettings {
            confirmation_timeout: Duration::from_secs(args.confirmation_timeout_seconds),
            ..Default::default()
        },
    );
    let mut controller = DepositController::new(
        SessionContext {
            account: Some(account_address),
        },
        DepositCallBuilder::new(token, vault),
        token_reader,
        submitter,
        RefreshSettings::default(),
    );

    // render flow events as they happen
    let mut events = controller.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            println!("{event}");
        }
    });

    controller
        .refresh_balance()
        .await
        .context("should fetch token balance")?;
    controller.set_amount(&args.amount);
    let receipt = controller.deposit().await?;

    drop(controller);
    let _ = printer.await;

    match receipt {
        Some(receipt) => {
            println!(
                "Deposit confirmed: operation {:?} in transaction {:?}",
                receipt.user_op_hash, receipt.tx_hash
            );
            Ok(())
        }
        None => {
            println!("Nothing deposited");
            Ok(())
        }
    }
}
