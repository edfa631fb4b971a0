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

use alloy_primitives::Address;
use clap::{Args, Parser, Subcommand};

mod balance;
mod deposit;
mod tracing;

use balance::BalanceCliArgs;
use deposit::DepositCliArgs;

/// Main entry point for the CLI
///
/// Parses the CLI arguments and runs the appropriate subcommand.
pub async fn run() -> anyhow::Result<()> {
    let opt = Cli::parse();
    let _guard = tracing::configure_logging(&opt.logs)?;
    tracing::debug!("Parsed CLI options: {:#?}", opt);

    match opt.command {
        Command::Deposit(args) => deposit::run(args, opt.common).await,
        Command::Balance(args) => balance::run(args, opt.common).await,
    }
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Command {
    /// Deposit tokens into the vault through a sponsored user operation
    #[command(name = "deposit")]
    Deposit(DepositCliArgs),

    /// Show the smart account's token balance
    #[command(name = "balance")]
    Balance(BalanceCliArgs),
}

/// CLI common options
#[derive(Debug, Args)]
#[command(next_help_heading = "Common")]
pub struct CommonArgs {
    /// ETH Node HTTP URL to connect to
    #[arg(
        long = "node_http",
        name = "node_http",
        env = "NODE_HTTP",
        global = true
    )]
    node_http: Option<String>,

    /// Chain ID to sign operations for
    #[arg(
        long = "chain_id",
        name = "chain_id",
        env = "CHAIN_ID",
        default_value = "137",
        global = true
    )]
    chain_id: u64,

    /// Address of the ERC-20 token to deposit
    #[arg(long = "token", name = "token", env = "TOKEN_ADDRESS", global = true)]
    token: Option<Address>,

    /// Address of the vault contract
    #[arg(long = "vault", name = "vault", env = "VAULT_ADDRESS", global = true)]
    vault: Option<Address>,

    /// Address of the ERC-4337 entry point
    #[arg(
        long = "entry_point",
        name = "entry_point",
        env = "ENTRY_POINT_ADDRESS",
        default_value = "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789",
        global = true
    )]
    entry_point: Address,

    /// Address of the smart account to act as
    #[arg(long = "account", name = "account", env = "ACCOUNT_ADDRESS", global = true)]
    account: Option<Address>,
}

impl CommonArgs {
    fn node_http(&self) -> anyhow::Result<&str> {
        self.node_http
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("node_http is required"))
    }

    fn token(&self) -> anyhow::Result<Address> {
        self.token
            .ok_or_else(|| anyhow::anyhow!("token address is required"))
    }

    fn vault(&self) -> anyhow::Result<Address> {
        self.vault
            .ok_or_else(|| anyhow::anyhow!("vault address is required"))
    }
}

/// CLI options
#[derive(Debug, Parser)]
#[command(version, about = "Deposits ERC-20 tokens into a vault, gas paid by a paymaster")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    logs: LogsArgs,
}

/// CLI options for logging
#[derive(Debug, Args)]
#[command(next_help_heading = "Logging")]
pub struct LogsArgs {
    /// Log file
    ///
    /// If not provided, logs will be written to stdout
    #[arg(
        long = "log.file",
        name = "log.file",
        env = "LOG_FILE",
        default_value = None,
        global = true
    )]
    file: Option<String>,

    /// Log JSON
    ///
    /// If set, logs will be written in JSON format
    #[arg(
        long = "log.json",
        name = "log.json",
        env = "LOG_JSON",
        required = false,
        num_args = 0,
        global = true
    )]
    json: bool,
}
