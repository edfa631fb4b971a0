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

use alloy_primitives::utils::format_units;
use clap::Args;
use fundler_provider::{new_alloy_provider, new_token_reader, TokenReader};

use super::CommonArgs;

/// CLI options for the balance command
#[derive(Debug, Args)]
pub(super) struct BalanceCliArgs {
    /// Print the raw balance in smallest units instead of a decimal value
    #[arg(long = "raw", name = "raw", required = false, num_args = 0)]
    raw: bool,
}

pub(super) async fn run(args: BalanceCliArgs, common: CommonArgs) -> anyhow::Result<()> {
    let Some(account) = common.account else {
        // balance reads silently no-op without a session account
        tracing::warn!("No account configured, skipping balance fetch");
        return Ok(());
    };

    let provider = new_alloy_provider(common.node_http()?)?;
    let token_reader = new_token_reader(common.token()?, provider);
    let (decimals, balance) = token_reader.fetch_balance(account).await?;

    if args.raw {
        println!("{balance}");
    } else {
        println!("{}", format_units(balance, decimals)?);
    }
    Ok(())
}
