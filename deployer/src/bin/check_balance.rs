// SPDX-License-Identifier: MIT

use alloy::primitives::utils::format_ether;
use deployer::{
    app,
    balance::{BalanceStatus, MAX_ACCOUNTS},
};
use shared::{chain::DeployBackend, log_warn, runner::fail, utils};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let command = utils::deploy_command(
        "check-balance",
        "Show the balances of the configured deployment accounts",
    );
    let (runner, _) = match app::bootstrap(command) {
        Ok(started) => started,
        Err(err) => return fail(&err),
    };

    let accounts = runner.network().signer_addresses();
    if accounts.is_empty() {
        log_warn!("No accounts configured for {}", runner.network().name);
        return ExitCode::SUCCESS;
    }

    println!("💰 Checking account balances on {}...\n", runner.network().name);
    for (index, account) in accounts.iter().take(MAX_ACCOUNTS).enumerate() {
        let balance = match runner.backend().balance(*account).await {
            Ok(balance) => balance,
            Err(err) => return fail(&err),
        };
        let status = BalanceStatus::classify(balance);
        println!("Account {index}: {account}");
        println!("Balance: {} ETH", format_ether(balance));
        println!("{}\n", status.advice());
    }
    ExitCode::SUCCESS
}
