// SPDX-License-Identifier: MIT

use deployer::{app, plans::tracking};
use shared::utils;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let command = utils::deploy_command(
        "deploy-tracking",
        "Deploy the analytics-enabled Tracking contract, register sample products and record the deployment",
    );
    app::deploy_with(command, tracking::plan(), tracking::verification_calls).await
}
