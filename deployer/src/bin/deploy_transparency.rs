// SPDX-License-Identifier: MIT

use deployer::{app, plans::transparency};
use shared::utils;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let command = utils::deploy_command(
        "deploy-transparency",
        "Deploy the TrackingWithTransparency contract and publish its address to the env file",
    );
    app::deploy_with(command, transparency::plan(), transparency::verification_calls).await
}
