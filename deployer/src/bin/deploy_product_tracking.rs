// SPDX-License-Identifier: MIT

use deployer::{app, plans::product_tracking};
use shared::utils;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let command = utils::deploy_command(
        "deploy-product-tracking",
        "Deploy the ProductTracking contract and publish its address to the env file",
    );
    app::deploy_with(command, product_tracking::plan(), product_tracking::verification_calls).await
}
