// SPDX-License-Identifier: MIT

use clap::Arg;
use deployer::{app, ContractKind};
use shared::{
    log_info,
    runner::{conclude, fail},
    utils::{self, explorer_link},
};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let command = utils::deploy_command(
        "simple-deploy",
        "Deploy a single contract without any follow-up calls",
    )
    .arg(
        Arg::new("contract")
            .long("contract")
            .value_name("CONTRACT")
            .help("Name of the contract artifact to deploy")
            .default_value(ContractKind::Tracking.name()),
    );

    let (runner, matches) = match app::bootstrap(command) {
        Ok(started) => started,
        Err(err) => return fail(&err),
    };

    let requested = matches
        .get_one::<String>("contract")
        .map(String::as_str)
        .unwrap_or(ContractKind::Tracking.name());
    let kind = match ContractKind::from_name(requested) {
        Ok(kind) => kind,
        Err(err) => return fail(&err),
    };

    log_info!("Deploying {kind} contract...");
    let result = runner.deploy(kind.name(), &[]).await;
    ExitCode::from(conclude(&result, |deployment| {
        println!(
            "{kind} deployed to: {}",
            explorer_link(deployment.target.chain_id, &deployment.address.to_string())
        )
    }))
}
