// SPDX-License-Identifier: MIT

//! Start-up shared by every entry point: `.env`, flags, logging, network.

use alloy::{primitives::Address, providers::DynProvider};
use clap::{ArgMatches, Command};
use shared::{
    chain::RpcBackend,
    config::{DeployConfig, EnvOverrides},
    log_info,
    runner::{conclude, fail, DeploymentPlan, DeploymentRunner, Summary, VerificationCall},
    utils, DeployError,
};
use std::process::ExitCode;

use crate::registry::ContractKind;

pub type Runner = DeploymentRunner<RpcBackend>;

/// -------------------------------------------
/// Loads `.env`, parses the flags, installs logging and connects to the
/// selected network.
/// -------------------------------------------
pub fn bootstrap(command: Command) -> Result<(Runner, ArgMatches), DeployError> {
    dotenv::dotenv().ok();

    let matches = command.get_matches();
    let args = utils::cli_args(&matches);
    shared::log::init_tracing(args.verbose);

    let overrides = EnvOverrides::from_env()?;
    let config = DeployConfig::load(&args.config)?;
    let network = config.network_context(&overrides.network_name(args.network.as_deref()), &overrides)?;
    log_info!(
        "🌐 Network: {} (chain id {}) at {}",
        network.name,
        network.chain_id,
        network.rpc_url
    );

    let backend = RpcBackend::connect(&network)?;
    Ok((DeploymentRunner::new(backend, network, config.paths), matches))
}

/// Runs a full deployment plan and turns the outcome into the process exit code.
pub async fn deploy_with<F>(command: Command, plan: DeploymentPlan, calls: F) -> ExitCode
where
    F: FnOnce(DynProvider, Address) -> Vec<VerificationCall>,
{
    let (runner, _) = match bootstrap(command) {
        Ok(started) => started,
        Err(err) => return fail(&err),
    };
    if let Err(err) = ContractKind::from_name(&plan.contract_name) {
        return fail(&err);
    }

    log_info!("🚀 Starting {} contract deployment...", plan.contract_name);
    let provider = runner.backend().provider().clone();
    let result = runner
        .run(&plan, |deployment| calls(provider, deployment.address))
        .await;
    ExitCode::from(conclude(&result, Summary::print))
}
