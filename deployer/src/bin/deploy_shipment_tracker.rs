// SPDX-License-Identifier: MIT

use deployer::{
    app,
    plans::shipment::{self, STATUS_PAUSE},
    registry::ShipmentTracker,
};
use shared::{
    log_info, log_warn,
    runner::{fail, Summary},
    subscription::Subscription,
    utils::{self, explorer_link},
};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let command = utils::deploy_command(
        "deploy-shipment-tracker",
        "Deploy the ShipmentTracker contract, walk a test shipment through its lifecycle and print its events until Ctrl-C",
    );
    let (runner, _) = match app::bootstrap(command) {
        Ok(started) => started,
        Err(err) => return fail(&err),
    };

    let plan = shipment::plan();
    log_info!("🚀 Deploying {} contract...", plan.contract_name);
    let deployment = match runner.deploy(&plan.contract_name, &plan.constructor_args).await {
        Ok(deployment) => deployment,
        Err(err) => return fail(&err),
    };
    let chain_id = runner.network().chain_id;
    println!(
        "✅ {} deployed to: {}",
        plan.contract_name,
        explorer_link(chain_id, &deployment.address.to_string())
    );

    let provider = runner.backend().provider().clone();
    let tracker = ShipmentTracker::new(deployment.address, provider.clone());

    // Opened before the test shipment so its creation is reported too.
    // Notifications are best effort; the deployment stands without them.
    let subscription = match Subscription::watch(
        &provider,
        &runner.network().name,
        deployment.address,
        shipment::decode_event,
        |event| println!("{}", shipment::describe(&event)),
    )
    .await
    {
        Ok(subscription) => Some(subscription),
        Err(err) => {
            log_warn!("Event notifications unavailable: {err}");
            None
        }
    };

    let mut report = runner
        .verify(&deployment, shipment::creation_calls(tracker.clone(), deployment.deployer))
        .await;

    log_info!("🚛 Testing status updates...");
    report.extend(
        runner
            .verify(&deployment, shipment::status_calls(tracker, STATUS_PAUSE))
            .await,
    );

    Summary {
        deployment,
        report,
        env_keys: Vec::new(),
        env_file: None,
        record_path: None,
    }
    .print();

    let Some(subscription) = subscription else {
        return ExitCode::SUCCESS;
    };
    println!("\n⏳ Monitoring events, press Ctrl+C to stop");
    if let Err(err) = tokio::signal::ctrl_c().await {
        log_warn!("Unable to listen for Ctrl+C: {err}");
    }
    let delivered = subscription.unsubscribe().await;
    log_info!("🛑 Stopped listening after {delivered} events");
    ExitCode::SUCCESS
}
