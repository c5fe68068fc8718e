// SPDX-License-Identifier: MIT

//! `TrackingWithTransparency`: the address is published under both the
//! generic and the localhost key so the frontend picks it up either way.

use alloy::{primitives::Address, providers::DynProvider};
use shared::runner::{DeploymentPlan, VerificationCall};

use crate::registry::{ContractKind, TrackingWithTransparency};

pub const ENV_KEYS: [&str; 2] = ["CONTRACT_ADDRESS", "LOCALHOST_CONTRACT_ADDRESS"];

pub fn plan() -> DeploymentPlan {
    DeploymentPlan::new(ContractKind::TrackingWithTransparency.name()).with_env_keys(&ENV_KEYS)
}

/// -------------------------------------------
/// Reads the contract metadata and the global transparency counters.
/// -------------------------------------------
pub fn verification_calls(provider: DynProvider, address: Address) -> Vec<VerificationCall> {
    let contract = TrackingWithTransparency::new(address, provider);
    let metrics = contract.clone();

    vec![
        VerificationCall::new("getContractInfo", move || async move {
            let info = contract.getContractInfo().call().await?;
            Ok(format!(
                "version: {}, features: {}, description: {}",
                info.version, info.features, info.description
            ))
        }),
        VerificationCall::new("getGlobalTransparencyMetrics", move || async move {
            let totals = metrics.getGlobalTransparencyMetrics().call().await?;
            Ok(format!(
                "shipments: {}, verified: {}, completed: {}, transparency rate: {}%",
                totals.totalShipments,
                totals.totalVerifiedShipments,
                totals.totalCompletedShipments,
                totals.transparencyRate
            ))
        }),
    ]
}
