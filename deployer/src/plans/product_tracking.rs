// SPDX-License-Identifier: MIT

use alloy::{primitives::Address, providers::DynProvider};
use shared::runner::{DeploymentPlan, VerificationCall};

use crate::registry::{ContractKind, ProductTracking};

pub const ENV_KEYS: [&str; 1] = ["LOCALHOST_PRODUCT_CONTRACT_ADDRESS"];

pub fn plan() -> DeploymentPlan {
    DeploymentPlan::new(ContractKind::ProductTracking.name()).with_env_keys(&ENV_KEYS)
}

pub fn verification_calls(provider: DynProvider, address: Address) -> Vec<VerificationCall> {
    let contract = ProductTracking::new(address, provider);
    vec![VerificationCall::new("getProductCount", move || async move {
        let count = contract.getProductCount().call().await?;
        Ok(format!("initial product count: {count}"))
    })]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_only_updates_the_env_file() {
        let plan = plan();
        assert_eq!(plan.contract_name, "ProductTracking");
        assert_eq!(plan.env_keys, ["LOCALHOST_PRODUCT_CONTRACT_ADDRESS"]);
        assert!(plan.record.is_none());
    }
}
