// SPDX-License-Identifier: MIT

//! The analytics-enabled `Tracking` contract: deployed, smoke-tested with two
//! sample palm oil batches and recorded for the dashboard.

use alloy::{
    primitives::{utils::parse_ether, Address, U256},
    providers::DynProvider,
};
use shared::runner::{DeploymentPlan, RecordTemplate, VerificationCall};

use super::confirmed;
use crate::registry::{ContractKind, Tracking};

pub const ENV_KEYS: [&str; 1] = ["LOCALHOST_PRODUCT_CONTRACT_ADDRESS"];

pub const VERSION: &str = "Enhanced for Analytics";

pub const FEATURES: [&str; 6] = [
    "Product Registration",
    "Location Tracking",
    "Ownership Transfer",
    "Verification Events",
    "Analytics Support",
    "Real-time Data",
];

/// How many product ids the final listing asks for.
const RECENT_PRODUCTS: u64 = 5;

#[derive(Debug, Clone, Copy)]
pub struct TestProduct {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub sku: &'static str,
    /// Unit price in ETH.
    pub price: &'static str,
    pub quantity: u64,
    pub location: &'static str,
}

pub static TEST_PRODUCTS: [TestProduct; 2] = [
    TestProduct {
        id: "MYA001",
        name: "Sustainable Palm Oil Batch 1",
        category: "Palm Oil",
        sku: "SKU-PALM-0020",
        price: "0.1",
        quantity: 1000,
        location: "Johor, Malaysia",
    },
    TestProduct {
        id: "MYA002",
        name: "Sustainable Palm Oil Batch 2",
        category: "Palm Oil",
        sku: "SKU-PALM-0021",
        price: "0.12",
        quantity: 800,
        location: "Penang, Malaysia",
    },
];

/// Verification of the first batch at a downstream checkpoint.
const CHECKPOINT: (&str, u64) = ("Kuala Lumpur, Malaysia", 250);

type Instance = Tracking::TrackingInstance<DynProvider>;

pub fn plan() -> DeploymentPlan {
    DeploymentPlan::new(ContractKind::Tracking.name())
        .with_env_keys(&ENV_KEYS)
        .with_record(RecordTemplate {
            version: Some(VERSION.to_string()),
            features: FEATURES.iter().map(|feature| feature.to_string()).collect(),
        })
}

/// -------------------------------------------
/// Read the counters, register both sample batches, verify the first one and
/// read the counters again.
/// -------------------------------------------
pub fn verification_calls(provider: DynProvider, address: Address) -> Vec<VerificationCall> {
    let tracking = Tracking::new(address, provider);
    let [first, second] = TEST_PRODUCTS;

    vec![
        product_count(tracking.clone()),
        analytics(tracking.clone(), "getAnalyticsData"),
        register(tracking.clone(), first),
        verify(tracking.clone(), first.id),
        register(tracking.clone(), second),
        analytics(tracking.clone(), "getAnalyticsData (updated)"),
        recent_products(tracking),
    ]
}

fn product_count(tracking: Instance) -> VerificationCall {
    VerificationCall::new("getProductCount", move || async move {
        let count = tracking.getProductCount().call().await?;
        Ok(format!("initial product count: {count}"))
    })
}

fn analytics(tracking: Instance, name: &str) -> VerificationCall {
    VerificationCall::new(name, move || async move {
        let data = tracking.getAnalyticsData().call().await?;
        Ok(format!(
            "total products: {}, verifications: {}, events: {}, active products: {}",
            data.totalProducts, data.totalVerifications, data.totalEvents, data.activeProducts
        ))
    })
}

fn register(tracking: Instance, product: TestProduct) -> VerificationCall {
    VerificationCall::new(format!("registerProduct({})", product.id), move || async move {
        let price = parse_ether(product.price)?;
        let pending = tracking
            .registerProduct(
                product.id.to_string(),
                product.name.to_string(),
                product.category.to_string(),
                product.sku.to_string(),
                price,
                U256::from(product.quantity),
                product.location.to_string(),
            )
            .send()
            .await?;
        let receipt = confirmed(pending).await?;
        Ok(format!(
            "registered {} in tx {}",
            product.name, receipt.transaction_hash
        ))
    })
    .registering(product.id)
}

fn verify(tracking: Instance, product_id: &'static str) -> VerificationCall {
    let (location, quantity) = CHECKPOINT;
    VerificationCall::new(format!("verifyProduct({product_id})"), move || async move {
        let pending = tracking
            .verifyProduct(product_id.to_string(), location.to_string(), U256::from(quantity))
            .send()
            .await?;
        let receipt = confirmed(pending).await?;
        Ok(format!(
            "verified {quantity} units at {location} in tx {}",
            receipt.transaction_hash
        ))
    })
}

fn recent_products(tracking: Instance) -> VerificationCall {
    VerificationCall::new("getRecentProducts", move || async move {
        let ids = tracking
            .getRecentProducts(U256::from(RECENT_PRODUCTS))
            .call()
            .await?;
        Ok(format!("recent products: [{}]", ids.join(", ")))
    })
}
