// SPDX-License-Identifier: MIT

//! `ShipmentTracker`: a sample shipment is created and walked through its
//! lifecycle while an event listener reports every notification.

use alloy::{
    primitives::{Address, U256},
    providers::DynProvider,
    rpc::types::Log,
    sol_types::SolEventInterface,
};
use chrono::DateTime;
use std::time::Duration;

use super::confirmed;
use crate::registry::{
    ContractKind,
    ShipmentTracker::{self, ShipmentTrackerEvents},
};
use shared::runner::{DeploymentPlan, VerificationCall};

/// Pause between consecutive status updates so listeners see them apart.
pub const STATUS_PAUSE: Duration = Duration::from_secs(2);

pub struct TestShipment {
    pub id: &'static str,
    pub product_id: &'static str,
    pub product_name: &'static str,
    pub from: &'static str,
    pub to: &'static str,
    /// Metric tons.
    pub quantity: u64,
}

pub static TEST_SHIPMENT: TestShipment = TestShipment {
    id: "TRC-TEST-001",
    product_id: "MYA001",
    product_name: "Premium Palm Oil",
    from: "Malaysia Oil Palm Plantation",
    to: "Singapore Distribution Center",
    quantity: 10,
};

const TRANSIT_START: &str = "Port Klang, Malaysia";
const TRANSIT_WAYPOINT: &str = "Strait of Malacca";

type Instance = ShipmentTracker::ShipmentTrackerInstance<DynProvider>;

/// Nothing is persisted for the shipment tracker.
pub fn plan() -> DeploymentPlan {
    DeploymentPlan::new(ContractKind::ShipmentTracker.name())
}

/// Creates the sample shipment with `recipient` as receiver.
pub fn creation_calls(contract: Instance, recipient: Address) -> Vec<VerificationCall> {
    let shipment = &TEST_SHIPMENT;
    vec![VerificationCall::new(
        format!("createShipment({})", shipment.id),
        move || async move {
            let pending = contract
                .createShipment(
                    shipment.id.to_string(),
                    shipment.product_id.to_string(),
                    shipment.product_name.to_string(),
                    shipment.from.to_string(),
                    shipment.to.to_string(),
                    U256::from(shipment.quantity),
                    recipient,
                )
                .send()
                .await?;
            let receipt = confirmed(pending).await?;
            Ok(format!("test shipment created in tx {}", receipt.transaction_hash))
        },
    )]
}

/// -------------------------------------------
/// Start transit, move to a waypoint, then deliver. Every step after the
/// first waits `pause` before sending.
/// -------------------------------------------
pub fn status_calls(contract: Instance, pause: Duration) -> Vec<VerificationCall> {
    let id = TEST_SHIPMENT.id;
    let (transit, waypoint, delivery) = (contract.clone(), contract.clone(), contract);

    vec![
        VerificationCall::new(format!("startTransit({id})"), move || async move {
            let pending = transit
                .startTransit(id.to_string(), TRANSIT_START.to_string())
                .send()
                .await?;
            confirmed(pending).await?;
            Ok(format!("in transit from {TRANSIT_START}"))
        }),
        VerificationCall::new(format!("updateLocation({id})"), move || async move {
            tokio::time::sleep(pause).await;
            let pending = waypoint
                .updateLocation(id.to_string(), TRANSIT_WAYPOINT.to_string())
                .send()
                .await?;
            confirmed(pending).await?;
            Ok(format!("location updated to {TRANSIT_WAYPOINT}"))
        }),
        VerificationCall::new(format!("completeDelivery({id})"), move || async move {
            tokio::time::sleep(pause).await;
            let pending = delivery
                .completeDelivery(id.to_string(), TEST_SHIPMENT.to.to_string())
                .send()
                .await?;
            confirmed(pending).await?;
            Ok(format!("delivered to {}", TEST_SHIPMENT.to))
        }),
    ]
}

/// Decodes a log of the shipment tracker, `None` for anything else.
pub fn decode_event(log: &Log) -> Option<ShipmentTrackerEvents> {
    ShipmentTrackerEvents::decode_raw_log(log.topics(), &log.data().data).ok()
}

pub fn status_name(status: u8) -> String {
    match status {
        0 => "Pending".to_string(),
        1 => "In Transit".to_string(),
        2 => "Delivered".to_string(),
        other => format!("Unknown ({other})"),
    }
}

fn format_timestamp(timestamp: U256) -> String {
    u64::try_from(timestamp)
        .ok()
        .and_then(|secs| i64::try_from(secs).ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|time| time.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// -------------------------------------------
/// Multi-line notification text for one shipment event.
/// -------------------------------------------
pub fn describe(event: &ShipmentTrackerEvents) -> String {
    match event {
        ShipmentTrackerEvents::ShipmentCreated(created) => format!(
            "🔔 Shipment Created:\n   Shipment ID: {}\n   Product: {} ({})\n   Route: {} → {}\n   Quantity: {} MT\n   Owner: {}",
            created.shipmentId,
            created.productName,
            created.productId,
            created.fromLocation,
            created.toLocation,
            created.quantity,
            created.owner
        ),
        ShipmentTrackerEvents::ShipmentStatusChanged(changed) => format!(
            "🔔 Status Update:\n   Shipment ID: {}\n   Product ID: {}\n   New Status: {}\n   Location: {}\n   Timestamp: {}",
            changed.shipmentId,
            changed.productId,
            status_name(changed.status),
            changed.location,
            format_timestamp(changed.timestamp)
        ),
        ShipmentTrackerEvents::ShipmentInTransit(transit) => format!(
            "🔔 In Transit:\n   Shipment ID: {}\n   Product ID: {}\n   Current Location: {}\n   Time: {}",
            transit.shipmentId,
            transit.productId,
            transit.currentLocation,
            format_timestamp(transit.timestamp)
        ),
        ShipmentTrackerEvents::ShipmentDelivered(delivered) => format!(
            "🔔 Delivered:\n   Shipment ID: {}\n   Product ID: {}\n   Delivered to: {}\n   Delivery Time: {}\n   Recipient: {}",
            delivered.shipmentId,
            delivered.productId,
            delivered.deliveryLocation,
            format_timestamp(delivered.deliveryTime),
            delivered.recipient
        ),
    }
}
