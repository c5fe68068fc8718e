// SPDX-License-Identifier: MIT

//! Statically typed bindings of every deployable contract, resolved by name.

use alloy::sol;
use shared::DeployError;
use std::{fmt, str::FromStr};

sol! {
    #[sol(rpc)]
    interface Tracking {
        function getProductCount() external view returns (uint256);
        function getAnalyticsData() external view returns (
            uint256 totalProducts,
            uint256 totalVerifications,
            uint256 totalEvents,
            uint256 activeProducts
        );
        function registerProduct(
            string productId,
            string name,
            string category,
            string sku,
            uint256 price,
            uint256 quantity,
            string location
        ) external;
        function verifyProduct(string productId, string location, uint256 quantity) external;
        function getRecentProducts(uint256 count) external view returns (string[] memory);
    }

    #[sol(rpc)]
    interface ProductTracking {
        function getProductCount() external view returns (uint256);
    }

    #[sol(rpc)]
    interface TrackingWithTransparency {
        function getContractInfo() external view returns (
            string version,
            string features,
            string description
        );
        function getGlobalTransparencyMetrics() external view returns (
            uint256 totalShipments,
            uint256 totalVerifiedShipments,
            uint256 totalCompletedShipments,
            uint256 transparencyRate
        );
    }

    #[sol(rpc)]
    interface ShipmentTracker {
        event ShipmentCreated(
            string shipmentId,
            string productId,
            string productName,
            string fromLocation,
            string toLocation,
            uint256 quantity,
            address owner
        );
        event ShipmentStatusChanged(
            string shipmentId,
            string productId,
            uint8 status,
            string location,
            uint256 timestamp
        );
        event ShipmentInTransit(
            string shipmentId,
            string productId,
            string currentLocation,
            uint256 timestamp,
            address owner
        );
        event ShipmentDelivered(
            string shipmentId,
            string productId,
            string deliveryLocation,
            uint256 deliveryTime,
            address recipient
        );

        function createShipment(
            string shipmentId,
            string productId,
            string productName,
            string fromLocation,
            string toLocation,
            uint256 quantity,
            address recipient
        ) external;
        function startTransit(string shipmentId, string currentLocation) external;
        function updateLocation(string shipmentId, string newLocation) external;
        function completeDelivery(string shipmentId, string deliveryLocation) external;
    }
}

/// Every contract the deployer knows how to deploy and exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractKind {
    Tracking,
    ProductTracking,
    ShipmentTracker,
    TrackingWithTransparency,
}

impl ContractKind {
    pub const ALL: [ContractKind; 4] = [
        ContractKind::Tracking,
        ContractKind::ProductTracking,
        ContractKind::ShipmentTracker,
        ContractKind::TrackingWithTransparency,
    ];

    /// Contract name as used by the compiler artifacts.
    pub const fn name(self) -> &'static str {
        match self {
            ContractKind::Tracking => "Tracking",
            ContractKind::ProductTracking => "ProductTracking",
            ContractKind::ShipmentTracker => "ShipmentTracker",
            ContractKind::TrackingWithTransparency => "TrackingWithTransparency",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, DeployError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|kind| kind.name()).collect();
                DeployError::contract_not_found(
                    name,
                    format!("not a registered contract (known: {})", known.join(", ")),
                )
            })
    }
}

impl FromStr for ContractKind {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::sol_types::SolCall;

    #[test]
    fn names_round_trip() {
        for kind in ContractKind::ALL {
            assert_eq!(kind.name().parse::<ContractKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_names_are_contract_not_found() {
        let err = ContractKind::from_name("Lock").unwrap_err();
        assert!(matches!(err, DeployError::ContractNotFound { ref name, ref reason } if name == "Lock" && reason.contains("Tracking")));
        // Lookup is exact.
        assert!(ContractKind::from_name("tracking").is_err());
    }

    #[test]
    fn bindings_use_solidity_signatures() {
        assert_eq!(Tracking::getProductCountCall::SIGNATURE, "getProductCount()");
        assert_eq!(
            Tracking::registerProductCall::SIGNATURE,
            "registerProduct(string,string,string,string,uint256,uint256,string)"
        );
        assert_eq!(
            ShipmentTracker::createShipmentCall::SIGNATURE,
            "createShipment(string,string,string,string,string,uint256,address)"
        );
    }
}
