// SPDX-License-Identifier: MIT

use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::runner::Deployment;

/// Durable trace of one successful deployment, one file per contract and network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub contract_address: Address,
    pub network: String,
    pub chain_id: String,
    pub deployment_time: DateTime<Utc>,
    pub deployer: Address,
    pub contract_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub test_products_registered: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl DeploymentRecord {
    pub fn new(deployment: &Deployment) -> Self {
        Self {
            contract_address: deployment.address,
            network: deployment.target.network.clone(),
            chain_id: deployment.target.chain_id.to_string(),
            deployment_time: Utc::now(),
            deployer: deployment.deployer,
            contract_name: deployment.target.contract_name.clone(),
            version: None,
            test_products_registered: Vec::new(),
            features: Vec::new(),
        }
    }

    /// `tracking-localhost.json`, `product-tracking-sepolia.json`, ...
    pub fn file_name(&self) -> String {
        format!("{}-{}.json", contract_slug(&self.contract_name), self.network)
    }

    /// Writes the record as pretty JSON below `dir`, creating it recursively.
    pub fn write(&self, dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(&path, json)?;
        Ok(path)
    }
}

/// Kebab-case form of a contract name.
pub fn contract_slug(contract_name: &str) -> String {
    let mut slug = String::with_capacity(contract_name.len() + 4);
    let mut previous_lower = false;
    for ch in contract_name.chars() {
        if ch.is_ascii_uppercase() {
            if previous_lower {
                slug.push('-');
            }
            slug.push(ch.to_ascii_lowercase());
            previous_lower = false;
        } else {
            slug.push(ch);
            previous_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeploymentTarget;
    use alloy::primitives::TxHash;

    fn deployment() -> Deployment {
        Deployment {
            target: DeploymentTarget {
                contract_name: "Tracking".into(),
                network: "localhost".into(),
                chain_id: 31337,
            },
            address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".parse().unwrap(),
            deployer: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap(),
            tx_hash: TxHash::repeat_byte(0xaa),
            block_number: Some(1),
            gas_used: 1_500_000,
        }
    }

    #[test]
    fn slugs() {
        assert_eq!(contract_slug("Tracking"), "tracking");
        assert_eq!(contract_slug("ProductTracking"), "product-tracking");
        assert_eq!(contract_slug("TrackingWithTransparency"), "tracking-with-transparency");
    }

    #[test]
    fn json_layout_uses_camel_case_and_string_chain_id() {
        let mut record = DeploymentRecord::new(&deployment());
        record.version = Some("Enhanced for Analytics".into());
        record.test_products_registered = vec!["MYA001".into(), "MYA002".into()];

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["chainId"], "31337");
        assert_eq!(json["network"], "localhost");
        assert_eq!(json["contractName"], "Tracking");
        assert_eq!(json["version"], "Enhanced for Analytics");
        assert_eq!(json["testProductsRegistered"][1], "MYA002");
        assert!(json["deploymentTime"].as_str().unwrap().ends_with('Z'));
        assert!(json["contractAddress"]
            .as_str()
            .unwrap()
            .eq_ignore_ascii_case("0x5FbDB2315678afecb367f032d93F642f64180aa3"));
    }

    #[test]
    fn write_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("deployments");
        let record = DeploymentRecord::new(&deployment());

        let path = record.write(&nested).unwrap();

        assert_eq!(path, nested.join("tracking-localhost.json"));
        let stored: DeploymentRecord =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(stored.contract_address, record.contract_address);
    }
}
