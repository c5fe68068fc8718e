// SPDX-License-Identifier: MIT

//! Network configuration: a TOML file shaped like a Hardhat config, a
//! built-in `localhost` fallback, and environment overrides.

use alloy::{primitives::Address, signers::local::PrivateKeySigner};
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fmt, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use url::Url;

use crate::{log_debug, DeployError};

pub const DEFAULT_CONFIG_FILE: &str = "deploy.toml";
pub const DEFAULT_NETWORK: &str = "localhost";
pub const DEFAULT_CONFIRMATION_TIMEOUT_SECS: u64 = 120;

const LOCALHOST_RPC_URL: &str = "http://127.0.0.1:8545";
const LOCALHOST_CHAIN_ID: u64 = 31337;

/// The first well-known Hardhat development accounts.
const HARDHAT_DEV_KEYS: [&str; 3] = [
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
    "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
    "0x5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a",
];

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeployConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkConfig>,
    #[serde(default = "default_confirmation_timeout_secs")]
    pub confirmation_timeout_secs: u64,
}

/// Where artifacts are read from and where results are persisted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub artifacts: PathBuf,
    pub deployments: PathBuf,
    pub env_file: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
    pub url: Url,
    pub chain_id: u64,
    #[serde(default)]
    pub accounts: Vec<String>,
}

/// Values picked up from the process environment (and `.env`).
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub network: Option<String>,
    pub rpc_url: Option<String>,
    pub private_key: Option<String>,
    pub confirmation_timeout_secs: Option<u64>,
}

/// Static description of what is deployed where. Immutable per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTarget {
    pub contract_name: String,
    pub network: String,
    pub chain_id: u64,
}

/// Everything the runner needs to reach a network: endpoint, chain and signers.
#[derive(Clone)]
pub struct NetworkContext {
    pub name: String,
    pub rpc_url: Url,
    pub chain_id: u64,
    pub signers: Vec<PrivateKeySigner>,
    pub confirmation_timeout: Duration,
}

fn default_confirmation_timeout_secs() -> u64 {
    DEFAULT_CONFIRMATION_TIMEOUT_SECS
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            artifacts: PathBuf::from("artifacts"),
            deployments: PathBuf::from("deployments"),
            env_file: PathBuf::from(".env"),
        }
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        let localhost = NetworkConfig {
            url: Url::parse(LOCALHOST_RPC_URL).expect("static url is valid"),
            chain_id: LOCALHOST_CHAIN_ID,
            accounts: HARDHAT_DEV_KEYS.iter().map(|key| key.to_string()).collect(),
        };
        Self {
            paths: PathsConfig::default(),
            networks: BTreeMap::from([(DEFAULT_NETWORK.to_string(), localhost)]),
            confirmation_timeout_secs: DEFAULT_CONFIRMATION_TIMEOUT_SECS,
        }
    }
}

impl DeployConfig {
    /// -------------------------------------------
    /// Reads the configuration file, falling back to the built-in localhost
    /// network when the file does not exist.
    /// -------------------------------------------
    pub fn load(path: &Path) -> Result<Self, DeployError> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log_debug!("{} not found, using built-in localhost network", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(DeployError::Config(format!(
                "failed to read {}: {err}",
                path.display()
            ))),
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self, DeployError> {
        toml::from_str(contents).map_err(|err| DeployError::Config(err.to_string()))
    }

    /// -------------------------------------------
    /// Resolves a named network into a `NetworkContext`, applying overrides.
    /// -------------------------------------------
    pub fn network_context(
        &self,
        name: &str,
        overrides: &EnvOverrides,
    ) -> Result<NetworkContext, DeployError> {
        let network = self.networks.get(name).ok_or_else(|| {
            let known: Vec<&str> = self.networks.keys().map(String::as_str).collect();
            DeployError::Config(format!(
                "unknown network `{name}` (configured: {})",
                known.join(", ")
            ))
        })?;

        let rpc_url = match &overrides.rpc_url {
            Some(url) => Url::parse(url)
                .map_err(|err| DeployError::Config(format!("invalid ETH_RPC_URL `{url}`: {err}")))?,
            None => network.url.clone(),
        };

        let mut signers = Vec::with_capacity(network.accounts.len() + 1);
        if let Some(key) = &overrides.private_key {
            signers.push(parse_signer(key, "WALLET_PRIV_KEY")?);
        }
        for (index, key) in network.accounts.iter().enumerate() {
            signers.push(parse_signer(key, &format!("networks.{name}.accounts[{index}]"))?);
        }

        let timeout_secs = overrides
            .confirmation_timeout_secs
            .unwrap_or(self.confirmation_timeout_secs);

        Ok(NetworkContext {
            name: name.to_string(),
            rpc_url,
            chain_id: network.chain_id,
            signers,
            confirmation_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_signer(key: &str, origin: &str) -> Result<PrivateKeySigner, DeployError> {
    // Never echo the key itself.
    key.trim()
        .parse::<PrivateKeySigner>()
        .map_err(|_| DeployError::Config(format!("{origin} is not a valid private key")))
}

impl EnvOverrides {
    /// Reads `NETWORK`, `ETH_RPC_URL`, `WALLET_PRIV_KEY` and `CONFIRMATION_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, DeployError> {
        let var = |name: &str| std::env::var(name).ok().filter(|value| !value.trim().is_empty());

        let confirmation_timeout_secs = match var("CONFIRMATION_TIMEOUT_SECS") {
            Some(value) => Some(value.trim().parse::<u64>().map_err(|err| {
                DeployError::Config(format!("invalid CONFIRMATION_TIMEOUT_SECS `{value}`: {err}"))
            })?),
            None => None,
        };

        Ok(Self {
            network: var("NETWORK"),
            rpc_url: var("ETH_RPC_URL"),
            private_key: var("WALLET_PRIV_KEY"),
            confirmation_timeout_secs,
        })
    }

    /// Command line first, then `NETWORK`, then `localhost`.
    pub fn network_name(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| self.network.clone())
            .unwrap_or_else(|| DEFAULT_NETWORK.to_string())
    }
}

impl NetworkContext {
    /// The account that sends deployment transactions.
    pub fn deployer(&self) -> Option<&PrivateKeySigner> {
        self.signers.first()
    }

    pub fn signer_addresses(&self) -> Vec<Address> {
        self.signers.iter().map(|signer| signer.address()).collect()
    }

    pub fn target(&self, contract_name: &str) -> DeploymentTarget {
        DeploymentTarget {
            contract_name: contract_name.to_string(),
            network: self.name.clone(),
            chain_id: self.chain_id,
        }
    }
}

impl fmt::Debug for NetworkContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkContext")
            .field("name", &self.name)
            .field("rpc_url", &self.rpc_url.as_str())
            .field("chain_id", &self.chain_id)
            .field("signers", &self.signer_addresses())
            .field("confirmation_timeout", &self.confirmation_timeout)
            .finish()
    }
}
