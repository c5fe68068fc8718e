// SPDX-License-Identifier: MIT

use alloy::primitives::{Address, TxHash};
use std::{path::PathBuf, time::Duration};
use thiserror::Error;

/// Everything that can go wrong while deploying and checking a contract.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("contract `{name}` not found: {reason}")]
    ContractNotFound { name: String, reason: String },

    #[error("deployment transaction failed: {0}")]
    DeploymentTransactionFailed(String),

    #[error("deployment transaction {tx_hash} not confirmed within {timeout:?}")]
    DeploymentTimeout { tx_hash: TxHash, timeout: Duration },

    /// Non-fatal: only ever logged by the runner.
    #[error("verification call `{call}` failed: {reason}")]
    VerificationCallFailed { call: String, reason: String },

    #[error("contract deployed at {address} but {} could not be written: {source}", path.display())]
    FileWriteFailed {
        address: Address,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("network `{network}` unavailable: {reason}")]
    Network { network: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DeployError {
    pub fn contract_not_found(name: &str, reason: impl Into<String>) -> Self {
        Self::ContractNotFound {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn network(network: &str, reason: impl ToString) -> Self {
        Self::Network {
            network: network.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether the error must end the run with a nonzero exit code.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::VerificationCallFailed { .. })
    }

    /// Address of a contract that is live on chain despite this error.
    pub fn deployed_address(&self) -> Option<Address> {
        match self {
            Self::FileWriteFailed { address, .. } => Some(*address),
            _ => None,
        }
    }
}
