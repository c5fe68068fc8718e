// SPDX-License-Identifier: MIT

use alloy::primitives::Bytes;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{log_debug, DeployError};

/// The parts of a Hardhat compilation artifact needed to deploy a contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub contract_name: String,
    pub bytecode: Bytes,
}

impl Artifact {
    /// `<artifacts>/contracts/<Name>.sol/<Name>.json`
    pub fn path(artifacts_dir: &Path, contract_name: &str) -> PathBuf {
        artifacts_dir
            .join("contracts")
            .join(format!("{contract_name}.sol"))
            .join(format!("{contract_name}.json"))
    }

    /// -------------------------------------------
    /// Loads the artifact of a contract by name. Any problem locating a
    /// deployable bytecode is reported as `ContractNotFound`.
    /// -------------------------------------------
    pub fn load(artifacts_dir: &Path, contract_name: &str) -> Result<Self, DeployError> {
        let path = Self::path(artifacts_dir, contract_name);
        log_debug!("Loading artifact {}", path.display());

        let contents = fs::read_to_string(&path).map_err(|err| {
            DeployError::contract_not_found(
                contract_name,
                format!("cannot read {}: {err} (was the project compiled?)", path.display()),
            )
        })?;

        let artifact: Artifact = serde_json::from_str(&contents).map_err(|err| {
            DeployError::contract_not_found(
                contract_name,
                format!("malformed artifact {}: {err}", path.display()),
            )
        })?;

        if artifact.contract_name != contract_name {
            return Err(DeployError::contract_not_found(
                contract_name,
                format!("{} describes `{}`", path.display(), artifact.contract_name),
            ));
        }
        if artifact.bytecode.is_empty() {
            return Err(DeployError::contract_not_found(
                contract_name,
                "artifact has no creation bytecode (abstract contract or interface)",
            ));
        }
        Ok(artifact)
    }

    /// Creation bytecode followed by the ABI-encoded constructor arguments.
    pub fn init_code(&self, constructor_args: &[u8]) -> Bytes {
        let mut code = Vec::with_capacity(self.bytecode.len() + constructor_args.len());
        code.extend_from_slice(&self.bytecode);
        code.extend_from_slice(constructor_args);
        code.into()
    }
}
