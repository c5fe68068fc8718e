// SPDX-License-Identifier: MIT

//! The seam between the runner and a live node.

use alloy::{
    network::{EthereumWallet, TransactionBuilder},
    primitives::{Address, Bytes, TxHash, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    transports::TransportError,
};
use async_trait::async_trait;
use std::time::Duration;

use crate::{config::NetworkContext, log_debug, DeployError};

/// Delay between two receipt lookups of a pending deployment.
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// What the runner needs to know about a mined deployment transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentReceipt {
    pub success: bool,
    pub contract_address: Option<Address>,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

#[async_trait]
pub trait DeployBackend: Send + Sync {
    /// Chain id reported by the node.
    async fn chain_id(&self) -> Result<u64, DeployError>;

    async fn balance(&self, account: Address) -> Result<U256, DeployError>;

    /// Submits a contract creation transaction and returns its hash.
    async fn send_deployment(&self, from: Address, init_code: Bytes) -> Result<TxHash, DeployError>;

    /// Blocks until the transaction is mined with one confirmation.
    async fn wait_for_deployment(
        &self,
        tx_hash: TxHash,
        timeout: Duration,
    ) -> Result<DeploymentReceipt, DeployError>;
}

/// JSON-RPC backend signing with every key of the network context.
#[derive(Clone)]
pub struct RpcBackend {
    network: String,
    provider: DynProvider,
}

impl RpcBackend {
    pub fn connect(context: &NetworkContext) -> Result<Self, DeployError> {
        let mut signers = context.signers.iter().cloned();
        let deployer = signers
            .next()
            .ok_or_else(|| DeployError::network(&context.name, "no signing account configured"))?;

        let mut wallet = EthereumWallet::from(deployer);
        for signer in signers {
            wallet.register_signer(signer);
        }

        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .on_http(context.rpc_url.clone())
            .erased();

        Ok(Self::new(&context.name, provider))
    }

    pub fn new(network: &str, provider: DynProvider) -> Self {
        Self {
            network: network.to_string(),
            provider,
        }
    }

    /// Provider used for typed contract calls after deployment.
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    fn unavailable(&self, err: impl ToString) -> DeployError {
        DeployError::network(&self.network, err)
    }
}

#[async_trait]
impl DeployBackend for RpcBackend {
    async fn chain_id(&self) -> Result<u64, DeployError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|err| self.unavailable(err))
    }

    async fn balance(&self, account: Address) -> Result<U256, DeployError> {
        self.provider
            .get_balance(account)
            .await
            .map_err(|err| self.unavailable(err))
    }

    async fn send_deployment(&self, from: Address, init_code: Bytes) -> Result<TxHash, DeployError> {
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_deploy_code(init_code);

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|err| DeployError::DeploymentTransactionFailed(err.to_string()))?;
        Ok(*pending.tx_hash())
    }

    async fn wait_for_deployment(
        &self,
        tx_hash: TxHash,
        timeout: Duration,
    ) -> Result<DeploymentReceipt, DeployError> {
        log_debug!("Waiting up to {timeout:?} for receipt of {tx_hash}");

        // A receipt means the transaction is in a block: one confirmation.
        let receipt = tokio::time::timeout(timeout, async {
            loop {
                if let Some(receipt) = self.provider.get_transaction_receipt(tx_hash).await? {
                    return Ok::<_, TransportError>(receipt);
                }
                tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
            }
        })
        .await
        .map_err(|_| DeployError::DeploymentTimeout { tx_hash, timeout })?
        .map_err(|err| {
            DeployError::DeploymentTransactionFailed(format!("receipt of {tx_hash}: {err}"))
        })?;

        Ok(DeploymentReceipt {
            success: receipt.status(),
            contract_address: receipt.contract_address,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }
}
