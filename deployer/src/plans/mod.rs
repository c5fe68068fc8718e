// SPDX-License-Identifier: MIT

//! Per-contract deployment plans and the calls that exercise each contract
//! right after it is deployed.

use alloy::{
    network::Ethereum, providers::PendingTransactionBuilder, rpc::types::TransactionReceipt,
};
use anyhow::{bail, Context};
use std::time::Duration;

pub mod product_tracking;
pub mod shipment;
pub mod tracking;
pub mod transparency;

/// Upper bound on the wait for a verification transaction to be mined.
pub const CALL_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(120);

/// -------------------------------------------
/// Waits for one confirmation of a state-changing verification call and
/// rejects reverted transactions.
/// -------------------------------------------
pub async fn confirmed(pending: PendingTransactionBuilder<Ethereum>) -> anyhow::Result<TransactionReceipt> {
    let tx_hash = *pending.tx_hash();
    let receipt = pending
        .with_required_confirmations(1)
        .with_timeout(Some(CALL_CONFIRMATION_TIMEOUT))
        .get_receipt()
        .await
        .with_context(|| format!("waiting for transaction {tx_hash}"))?;

    if !receipt.status() {
        bail!("transaction {tx_hash} reverted");
    }
    Ok(receipt)
}
