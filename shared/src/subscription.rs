// SPDX-License-Identifier: MIT

//! Long-lived contract event listeners with an explicit cancellation handle.

use alloy::{
    primitives::Address,
    providers::{DynProvider, Provider},
    rpc::types::{Filter, Log},
};
use futures::{stream, Stream, StreamExt};
use tokio::{sync::oneshot, task::JoinHandle};

use crate::{log_debug, log_info, log_warn, DeployError};

/// Handle of a running listener. Dropping it also stops the listener.
pub struct Subscription {
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<usize>,
}

impl Subscription {
    /// -------------------------------------------
    /// Feeds every log of `logs` that `decode` understands into `handler`
    /// until the stream ends or the subscription is cancelled.
    /// -------------------------------------------
    pub fn spawn<S, E, D, H>(logs: S, decode: D, mut handler: H) -> Self
    where
        S: Stream<Item = Log> + Send + 'static,
        D: Fn(&Log) -> Option<E> + Send + 'static,
        E: Send + 'static,
        H: FnMut(E) + Send + 'static,
    {
        let (cancel, mut cancelled) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut logs = std::pin::pin!(logs);
            let mut delivered = 0;
            loop {
                tokio::select! {
                    _ = &mut cancelled => break,
                    next = logs.next() => match next {
                        Some(log) => match decode(&log) {
                            Some(event) => {
                                handler(event);
                                delivered += 1;
                            }
                            None => log_debug!("Skipping undecodable log {:?}", log.transaction_hash),
                        },
                        None => break,
                    },
                }
            }
            delivered
        });

        Self {
            cancel: Some(cancel),
            task,
        }
    }

    /// Polls the node for logs emitted by `address`.
    pub async fn watch<E, D, H>(
        provider: &DynProvider,
        network: &str,
        address: Address,
        decode: D,
        handler: H,
    ) -> Result<Self, DeployError>
    where
        D: Fn(&Log) -> Option<E> + Send + 'static,
        E: Send + 'static,
        H: FnMut(E) + Send + 'static,
    {
        let filter = Filter::new().address(address);
        let poller = provider
            .watch_logs(&filter)
            .await
            .map_err(|err| DeployError::network(network, err))?;
        log_info!("🎧 Listening for events of {address}");

        let logs = poller.into_stream().flat_map(stream::iter);
        Ok(Self::spawn(logs, decode, handler))
    }

    /// Stops the listener and returns how many events it delivered.
    pub async fn unsubscribe(mut self) -> usize {
        if let Some(cancel) = self.cancel.take() {
            // The listener may already have stopped on its own.
            let _ = cancel.send(());
        }
        match self.task.await {
            Ok(delivered) => delivered,
            Err(err) => {
                log_warn!("Event listener ended abnormally: {err}");
                0
            }
        }
    }
}
