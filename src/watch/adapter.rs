//! Store connection and watch loop.

use std::time::Duration;

use etcd_client::{Client, ConnectOptions, WatchOptions};
use tokio::sync::mpsc;

use crate::config::StoreConfig;
use crate::error::StoreError;

/// Payload-less change notification. Consumers re-read state on receipt.
#[derive(Debug, Clone, Copy)]
pub struct ChangeSignal;

/// One live connection plus the logical watch registration on a root path.
///
/// At most one session exists per configured root. The client handle is
/// shared read-only afterwards (further reads, service writes); only the
/// internal watch loop re-arms watches on it. The connection is closed only
/// by process exit.
#[derive(Clone)]
pub struct WatchSession {
    client: Client,
    root: String,
    recursive: bool,
    reconnect_delay: Duration,
}

impl WatchSession {
    /// Clone of the underlying client handle for further store operations.
    pub fn client(&self) -> Client {
        self.client.clone()
    }

    /// The watched root path.
    pub fn root(&self) -> &str {
        &self.root
    }
}

/// Connects to the store and arms the watch.
///
/// Returns the signal stream and the live session. Fails if the connection
/// cannot be established within `store.connect_timeout_secs`; the caller
/// treats that as fatal, since serving without a store connection is
/// meaningless.
pub async fn connect(
    config: &StoreConfig,
) -> Result<(mpsc::Receiver<ChangeSignal>, WatchSession), StoreError> {
    let options = ConnectOptions::new().with_connect_timeout(config.connect_timeout());
    let client = tokio::time::timeout(
        config.connect_timeout(),
        Client::connect(&config.endpoints, Some(options)),
    )
    .await
    .map_err(|_| StoreError::ConnectTimeout(config.connect_timeout_secs))??;

    tracing::info!(
        endpoints = ?config.endpoints,
        root = %config.root_path,
        "Connected to coordination store"
    );

    let session = WatchSession {
        client,
        root: config.root_path.clone(),
        recursive: config.recursive,
        reconnect_delay: config.reconnect_delay(),
    };

    let (tx, rx) = mpsc::channel(64);
    tokio::spawn(watch_loop(session.clone(), tx));

    Ok((rx, session))
}

/// Keeps the watch armed for the process lifetime.
///
/// The outer loop re-arms after any stream end or error; the inner loop
/// forwards one signal per notification batch. Exits only when the signal
/// receiver is dropped (process teardown).
async fn watch_loop(session: WatchSession, tx: mpsc::Sender<ChangeSignal>) {
    let mut client = session.client.clone();
    loop {
        let options = session
            .recursive
            .then(|| WatchOptions::new().with_prefix());

        match client.watch(session.root.as_str(), options).await {
            Ok((_watcher, mut stream)) => {
                tracing::debug!(root = %session.root, "Watch armed");
                loop {
                    match stream.message().await {
                        Ok(Some(response)) => {
                            if response.canceled() {
                                tracing::warn!(root = %session.root, "Watch canceled by server");
                                break;
                            }
                            if response.events().is_empty() {
                                continue;
                            }
                            if tx.send(ChangeSignal).await.is_err() {
                                return;
                            }
                        }
                        Ok(None) => {
                            tracing::warn!(root = %session.root, "Watch stream ended");
                            break;
                        }
                        Err(e) => {
                            tracing::warn!(root = %session.root, error = %e, "Watch stream error");
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                tracing::warn!(root = %session.root, error = %e, "Failed to arm watch, will retry");
            }
        }

        tokio::time::sleep(session.reconnect_delay).await;
    }
}
