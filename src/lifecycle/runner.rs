//! Startup orchestration and the serve/drain loop.
//!
//! # Responsibilities
//! - Drive the lifecycle phases in order
//! - Register handlers before any event can be published
//! - Connect the store before the listener exists (handlers depend on the
//!   connection handle; a process without a store connection is useless)
//! - Publish the startup event before the server accepts connections
//! - Bound the drain on shutdown by the configured grace period

use std::fmt;
use std::future::IntoFuture;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::error::FatalError;
use crate::events::{producers, EventBus};
use crate::http::{self, AppState};
use crate::lifecycle::{reaper, signals, Shutdown};
use crate::orchestrator;
use crate::state::{self, StateCache};
use crate::watch;

/// Lifecycle phases, logged at every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    ConnectingStore,
    Serving,
    Draining,
    Stopped,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Initializing => "initializing",
            Phase::ConnectingStore => "connecting_store",
            Phase::Serving => "serving",
            Phase::Draining => "draining",
            Phase::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Run the process to completion.
///
/// Returns `Ok(())` after a clean drain; any `Err` is a fatal startup or
/// serve failure the caller maps to a non-zero exit status.
pub async fn run(config: Config) -> Result<(), FatalError> {
    tracing::info!(phase = %Phase::Initializing, "Lifecycle");

    let cache = StateCache::new();
    let (refresh_tx, refresh_rx) = mpsc::channel(1);

    // All registration happens here, single-threaded, before anything can
    // publish. The sealed bus has an immutable handler list.
    let mut builder = EventBus::builder();
    builder.register("state-refresh", state::refresh_handler(refresh_tx));
    if let Some(command) = config.hooks.reload_command.clone() {
        builder.register("reload-hook", state::reload_hook_handler(command));
    }
    let bus = builder.seal();

    tracing::info!(phase = %Phase::ConnectingStore, "Lifecycle");
    let (change_signals, session) = watch::connect(&config.store).await?;

    tokio::spawn(state::run_refresher(
        session.client(),
        session.root().to_string(),
        cache.clone(),
        refresh_rx,
    ));
    tokio::spawn(reaper::run());
    tokio::spawn(producers::run_change_producer(change_signals, bus.clone()));

    // Startup fires before the listener exists, so its handlers observe a
    // server that is not yet accepting.
    producers::publish_startup(&bus);

    orchestrator::register_callbacks(&config.orchestrator).await;

    let listener = TcpListener::bind(&config.server.bind_address)
        .await
        .map_err(|e| FatalError::Bind {
            addr: config.server.bind_address.clone(),
            source: e,
        })?;
    let addr = listener.local_addr().map_err(FatalError::Serve)?;
    tracing::info!(phase = %Phase::Serving, address = %addr, "Lifecycle");

    let app = http::router(
        AppState {
            cache,
            store: session.client(),
            root: session.root().to_string(),
            bus,
        },
        config.server.request_timeout(),
    );

    let shutdown = Shutdown::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            match signals::wait_for_shutdown_signal().await {
                Ok(reason) => {
                    tracing::info!(%reason, "Termination signal received");
                    shutdown.trigger(reason);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install termination signal handler");
                }
            }
        });
    }

    serve_with_drain(listener, app, shutdown, config.server.drain_grace())
        .await
        .map_err(FatalError::Serve)?;

    tracing::info!(phase = %Phase::Stopped, "Lifecycle");
    Ok(())
}

/// Serve until the shutdown coordinator fires, then drain.
///
/// In-flight requests get `grace` to finish; whatever is still open after
/// that is closed by aborting the serve task. The watch session and event
/// bus are not torn down here; process exit reclaims them.
pub async fn serve_with_drain(
    listener: TcpListener,
    app: Router,
    shutdown: Shutdown,
    grace: Duration,
) -> std::io::Result<()> {
    let mut stop = shutdown.subscribe();
    let mut draining = shutdown.subscribe();

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = stop.recv().await;
        });
    let mut serve_task = tokio::spawn(server.into_future());

    tokio::select! {
        result = &mut serve_task => flatten_join(result),
        received = draining.recv() => {
            let reason = received
                .map(|r| r.to_string())
                .unwrap_or_else(|_| "coordinator dropped".to_string());
            tracing::info!(
                phase = %Phase::Draining,
                reason = %reason,
                grace_secs = grace.as_secs(),
                waiting_tasks = shutdown.receiver_count(),
                "Lifecycle"
            );
            match tokio::time::timeout(grace, &mut serve_task).await {
                Ok(result) => flatten_join(result),
                Err(_) => {
                    tracing::warn!("Drain grace exceeded; closing remaining connections");
                    serve_task.abort();
                    Ok(())
                }
            }
        }
    }
}

fn flatten_join(
    result: Result<std::io::Result<()>, tokio::task::JoinError>,
) -> std::io::Result<()> {
    result.unwrap_or_else(|e| Err(std::io::Error::other(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_render_for_logs() {
        assert_eq!(Phase::ConnectingStore.to_string(), "connecting_store");
        assert_eq!(Phase::Stopped.to_string(), "stopped");
    }
}
