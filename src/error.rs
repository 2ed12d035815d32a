//! Error taxonomy for the bridge process.
//!
//! Only two conditions are fatal: no coordination-store connection and no
//! listening socket. Everything else is contained where it happens and
//! surfaced as a log line, so the HTTP API keeps serving its last-known-good
//! state while a watch or a handler misbehaves.

use thiserror::Error;

/// Errors raised by the watch adapter while talking to the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The initial connection did not complete within the configured bound.
    #[error("store connection timed out after {0} seconds")]
    ConnectTimeout(u64),

    /// The etcd client reported a failure.
    #[error("store error: {0}")]
    Client(#[from] etcd_client::Error),
}

/// Startup failures that make continued operation meaningless.
///
/// The process exits non-zero on any of these; nothing is retried.
#[derive(Debug, Error)]
pub enum FatalError {
    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// The coordination store could not be reached at startup.
    #[error("cannot connect to coordination store: {0}")]
    StoreConnect(#[from] StoreError),

    /// The HTTP listener could not be bound.
    #[error("cannot bind HTTP listener on {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    /// The HTTP server failed while serving.
    #[error("HTTP server error: {0}")]
    Serve(std::io::Error),
}
