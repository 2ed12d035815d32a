//! trellis: bridges an etcd service registry to an HTTP state API.
//!
//! # Architecture Overview
//!
//! ```text
//!   etcd cluster ──watch──► watch adapter ──signals──► change producer
//!                                                            │
//!   process startup ──────────────────────────► startup      │
//!                                               producer     ▼
//!                                                   └────► event bus
//!                                                            │ (sync fanout,
//!                                                            │  registration order)
//!                                          ┌─────────────────┼──────────────┐
//!                                          ▼                                ▼
//!                                   state refresher                   reload hook
//!                                   (prefix re-read)                  (forked child,
//!                                          │                           reaped on SIGCHLD)
//!                                          ▼
//!                                     StateCache ──reads──► HTTP API (axum)
//! ```
//!
//! The lifecycle runner owns startup ordering (store connection before the
//! listener), termination-signal handling, child reaping, and the bounded
//! graceful drain.

// Core subsystems
pub mod config;
pub mod events;
pub mod http;
pub mod state;
pub mod watch;

// Cross-cutting concerns
pub mod error;
pub mod lifecycle;
pub mod orchestrator;

pub use config::Config;
pub use error::{FatalError, StoreError};
pub use events::{Event, EventBus, EventKind};
pub use lifecycle::Shutdown;
