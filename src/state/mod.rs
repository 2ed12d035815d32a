//! Materialized service state.
//!
//! # Data Flow
//! ```text
//! Startup / ServiceChange event
//!     → refresh handler (try_send, coalescing)
//!     → refresher task (full prefix re-read from the store)
//!     → StateCache (atomic snapshot swap)
//!     → HTTP handlers (lock-free reads)
//! ```
//!
//! # Design Decisions
//! - Handlers stay non-blocking: the bus handler only requests a refresh;
//!   the refresher task owns the store I/O.
//! - Refresh failures keep the previous snapshot; the API serves
//!   last-known-good state until the store is reachable again.

pub mod cache;
pub mod handlers;

pub use cache::{Service, ServiceState, StateCache};
pub use handlers::{refresh_handler, reload_hook_handler, run_refresher};
