//! HTTP API layer.
//!
//! Thin collaborator over the core: reads come from the materialized
//! [`StateCache`](crate::state::StateCache), writes go straight to the
//! store (the watch pipeline then makes them visible), and the orchestrator
//! callback endpoint feeds the event bus.

pub mod server;

pub use server::{router, AppState};
