//! Process lifecycle management.
//!
//! # Phase machine
//! ```text
//! Initializing → ConnectingStore → Serving → Draining → Stopped
//! ```
//! - Initializing: config loaded, bus built, handlers registered
//! - ConnectingStore: store connection established; failure here is fatal
//! - Serving: listener accepting, signal listeners active, startup event out
//! - Draining: stop accepting, in-flight requests finish within the grace
//!   period, then remaining connections are closed
//! - Stopped: terminal; exit status is non-zero only for fatal startup errors
//!
//! Shutdown (SIGTERM/SIGINT) and child reaping (SIGCHLD) are two
//! independent signal listeners rather than one multiplexed channel.

pub mod reaper;
pub mod runner;
pub mod shutdown;
pub mod signals;

pub use runner::{run, Phase};
pub use shutdown::{DrainReason, Shutdown};
