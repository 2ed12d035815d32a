//! Coordination store watch adapter.
//!
//! # Responsibilities
//! - Establish the store connection within a bounded timeout (fatal on miss)
//! - Keep a recursive (prefix) watch armed on the configured root, across
//!   stream failures and reconnects
//! - Emit one payload-less [`ChangeSignal`] per change notification
//!
//! # Design Decisions
//! - Signals are advisory: "something changed, re-read state". Duplicates
//!   and coalescing are acceptable; exactly-once is neither guaranteed nor
//!   required.
//! - Transient watch errors never crash the process; the loop logs a
//!   warning, waits the reconnect delay, and re-arms.

pub mod adapter;

pub use adapter::{connect, ChangeSignal, WatchSession};
