//! Event propagation core.
//!
//! # Data Flow
//! ```text
//! store watch ──► ChangeSignal ──► producers.rs ──► EventBus ──► handlers
//!                                        ▲
//! process startup ───────────────────────┘  (one Startup event)
//! ```
//!
//! # Design Decisions
//! - The bus is built in two phases: handlers register on a [`BusBuilder`]
//!   during single-threaded startup, then the builder is sealed into an
//!   [`EventBus`] whose handler list is read-only. The registration/publish
//!   race cannot be expressed.
//! - Publish is synchronous and blocking: all handlers have run, in
//!   registration order, before `publish` returns.
//! - Duplicate events are not filtered; handlers must be idempotent.

pub mod bus;
pub mod event;
pub mod producers;

pub use bus::{BusBuilder, EventBus};
pub use event::{Event, EventKind};
