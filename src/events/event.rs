//! Domain events dispatched over the bus.

use std::time::SystemTime;

/// Classification of domain events.
///
/// The set is closed and deliberately small: events carry no payload beyond
/// their kind, so consumers re-read the materialized state instead of
/// applying diffs. Duplicate or coalesced notifications are expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// The process just (re)booted. Published exactly once, before the HTTP
    /// listener starts accepting; used to force an initial reconciliation.
    Startup,

    /// Something changed under the watched store subtree. Advisory only:
    /// consumers must re-read, not assume what changed.
    ServiceChange,
}

/// Immutable event value.
///
/// Created by a producer, owned by the bus for one dispatch cycle, discarded
/// after all handlers return. Never persisted.
#[derive(Debug, Clone)]
pub struct Event {
    /// Event classification.
    pub kind: EventKind,

    /// Wall-clock timestamp at publish.
    pub at: SystemTime,
}

impl Event {
    /// Creates a new event of the given kind stamped with the current time.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            at: SystemTime::now(),
        }
    }
}
