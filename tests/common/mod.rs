//! Shared utilities for integration tests.

use std::sync::{Arc, Mutex};

use trellis::{EventBus, EventKind};

/// Build a sealed bus with a single handler that records every event kind
/// it sees, in dispatch order.
pub fn recording_bus() -> (EventBus, Arc<Mutex<Vec<EventKind>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut builder = EventBus::builder();
    {
        let seen = seen.clone();
        builder.register("recorder", move |event| {
            seen.lock().unwrap().push(event.kind);
        });
    }
    (builder.seal(), seen)
}
