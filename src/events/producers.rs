//! Event producers: startup one-shot and the watch-signal pump.

use tokio::sync::mpsc;

use crate::events::{Event, EventBus, EventKind};
use crate::watch::ChangeSignal;

/// Publishes the one-and-only `Startup` event.
///
/// Must be called after the bus is sealed and before the HTTP listener
/// starts accepting, so handlers that force an initial reconciliation
/// observe a server that is not yet serving.
pub fn publish_startup(bus: &EventBus) {
    tracing::info!("Publishing startup event");
    bus.publish(Event::new(EventKind::Startup));
}

/// Pumps watch signals into the bus, one `ServiceChange` per signal.
///
/// Runs for the process lifetime. The only termination condition is a
/// closed signal stream, and that condition is itself abnormal: the watch
/// session is gone and the process would keep serving stale state without
/// reacting to the store. It is escalated as a process-level error log.
pub async fn run_change_producer(mut signals: mpsc::Receiver<ChangeSignal>, bus: EventBus) {
    while signals.recv().await.is_some() {
        bus.publish(Event::new(EventKind::ServiceChange));
    }
    tracing::error!(
        "Watch signal stream closed; no longer reacting to store changes \
         while still serving last-known state"
    );
}
