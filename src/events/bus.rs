//! In-process publish/subscribe bus.
//!
//! # Responsibilities
//! - Hold the ordered handler list (registration order = dispatch order)
//! - Dispatch each published event to every handler, synchronously
//! - Isolate handler panics so siblings and the publisher are unaffected
//!
//! # Design Decisions
//! - Two-phase construction: [`BusBuilder::register`] only exists before
//!   [`BusBuilder::seal`], so the handler list is immutable once background
//!   publishing can begin. The hot publish path takes no locks.
//! - No unregistration, no priorities, no dedup.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use super::event::Event;

/// A registered consumer of bus events.
///
/// Handlers observe the event by reference and return nothing; failure is
/// the handler's own responsibility and never reaches the publisher.
pub type Handler = Box<dyn Fn(&Event) + Send + Sync>;

struct Registration {
    name: &'static str,
    handler: Handler,
}

/// Builder-phase bus: accepts registrations during single-threaded startup.
#[derive(Default)]
pub struct BusBuilder {
    registrations: Vec<Registration>,
}

impl BusBuilder {
    /// Appends a handler. Dispatch order follows registration order.
    pub fn register<F>(&mut self, name: &'static str, handler: F)
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.registrations.push(Registration {
            name,
            handler: Box::new(handler),
        });
    }

    /// Seals the handler list. After this point handlers can only be
    /// invoked, never added.
    pub fn seal(self) -> EventBus {
        tracing::debug!(handlers = self.registrations.len(), "Event bus sealed");
        EventBus {
            registrations: Arc::from(self.registrations.into_boxed_slice()),
        }
    }
}

/// Sealed bus: cheap to clone, shared by every producer.
#[derive(Clone)]
pub struct EventBus {
    registrations: Arc<[Registration]>,
}

impl EventBus {
    pub fn builder() -> BusBuilder {
        BusBuilder::default()
    }

    /// Dispatches `event` to every registered handler, in registration
    /// order, on the calling execution context.
    ///
    /// A panicking handler is caught and logged; the remaining handlers
    /// still run and the call returns normally. With zero handlers this is
    /// a no-op.
    pub fn publish(&self, event: Event) {
        for registration in self.registrations.iter() {
            let outcome = catch_unwind(AssertUnwindSafe(|| (registration.handler)(&event)));
            if let Err(panic) = outcome {
                let reason = panic_message(&panic);
                tracing::error!(
                    handler = registration.name,
                    kind = ?event.kind,
                    reason,
                    "Event handler panicked; continuing with remaining handlers"
                );
            }
        }
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.registrations.len()
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}
