//! End-to-end event propagation: startup sequencing and the signal pump.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use trellis::events::producers;
use trellis::watch::ChangeSignal;
use trellis::{EventBus, EventKind};

mod common;

/// The startup event must be dispatched strictly before the listener starts
/// accepting. The runner publishes first and binds afterwards; this wires
/// the same sequence and asserts the handler observed a non-listening
/// server.
#[tokio::test]
async fn startup_event_observes_server_not_yet_listening() {
    let listening = Arc::new(AtomicBool::new(false));
    let observed = Arc::new(Mutex::new(Vec::new()));

    let mut builder = EventBus::builder();
    {
        let listening = listening.clone();
        let observed = observed.clone();
        builder.register("startup-probe", move |event| {
            if event.kind == EventKind::Startup {
                observed.lock().unwrap().push(listening.load(Ordering::SeqCst));
            }
        });
    }
    let bus = builder.seal();

    producers::publish_startup(&bus);

    // Only now does the server come up.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listening.store(true, Ordering::SeqCst);
    drop(listener);

    let observed = observed.lock().unwrap();
    assert_eq!(observed.len(), 1, "startup must fire exactly once");
    assert!(!observed[0], "handler must see server-not-yet-listening");
}

#[tokio::test]
async fn signals_become_service_change_events_in_arrival_order() {
    let (bus, seen) = common::recording_bus();
    let (tx, rx) = mpsc::channel(8);

    producers::publish_startup(&bus);
    let pump = tokio::spawn(producers::run_change_producer(rx, bus));

    for _ in 0..4 {
        tx.send(ChangeSignal).await.unwrap();
    }
    drop(tx);
    pump.await.unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            EventKind::Startup,
            EventKind::ServiceChange,
            EventKind::ServiceChange,
            EventKind::ServiceChange,
            EventKind::ServiceChange,
        ]
    );
}

/// Two handlers where the first panics: the publisher (the pump) must keep
/// running and the second handler must see every event.
#[tokio::test]
async fn pump_survives_panicking_handler() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut builder = EventBus::builder();
    builder.register("bomb", |_| panic!("handler failure"));
    {
        let seen = seen.clone();
        builder.register("survivor", move |event| {
            seen.lock().unwrap().push(event.kind);
        });
    }
    let bus = builder.seal();

    let (tx, rx) = mpsc::channel(4);
    let pump = tokio::spawn(producers::run_change_producer(rx, bus));

    tx.send(ChangeSignal).await.unwrap();
    tx.send(ChangeSignal).await.unwrap();
    drop(tx);
    pump.await.unwrap();

    assert_eq!(seen.lock().unwrap().len(), 2);
}
