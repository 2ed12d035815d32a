//! Graceful drain behavior of the serve loop.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use trellis::lifecycle::runner::serve_with_drain;
use trellis::lifecycle::{DrainReason, Shutdown};

async fn bind_local() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

/// A request in flight when the termination signal arrives must still
/// complete, and the serve loop must then return cleanly.
#[tokio::test]
async fn in_flight_request_completes_during_drain() {
    let app = Router::new().route(
        "/slow",
        get(|| async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            "done"
        }),
    );
    let (listener, addr) = bind_local().await;
    let shutdown = Shutdown::new();

    let server = tokio::spawn(serve_with_drain(
        listener,
        app,
        shutdown.clone(),
        Duration::from_secs(5),
    ));

    let request = tokio::spawn(async move {
        reqwest::get(format!("http://{addr}/slow")).await.unwrap()
    });

    // Let the request reach the handler, then drain.
    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown.trigger(DrainReason::Terminate);

    let response = request.await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "done");

    let result = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("serve loop must stop after drain")
        .unwrap();
    assert!(result.is_ok(), "drained serve loop must return cleanly");
}

/// Once the grace period expires, remaining connections are closed and the
/// serve loop returns instead of waiting forever.
#[tokio::test]
async fn drain_is_bounded_by_grace_period() {
    let app = Router::new().route(
        "/hang",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            "unreachable"
        }),
    );
    let (listener, addr) = bind_local().await;
    let shutdown = Shutdown::new();

    let server = tokio::spawn(serve_with_drain(
        listener,
        app,
        shutdown.clone(),
        Duration::from_millis(200),
    ));

    let hanging = tokio::spawn(async move { reqwest::get(format!("http://{addr}/hang")).await });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let drain_started = Instant::now();
    shutdown.trigger(DrainReason::Terminate);

    let result = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("serve loop must stop once grace expires")
        .unwrap();
    assert!(result.is_ok());
    assert!(
        drain_started.elapsed() < Duration::from_secs(5),
        "drain must not wait for the hanging request"
    );

    hanging.abort();
}

/// After the drain completes nothing is accepting on the old address.
#[tokio::test]
async fn listener_is_closed_after_drain() {
    let app = Router::new().route("/status", get(|| async { "OK" }));
    let (listener, addr) = bind_local().await;
    let shutdown = Shutdown::new();

    let server = tokio::spawn(serve_with_drain(
        listener,
        app,
        shutdown.clone(),
        Duration::from_secs(1),
    ));

    // Server is up.
    let response = reqwest::get(format!("http://{addr}/status")).await.unwrap();
    assert_eq!(response.status(), 200);

    shutdown.trigger(DrainReason::Terminate);
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("serve loop must stop")
        .unwrap()
        .unwrap();

    let err = tokio::net::TcpStream::connect(addr).await;
    assert!(err.is_err(), "no listener may remain after drain");
}
