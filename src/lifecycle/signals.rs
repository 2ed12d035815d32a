//! Termination signal handling.
//!
//! Completes when the process receives a termination signal, reporting
//! which one as a [`DrainReason`]. Child-process reaping is handled by the
//! separate [`reaper`](crate::lifecycle::reaper) listener; this one only
//! covers operator/OS shutdown requests.

use crate::lifecycle::shutdown::DrainReason;

/// Wait for SIGTERM or SIGINT (plus ctrl_c as a fallback).
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<DrainReason> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    let reason = tokio::select! {
        _ = tokio::signal::ctrl_c() => DrainReason::Interrupt,
        _ = sigint.recv() => DrainReason::Interrupt,
        _ = sigterm.recv() => DrainReason::Terminate,
    };
    Ok(reason)
}

#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<DrainReason> {
    tokio::signal::ctrl_c().await.map(|_| DrainReason::Interrupt)
}
