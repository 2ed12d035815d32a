//! Child-process reaper.
//!
//! The reload hook forks children that nothing waits on; without a reaper
//! every exited child would linger as a zombie. This listener wakes on
//! SIGCHLD and collects exit statuses non-blockingly, discarding them.
//! It never exits voluntarily; process exit tears it down.

/// Run the SIGCHLD listener loop.
#[cfg(unix)]
pub async fn run() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigchld = match signal(SignalKind::child()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to install SIGCHLD handler; zombies will accumulate");
            return;
        }
    };

    loop {
        if sigchld.recv().await.is_none() {
            return;
        }
        let reaped = reap_pending();
        if reaped > 0 {
            tracing::debug!(reaped, "Collected exited child processes");
        }
    }
}

#[cfg(not(unix))]
pub async fn run() {}

/// Collect every already-exited child without blocking.
///
/// One SIGCHLD can stand for several exited children, so this sweeps until
/// `waitpid` has nothing more to report.
#[cfg(unix)]
pub fn reap_pending() -> usize {
    let mut reaped = 0;
    loop {
        let pid = unsafe { libc::waitpid(-1, std::ptr::null_mut(), libc::WNOHANG) };
        if pid <= 0 {
            break;
        }
        reaped += 1;
    }
    reaped
}
