//! Bus handlers and the refresher task feeding [`StateCache`].

use std::collections::BTreeMap;
use std::process::Command;
use std::time::SystemTime;

use etcd_client::{Client, GetOptions};
use tokio::sync::mpsc;

use crate::events::{Event, EventKind};
use crate::state::cache::{Service, ServiceState, StateCache};

/// Handler that requests a full state refresh on every event.
///
/// Both `Startup` (initial reconciliation) and `ServiceChange` trigger a
/// re-read. `try_send` keeps the handler non-blocking and coalesces bursts:
/// a refresh already queued covers any signal arriving meanwhile.
pub fn refresh_handler(requests: mpsc::Sender<()>) -> impl Fn(&Event) + Send + Sync {
    move |_event| {
        let _ = requests.try_send(());
    }
}

/// Handler that forks the configured reload hook on service changes.
///
/// The child is spawned and deliberately not waited on; the SIGCHLD reaper
/// collects its exit status. Spawn failures are logged and contained.
pub fn reload_hook_handler(command: String) -> impl Fn(&Event) + Send + Sync {
    move |event| {
        if event.kind != EventKind::ServiceChange {
            return;
        }
        match Command::new("sh").arg("-c").arg(&command).spawn() {
            Ok(child) => {
                tracing::debug!(pid = child.id(), command = %command, "Reload hook spawned");
            }
            Err(e) => {
                tracing::error!(command = %command, error = %e, "Failed to spawn reload hook");
            }
        }
    }
}

/// Long-lived task that re-reads the watched prefix on request and swaps
/// the result into the cache. A failed read keeps the previous snapshot.
pub async fn run_refresher(
    client: Client,
    root: String,
    cache: StateCache,
    mut requests: mpsc::Receiver<()>,
) {
    let mut kv = client.kv_client();
    while requests.recv().await.is_some() {
        match kv.get(root.as_str(), Some(GetOptions::new().with_prefix())).await {
            Ok(response) => {
                let mut services = BTreeMap::new();
                for entry in response.kvs() {
                    let (key, value) = match (entry.key_str(), entry.value_str()) {
                        (Ok(k), Ok(v)) => (k, v),
                        _ => {
                            tracing::warn!("Skipping non-UTF-8 registry entry");
                            continue;
                        }
                    };
                    let service = parse_service(&root, key, value);
                    services.insert(service.id.clone(), service);
                }
                let count = services.len();
                cache.store(ServiceState {
                    services,
                    refreshed_at: Some(SystemTime::now()),
                });
                tracing::info!(services = count, "Service state refreshed");
            }
            Err(e) => {
                tracing::warn!(error = %e, "State refresh failed; keeping previous snapshot");
            }
        }
    }
}

/// Registry values are either a full `Service` JSON document or, for
/// entries written by older tooling, a bare routing-rule string.
fn parse_service(root: &str, key: &str, value: &str) -> Service {
    if let Ok(service) = serde_json::from_str::<Service>(value) {
        return service;
    }
    let id = key.strip_prefix(root).unwrap_or(key).to_string();
    Service {
        id,
        routing_rule: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventBus;

    #[test]
    fn refresh_handler_coalesces_bursts() {
        let (tx, mut rx) = mpsc::channel(1);
        let mut builder = EventBus::builder();
        builder.register("refresh", refresh_handler(tx));
        let bus = builder.seal();

        // Three publishes, capacity one: later sends coalesce into the
        // already-queued request instead of blocking the bus.
        for _ in 0..3 {
            bus.publish(Event::new(EventKind::ServiceChange));
        }

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn startup_also_requests_a_refresh() {
        let (tx, mut rx) = mpsc::channel(4);
        let handler = refresh_handler(tx);
        handler(&Event::new(EventKind::Startup));
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn bare_rule_values_become_services() {
        let service = parse_service("/registry", "/registry/apps/web", "path_beg /web");
        assert_eq!(service.id, "/apps/web");
        assert_eq!(service.routing_rule, "path_beg /web");
    }

    #[test]
    fn json_values_parse_directly() {
        let service = parse_service(
            "/registry",
            "/registry/apps/web",
            r#"{"id":"/apps/web","routing_rule":"hdr(host) -i web"}"#,
        );
        assert_eq!(service.id, "/apps/web");
        assert_eq!(service.routing_rule, "hdr(host) -i web");
    }
}
