//! Orchestrator callback registration.
//!
//! Runs once at startup, outside the event-driven core: one outbound POST
//! per configured orchestrator endpoint announcing our callback URL.
//! Registering with every node of the same cluster is safe. Failures are
//! logged and never retried: the registration is advisory, and startup
//! proceeds regardless.

use reqwest::header::CONTENT_TYPE;

use crate::config::OrchestratorConfig;

/// Register our event callback with every configured orchestrator endpoint.
pub async fn register_callbacks(config: &OrchestratorConfig) {
    if config.endpoints.is_empty() {
        return;
    }
    if config.callback_url.is_empty() {
        tracing::warn!(
            "Orchestrator endpoints configured but callback_url is empty; skipping registration"
        );
        return;
    }

    let client = reqwest::Client::new();
    let callback = format!("{}/api/orchestrator/event_callback", config.callback_url);

    for endpoint in &config.endpoints {
        let url = format!("{endpoint}/v2/eventSubscriptions?callbackUrl={callback}");
        match client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                tracing::info!(endpoint = %endpoint, "Registered orchestrator callback");
            }
            Ok(response) => {
                tracing::warn!(
                    endpoint = %endpoint,
                    status = %response.status(),
                    "Orchestrator rejected callback registration"
                );
            }
            Err(e) => {
                tracing::warn!(
                    endpoint = %endpoint,
                    error = %e,
                    "Could not reach orchestrator callback system"
                );
            }
        }
    }
}
