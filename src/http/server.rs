//! Axum router and request handlers.
//!
//! # Responsibilities
//! - Expose liveness, materialized state, and the service CRUD API
//! - Accept orchestrator event callbacks and republish them on the bus
//! - Wire up middleware (tracing, request timeout)
//!
//! # Design Decisions
//! - GET endpoints never touch the store: they read the lock-free snapshot,
//!   so the API stays responsive while the store is unreachable.
//! - Write endpoints never touch the cache: the store is the source of
//!   truth, and the watch → event → refresh pipeline is the only way a
//!   write becomes visible.

use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use etcd_client::Client;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::events::{Event, EventBus, EventKind};
use crate::state::{Service, StateCache};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: StateCache,
    pub store: Client,
    pub root: String,
    pub bus: EventBus,
}

/// Build the router with all routes and middleware layers.
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/status", get(handle_status))
        .route("/api/state", get(get_state))
        .route("/api/services", get(list_services).post(create_service))
        .route(
            "/api/services/{*id}",
            put(update_service).delete(delete_service),
        )
        .route("/api/orchestrator/event_callback", post(event_callback))
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}

async fn handle_status() -> &'static str {
    "OK\n"
}

async fn get_state(State(state): State<AppState>) -> Response {
    Json(state.cache.load().as_ref().clone()).into_response()
}

async fn list_services(State(state): State<AppState>) -> Response {
    let snapshot = state.cache.load();
    let services: Vec<Service> = snapshot.services.values().cloned().collect();
    Json(services).into_response()
}

async fn create_service(
    State(state): State<AppState>,
    Json(service): Json<Service>,
) -> Response {
    match write_service(&state, &service).await {
        Ok(()) => (StatusCode::CREATED, Json(service)).into_response(),
        Err(response) => response,
    }
}

/// PUT on a single service. The id may itself contain slashes
/// ("/apps/billing"), hence the wildcard capture instead of a plain param.
/// The path, not the body, names the service.
async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut service): Json<Service>,
) -> Response {
    service.id = normalize_id(&id);
    match write_service(&state, &service).await {
        Ok(()) => (StatusCode::OK, Json(service)).into_response(),
        Err(response) => response,
    }
}

async fn delete_service(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let key = format!("{}{}", state.root, normalize_id(&id));
    let mut kv = state.store.kv_client();
    match kv.delete(key.as_str(), None).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => store_unavailable("delete", &e),
    }
}

/// Orchestrator callback: anything the orchestrator tells us is treated as
/// an advisory "something changed" and republished on the bus.
async fn event_callback(State(state): State<AppState>) -> Response {
    state.bus.publish(Event::new(EventKind::ServiceChange));
    (StatusCode::OK, Json(serde_json::json!({ "accepted": true }))).into_response()
}

async fn write_service(state: &AppState, service: &Service) -> Result<(), Response> {
    if service.id.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Service id must not be empty").into_response());
    }
    let id = normalize_id(&service.id);
    let key = format!("{}{}", state.root, id);
    let value = serde_json::to_string(service)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()).into_response())?;

    let mut kv = state.store.kv_client();
    kv.put(key.as_str(), value, None)
        .await
        .map_err(|e| store_unavailable("put", &e))?;
    Ok(())
}

fn store_unavailable(op: &str, e: &etcd_client::Error) -> Response {
    tracing::error!(op, error = %e, "Store write failed");
    (StatusCode::BAD_GATEWAY, "Coordination store unavailable").into_response()
}

fn normalize_id(id: &str) -> String {
    if id.starts_with('/') {
        id.to_string()
    } else {
        format!("/{id}")
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_id;

    #[test]
    fn ids_are_rooted() {
        assert_eq!(normalize_id("apps/web"), "/apps/web");
        assert_eq!(normalize_id("/apps/web"), "/apps/web");
    }
}
