use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub openai_status: String,
    pub persistence: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: HashMap<String, String>,
}

fn llm_status(state: &AppState) -> &'static str {
    if state.advisor.is_configured() {
        "ready"
    } else {
        "not_configured"
    }
}

/// Service banner
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information", body = ServiceInfo)
    ),
    tag = "health"
)]
pub async fn service_info(State(state): State<Arc<AppState>>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Financial Assistant API Ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        openai_status: llm_status(&state).to_string(),
        persistence: state.persistence.to_string(),
    })
}

/// Health check endpoint
///
/// Reports the language model, storage backend and live WebSocket count
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let mut services = HashMap::new();
    services.insert("llm".to_string(), llm_status(&state).to_string());
    services.insert("storage".to_string(), state.persistence.to_string());
    services.insert(
        "websocket_connections".to_string(),
        state.rooms.connection_count().await.to_string(),
    );

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        services,
    })
}
