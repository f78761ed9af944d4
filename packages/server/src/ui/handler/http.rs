//! Status endpoints: `/`, `/health`, `/status`.

use std::sync::Arc;

use axum::{Json, extract::State};
use notifier_shared::time::utc_now_rfc3339;

use crate::{
    domain::ConnectionState,
    infrastructure::dto::http::{HealthDto, ServiceInfoDto, StatusDto},
    ui::state::AppState,
};

const ENDPOINTS: [&str; 6] = [
    "GET /",
    "GET /health",
    "GET /status",
    "GET /qr",
    "POST /send-message",
    "POST /test-message",
];

/// Capability document with the current connection state
pub async fn service_info(State(state): State<Arc<AppState>>) -> Json<ServiceInfoDto> {
    let status = state.get_connection_status_usecase.execute();
    Json(ServiceInfoDto {
        status: "online".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        whatsapp: if status.ready {
            "connected".to_string()
        } else {
            "disconnected".to_string()
        },
        state: status.state.label().to_string(),
        endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
        timestamp: utc_now_rfc3339(),
    })
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
        uptime: state.started_at.elapsed().as_secs(),
        timestamp: utc_now_rfc3339(),
    })
}

pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusDto> {
    let status = state.get_connection_status_usecase.execute();
    let last_error = match &status.state {
        ConnectionState::Unauthenticated { last_error } => last_error.clone(),
        ConnectionState::Disconnected { reason } => Some(reason.clone()),
        _ => None,
    };
    Json(StatusDto {
        ready: status.ready,
        qr_needed: status.qr_needed,
        state: status.state.label().to_string(),
        last_error,
        timestamp: utc_now_rfc3339(),
    })
}
