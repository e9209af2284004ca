use crate::infra::AppState;
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json};
use formflow::wizard::{wizard_router, WizardService, WizardSessionStore};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

const DEFAULT_ECHO: &str = "hello!";

#[derive(Debug, Default, Deserialize)]
pub(crate) struct EchoQuery {
    #[serde(default)]
    pub(crate) value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddUserRequest {
    pub(crate) new_user_name: String,
}

pub(crate) fn with_service_routes<S>(service: Arc<WizardService<S>>) -> axum::Router
where
    S: WizardSessionStore + 'static,
{
    wizard_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/echo", get(echo_endpoint))
        .route("/api/v1/users", post(add_user_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Logs the given value (or a greeting when it is empty) and echoes it back.
pub(crate) async fn echo_endpoint(Query(query): Query<EchoQuery>) -> Json<serde_json::Value> {
    let value = query
        .value
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_ECHO.to_string());
    info!(%value, "echo");
    Json(json!({ "echo": value }))
}

pub(crate) async fn add_user_endpoint(Json(request): Json<AddUserRequest>) -> Response {
    let name = request.new_user_name.trim();
    if name.is_empty() {
        let payload = json!({ "error": "new_user_name is required" });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
    }

    // User storage lives outside this service; acknowledging is all we do.
    info!(user = %name, "add user requested");
    StatusCode::OK.into_response()
}
