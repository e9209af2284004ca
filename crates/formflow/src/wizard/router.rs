use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Map, Value};

use super::service::{StartRequest, WizardService, WizardServiceError};
use super::session::{SessionId, SessionStoreError, WizardSessionStore};
use crate::forms::{FormFlowError, StepId};

/// Router builder exposing the wizard session endpoints.
pub fn wizard_router<S>(service: Arc<WizardService<S>>) -> Router
where
    S: WizardSessionStore + 'static,
{
    Router::new()
        .route("/api/v1/wizard/sessions", post(start_handler::<S>))
        .route(
            "/api/v1/wizard/sessions/:session_id",
            get(session_handler::<S>).delete(abandon_handler::<S>),
        )
        .route(
            "/api/v1/wizard/sessions/:session_id/steps/:step",
            get(step_handler::<S>).post(submit_handler::<S>),
        )
        .route(
            "/api/v1/wizard/sessions/:session_id/confirm",
            get(confirm_handler::<S>),
        )
        .route(
            "/api/v1/wizard/sessions/:session_id/complete",
            post(complete_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn start_handler<S>(
    State(service): State<Arc<WizardService<S>>>,
    request: Option<Json<StartRequest>>,
) -> Response
where
    S: WizardSessionStore + 'static,
{
    let request = request.map(|Json(request)| request).unwrap_or_default();
    match service.start(request) {
        Ok(session) => (StatusCode::CREATED, Json(session.status_view())).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn session_handler<S>(
    State(service): State<Arc<WizardService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: WizardSessionStore + 'static,
{
    match service.get(&SessionId(session_id)) {
        Ok(session) => (StatusCode::OK, Json(session.status_view())).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn step_handler<S>(
    State(service): State<Arc<WizardService<S>>>,
    Path((session_id, step)): Path<(String, String)>,
) -> Response
where
    S: WizardSessionStore + 'static,
{
    match service.step_view(&SessionId(session_id), &StepId::from(step)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<WizardService<S>>>,
    Path((session_id, step)): Path<(String, String)>,
    Json(input): Json<Map<String, Value>>,
) -> Response
where
    S: WizardSessionStore + 'static,
{
    match service.submit(&SessionId(session_id), &StepId::from(step), &input) {
        Ok(session) => (StatusCode::OK, Json(session.status_view())).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn confirm_handler<S>(
    State(service): State<Arc<WizardService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: WizardSessionStore + 'static,
{
    match service.confirm(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn complete_handler<S>(
    State(service): State<Arc<WizardService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: WizardSessionStore + 'static,
{
    let id = SessionId(session_id);
    match service.complete(&id) {
        Ok(confirm) => {
            let payload = json!({
                "session_id": id,
                "step": StepId::complete(),
                "confirm": confirm,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn abandon_handler<S>(
    State(service): State<Arc<WizardService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: WizardSessionStore + 'static,
{
    match service.abandon(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

impl IntoResponse for WizardServiceError {
    fn into_response(self) -> Response {
        let (status, payload) = match &self {
            WizardServiceError::Validation(violations) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": self.to_string(), "violations": violations }),
            ),
            WizardServiceError::Incomplete(missing) => (
                StatusCode::CONFLICT,
                json!({ "error": self.to_string(), "missing_steps": missing }),
            ),
            WizardServiceError::UnknownStep(_)
            | WizardServiceError::Form(FormFlowError::UnknownStep(_))
            | WizardServiceError::Store(SessionStoreError::NotFound) => {
                (StatusCode::NOT_FOUND, json!({ "error": self.to_string() }))
            }
            WizardServiceError::Field(_) | WizardServiceError::Form(FormFlowError::Field(_)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": self.to_string() }),
            ),
            WizardServiceError::Form(FormFlowError::StepFormMismatch { .. })
            | WizardServiceError::Store(SessionStoreError::Conflict) => {
                (StatusCode::CONFLICT, json!({ "error": self.to_string() }))
            }
            WizardServiceError::Store(SessionStoreError::Unavailable(_)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": self.to_string() }),
            ),
        };

        (status, Json(payload)).into_response()
    }
}
