//! HTTP request handlers

use super::types::{
    DtmfRequest, EndCallQuery, EndCallResponse, ErrorResponse, HealthResponse, HistoryResponse,
    OutcomeResponse, SessionView, StartCallRequest, StartCallResponse,
};
use super::AppState;
use crate::runtime::{EndCallStatus, EngineError};
use crate::telephony;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/", get(health))
        .route("/version", get(get_version))
        // Simulated calls
        .route("/ivr/start", post(start_call))
        .route("/ivr/dtmf", post(send_dtmf))
        .route("/ivr/end", post(end_call))
        .route("/ivr/calls/:id", get(get_call))
        .route("/ivr/history", get(get_history))
        // Telephony provider webhooks
        .merge(telephony::routes())
        .with_state(state)
}

// ============================================================
// Health
// ============================================================

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.engine.snapshot().await;
    Json(HealthResponse {
        status: "IVR running",
        active_calls: snapshot.active_count,
        total_calls: snapshot.archived_count,
    })
}

async fn get_version() -> &'static str {
    concat!("ivr-sim ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Calls
// ============================================================

async fn start_call(
    State(state): State<AppState>,
    payload: Result<Json<StartCallRequest>, JsonRejection>,
) -> Result<Json<StartCallResponse>, AppError> {
    let Json(req) = payload?;
    let call = state.engine.start_call(&req.caller_number).await;
    Ok(Json(StartCallResponse {
        call_id: call.session_id,
        status: "connected",
        prompt: call.prompt,
    }))
}

async fn send_dtmf(
    State(state): State<AppState>,
    payload: Result<Json<DtmfRequest>, JsonRejection>,
) -> Result<Json<OutcomeResponse>, AppError> {
    let Json(req) = payload?;
    let outcome = state.engine.apply_input(&req.call_id, &req.digit).await?;
    Ok(Json(outcome.into()))
}

async fn end_call(
    State(state): State<AppState>,
    query: Result<Query<EndCallQuery>, QueryRejection>,
) -> Result<Json<EndCallResponse>, AppError> {
    let Query(query) = query?;
    let status = match state.engine.end_call(&query.call_id).await? {
        EndCallStatus::Ended => "ended",
        EndCallStatus::NotFound => "not_found",
    };
    Ok(Json(EndCallResponse {
        status,
        call_id: query.call_id,
    }))
}

async fn get_call(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let session = state
        .engine
        .session(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Call session not found: {id}")))?;
    Ok(Json(session.into()))
}

async fn get_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        calls: state.engine.history().await,
    })
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::SessionNotFound(_) => AppError::NotFound(e.to_string()),
            EngineError::Internal(_) => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
