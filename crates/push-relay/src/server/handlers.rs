//! Axum request handlers for all service endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{ErrorResponse, HealthResponse, SendMessageRequest, SendMessageResponse};
use common::ServiceError;
use tracing::{info_span, warn, Instrument};
use uuid::Uuid;

use super::state::AppState;

/// `POST /sendMessage` — relay one chat message to the recipient's device.
///
/// Every failure is answered with a generic `{error}` body; the detailed cause
/// is only logged.
pub async fn send_message(
    State(state): State<AppState>,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Response {
    let span = info_span!("send_message", request_id = %Uuid::new_v4());

    async move {
        let Json(req) = match body {
            Ok(req) => req,
            Err(rejection) => {
                warn!(error = %rejection.body_text(), "rejected request body");
                return error_response(ServiceError::BadRequest("invalid request body".into()));
            }
        };

        match state.relay.send_message(req).await {
            Ok(message_id) => {
                (StatusCode::OK, Json(SendMessageResponse::delivered(message_id))).into_response()
            }
            Err(e) => {
                warn!(error = %e, "message not relayed");
                error_response(e.to_service_error())
            }
        }
    }
    .instrument(span)
    .await
}

/// `GET /health` — liveness check. The key is loaded before the listener
/// binds, so a serving process is always ready.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse::ok()))
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    error_response(ServiceError::NotFound("not found".into()))
}

fn error_response(err: ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::new(err.to_string()))).into_response()
}
