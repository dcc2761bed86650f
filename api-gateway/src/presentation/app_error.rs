use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tonic::{Code, Status};
use tracing::error;
use validator::ValidationErrors;

use crate::token::TokenError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("downstream call failed: {0}")]
    Rpc(#[from] Status),

    #[error("token signing failed")]
    Token(#[from] TokenError),

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

pub(crate) type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::Rpc(status) => map_rpc_status(status),
            AppError::Token(err) => {
                error!(%err, "token signing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
            AppError::Internal(err) => {
                error!(%err, "internal failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: msg })).into_response()
    }
}

/// Maps a downstream gRPC status onto the REST surface. Client-caused
/// failures pass the (already stable) service message through; everything
/// unexpected is logged here and answered with a fixed body.
fn map_rpc_status(status: Status) -> (StatusCode, String) {
    match status.code() {
        Code::InvalidArgument | Code::FailedPrecondition => {
            (StatusCode::BAD_REQUEST, status.message().to_string())
        }
        Code::AlreadyExists => (StatusCode::CONFLICT, status.message().to_string()),
        Code::NotFound => (StatusCode::NOT_FOUND, status.message().to_string()),
        Code::Unauthenticated => (StatusCode::UNAUTHORIZED, status.message().to_string()),
        Code::PermissionDenied => (StatusCode::FORBIDDEN, status.message().to_string()),
        Code::DeadlineExceeded | Code::Cancelled => {
            error!(code = ?status.code(), detail = status.message(), "downstream call timed out");
            (StatusCode::GATEWAY_TIMEOUT, "downstream timeout".to_string())
        }
        _ => {
            error!(code = ?status.code(), detail = status.message(), "downstream call failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use tonic::Status;

    use super::map_rpc_status;

    #[test]
    fn rpc_codes_map_to_expected_http_statuses() {
        let cases = [
            (Status::invalid_argument("bad"), StatusCode::BAD_REQUEST),
            (Status::already_exists("dup"), StatusCode::CONFLICT),
            (Status::not_found("gone"), StatusCode::NOT_FOUND),
            (Status::unauthenticated("who"), StatusCode::UNAUTHORIZED),
            (Status::permission_denied("no"), StatusCode::FORBIDDEN),
            (
                Status::deadline_exceeded("slow"),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (Status::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR),
            (
                Status::unavailable("down"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (status, expected) in cases {
            let (mapped, _) = map_rpc_status(status);
            assert_eq!(mapped, expected);
        }
    }

    #[test]
    fn internal_detail_is_replaced_with_a_stable_message() {
        let (_, msg) = map_rpc_status(Status::internal("connection refused to 10.0.0.3"));
        assert_eq!(msg, "internal error");

        let (_, msg) = map_rpc_status(Status::deadline_exceeded("deadline details"));
        assert_eq!(msg, "downstream timeout");
    }

    #[test]
    fn failures_serialize_as_a_single_error_field() {
        let body = serde_json::to_string(&super::ErrorBody {
            error: "bad request".to_string(),
        })
        .expect("body must serialize");
        assert_eq!(body, r#"{"error":"bad request"}"#);
    }
}
