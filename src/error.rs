use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Errors surfaced by HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("user already exists")]
    AlreadyExists,

    /// Unknown email and wrong password both map here.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("invalid or expired token")]
    Unauthorized,

    #[error("invalid request body: {0}")]
    InvalidPayload(#[from] JsonRejection),

    #[error("invalid path parameter: {0}")]
    InvalidPath(#[from] PathRejection),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::AlreadyExists => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "message": "User already exists" })),
            )
                .into_response(),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Invalid email or password" })),
            )
                .into_response(),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Invalid or expired token" })),
            )
                .into_response(),
            AppError::InvalidPayload(rejection) => (
                rejection.status(),
                Json(json!({ "success": false, "message": rejection.body_text() })),
            )
                .into_response(),
            AppError::InvalidPath(rejection) => (
                rejection.status(),
                Json(json!({ "success": false, "message": rejection.body_text() })),
            )
                .into_response(),
            AppError::Store(e) => {
                error!(error = ?e, "store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "An error occurred" })),
                )
                    .into_response()
            }
        }
    }
}

/// `Json` extractor whose rejections render through [`AppError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `Path` extractor whose rejections render through [`AppError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
