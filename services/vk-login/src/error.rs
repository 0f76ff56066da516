//! Callback request errors
//!
//! Each variant maps to one HTTP status on the callback route. None of
//! them stop the service; the user can retry the login from the same
//! authorization URL.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("authorization denied: {0}")]
    Denied(String),

    #[error("state parameter does not match this login attempt")]
    StateMismatch,

    #[error("callback is missing the code parameter")]
    MissingCode,

    #[error("token exchange failed: {0}")]
    Exchange(vk_api::Error),

    #[error("profile lookup failed: {0}")]
    Lookup(vk_api::Error),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Denied(_) | Error::StateMismatch | Error::MissingCode => {
                StatusCode::BAD_REQUEST
            }
            Error::Exchange(vk_api::Error::Authorization(_)) => StatusCode::UNAUTHORIZED,
            Error::Exchange(_) | Error::Lookup(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "status": "error",
            "error": self.to_string(),
        });
        (self.status(), axum::Json(body)).into_response()
    }
}

/// Result alias using service Error
pub type Result<T> = std::result::Result<T, Error>;
