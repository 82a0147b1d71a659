use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application error taxonomy.
///
/// Auth failures are terminal for the request; the server never retries a
/// failed validation. Every variant serializes as
/// `{"success": false, "message": ...}` so internals never leak to clients.
#[derive(Debug)]
pub enum AppError {
    /// No credential was presented, or it was too garbled to parse.
    Unauthenticated(String),
    /// A credential was presented but its signature or expiry check failed.
    InvalidToken(String),
    /// Authenticated, but the resolved role is not allowed here.
    Forbidden(String),
    /// The presented identity has no user behind it.
    UserNotFound(String),
    NotFound(String),
    BadRequest(String),
    /// Reset-specific: the recovery token matched no live record.
    InvalidResetToken,
    Validation(String),
    /// The password-reset email could not be dispatched.
    EmailDelivery(String),
    Internal(anyhow::Error),
}

impl AppError {
    pub fn unauthenticated(message: String) -> Self {
        Self::Unauthenticated(message)
    }

    pub fn invalid_token(message: String) -> Self {
        Self::InvalidToken(message)
    }

    pub fn forbidden(message: String) -> Self {
        Self::Forbidden(message)
    }

    pub fn user_not_found(message: String) -> Self {
        Self::UserNotFound(message)
    }

    pub fn not_found(message: String) -> Self {
        Self::NotFound(message)
    }

    pub fn bad_request(message: String) -> Self {
        Self::BadRequest(message)
    }

    pub fn validation(message: String) -> Self {
        Self::Validation(message)
    }

    pub fn email_delivery(message: String) -> Self {
        Self::EmailDelivery(message)
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Internal(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthenticated(msg) | Self::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            Self::UserNotFound(msg) | Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::InvalidResetToken => (
                StatusCode::BAD_REQUEST,
                "Token is invalid or has expired".to_string(),
            ),
            Self::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            Self::EmailDelivery(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Self::Internal(err) => {
                tracing::error!(error = ?err, "Unhandled internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        AppError::Internal(err.into())
    }
}
