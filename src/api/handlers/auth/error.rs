//! Error taxonomy for the auth surface.
//!
//! Authentication failures collapse into a uniform 401 body so callers
//! cannot distinguish unknown accounts from wrong passwords or stale
//! tokens. Verification-token failures keep distinct statuses because the
//! bearer already holds the token and the frontend acts on the difference.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email not verified")]
    EmailNotVerified,

    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid bearer token")]
    InvalidToken,

    #[error("token epoch is stale")]
    StaleEpoch,

    #[error("insufficient role")]
    Forbidden,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidCredentials
            | Self::EmailNotVerified
            | Self::MissingToken
            | Self::InvalidToken
            | Self::StaleEpoch => {
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()).into_response()
            }
            Self::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string()).into_response(),
            Self::Internal(err) => {
                error!("auth internal error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
                    .into_response()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    /// The presented refresh secret does not map to a usable session.
    #[error("invalid session")]
    InvalidSession,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidSession => {
                (StatusCode::UNAUTHORIZED, "Invalid session".to_string()).into_response()
            }
            Self::Internal(err) => {
                error!("session internal error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
                    .into_response()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("verification token not found")]
    NotFound,

    #[error("verification token already used")]
    AlreadyUsed,

    #[error("verification token expired")]
    Expired,

    #[error("verification token action mismatch")]
    ActionMismatch,

    /// Registration could not complete because the username is taken.
    /// The token stays unused so the caller can retry with another name.
    #[error("username already taken")]
    UsernameTaken,

    /// The token row exists but the email could not be handed off.
    #[error("verification email delivery failed")]
    SendFailed(#[source] anyhow::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for VerificationError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => {
                (StatusCode::NOT_FOUND, "Token not found".to_string()).into_response()
            }
            Self::AlreadyUsed => {
                (StatusCode::CONFLICT, "Token already used".to_string()).into_response()
            }
            Self::Expired => (StatusCode::GONE, "Token expired".to_string()).into_response(),
            Self::ActionMismatch => {
                (StatusCode::BAD_REQUEST, "Token action mismatch".to_string()).into_response()
            }
            Self::UsernameTaken => {
                (StatusCode::CONFLICT, "Username already taken".to_string()).into_response()
            }
            Self::SendFailed(err) => {
                error!("verification email delivery failed: {err:#}");
                (
                    StatusCode::BAD_GATEWAY,
                    "Verification email delivery failed".to_string(),
                )
                    .into_response()
            }
            Self::Internal(err) => {
                error!("verification internal error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
                    .into_response()
            }
        }
    }
}
