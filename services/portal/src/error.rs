//! Service-level error handling.
//!
//! Vault failures never reach this layer - the orchestrator degrades
//! them into view messages. What does reach it: identity failures, which
//! are deliberately re-raised so the authentication middleware in front
//! of the portal can send the user back through the provider.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use identity_client::IdentityError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

/// Errors surfaced by the HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request carried no authenticated principal
    #[error("Authentication required")]
    Unauthenticated,

    /// Identity provider failure; re-raised, never swallowed
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// Any other unexpected failure
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Structured error body with correlation ID.
#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    correlation_id: Uuid,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let correlation_id = Uuid::new_v4();

        let (status, code, message) = match &self {
            Self::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHENTICATED",
                self.to_string(),
            ),
            Self::Identity(e) => {
                warn!(%correlation_id, error = %e, "Identity failure, re-raising for re-authentication");
                (
                    StatusCode::UNAUTHORIZED,
                    "IDENTITY_ERROR",
                    e.to_string(),
                )
            }
            Self::Internal(e) => {
                error!(%correlation_id, error = %e, "Unexpected failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal error".to_string(),
                )
            }
        };

        let body = ErrorBody {
            code,
            message,
            correlation_id,
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_error_maps_to_unauthorized() {
        let err = ApiError::Identity(IdentityError::TokenRejected {
            status: 400,
            message: "invalid_grant".to_string(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key("www-authenticate"));
    }

    #[test]
    fn test_unauthenticated_maps_to_unauthorized() {
        let response = ApiError::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_internal_error_maps_to_500() {
        let err = ApiError::Internal(anyhow::anyhow!("boom"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
