//! Custom Axum extractors for request authentication.
//!
//! Provides:
//! - `AccountAuth`: resolves the `Authorization: Bearer <token>` header to
//!   a ledger account (used by the account routes of the User API).
//! - `AdminAuth`: verifies the `Oddsline-Admin-Authorization` header
//!   against the argon2-hashed admin secret (used by the Admin API).

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use kanau::processor::Processor;
use oddsline_core::entities::{AccountRecord, FindAccountByToken, LedgerError};
use oddsline_sdk::auth::{ADMIN_AUTH_HEADER, parse_bearer};

use crate::state::AppState;

/// The account that sent the request.
pub struct AccountAuth(pub AccountRecord);

/// Marker proving the request carried the admin secret.
pub struct AdminAuth;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid bearer token")]
    InvalidToken,
    #[error("missing {ADMIN_AUTH_HEADER} header")]
    MissingAdminSecret,
    #[error("invalid admin secret")]
    InvalidAdminSecret,
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "missing bearer token"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid bearer token"),
            AuthError::MissingAdminSecret => (
                StatusCode::UNAUTHORIZED,
                "missing Oddsline-Admin-Authorization header",
            ),
            AuthError::InvalidAdminSecret => (StatusCode::UNAUTHORIZED, "invalid admin secret"),
            AuthError::Ledger(e) => {
                tracing::error!(error = %e, "Account lookup failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        };
        (status, message).into_response()
    }
}

impl FromRequestParts<AppState> for AccountAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?
            .to_str()
            .map_err(|_| AuthError::InvalidToken)?;
        let token = parse_bearer(header).ok_or(AuthError::InvalidToken)?;

        let account = state
            .ledger
            .process(FindAccountByToken {
                token: token.to_owned(),
            })
            .await?
            .ok_or(AuthError::InvalidToken)?;

        Ok(AccountAuth(account))
    }
}

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let secret = parts
            .headers
            .get(ADMIN_AUTH_HEADER)
            .ok_or(AuthError::MissingAdminSecret)?
            .to_str()
            .map_err(|_| AuthError::InvalidAdminSecret)?;

        let admin = state.config.admin().await;
        if admin.verify_secret(secret) {
            Ok(AdminAuth)
        } else {
            tracing::warn!("Rejected admin request with invalid secret");
            Err(AuthError::InvalidAdminSecret)
        }
    }
}
