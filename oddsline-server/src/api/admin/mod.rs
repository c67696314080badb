//! Admin API handlers.
//!
//! These endpoints are called by operators and require the
//! `Oddsline-Admin-Authorization` header with the plaintext admin secret.
//!
//! # Endpoints
//!
//! - `PUT  /fixtures/{fixture_id}/odds`                 – publish odds for one market
//! - `POST /transactions/{transaction_id}/complete`     – complete a pending transaction
//! - `POST /transactions/{transaction_id}/reject`       – reject a pending transaction

use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{post, put},
};
use oddsline_core::entities::LedgerError;

use crate::state::AppState;

mod settle_transaction;
mod update_odds;

/// Build the Admin API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/fixtures/{fixture_id}/odds",
            put(update_odds::update_odds),
        )
        .route(
            "/transactions/{transaction_id}/complete",
            post(settle_transaction::complete_transaction),
        )
        .route(
            "/transactions/{transaction_id}/reject",
            post(settle_transaction::reject_transaction),
        )
}

/// Errors that can occur in Admin API handlers.
#[derive(Debug)]
pub(crate) enum AdminApiError {
    NotFound(LedgerError),
    Conflict(LedgerError),
    BadRequest(LedgerError),
    Ledger(LedgerError),
}

impl From<LedgerError> for AdminApiError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::FixtureNotFound(_)
            | LedgerError::TransactionNotFound(_)
            | LedgerError::AccountNotFound(_) => AdminApiError::NotFound(e),
            LedgerError::TransactionSettled { .. } => AdminApiError::Conflict(e),
            LedgerError::InvalidOdds(_) => AdminApiError::BadRequest(e),
            other => AdminApiError::Ledger(other),
        }
    }
}

impl IntoResponse for AdminApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AdminApiError::NotFound(e) => (StatusCode::NOT_FOUND, e.to_string()).into_response(),
            AdminApiError::Conflict(e) => (StatusCode::CONFLICT, e.to_string()).into_response(),
            AdminApiError::BadRequest(e) => {
                (StatusCode::BAD_REQUEST, e.to_string()).into_response()
            }
            AdminApiError::Ledger(e) => {
                tracing::error!(error = %e, "Admin API ledger error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}
