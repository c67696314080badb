//! User API handlers.
//!
//! Fixture listings and the odds socket are public. Everything that
//! touches an account requires `Authorization: Bearer <token>`.
//!
//! # Endpoints
//!
//! - `GET  /fixtures`               – list fixtures with current odds
//! - `GET  /fixtures/{fixture_id}`  – one fixture
//! - `POST /bets`                   – place one bet
//! - `GET  /bets`                   – bet history, newest first
//! - `GET  /account`                – account and balance
//! - `POST /wallet/deposits`        – request a deposit
//! - `POST /wallet/withdrawals`     – request a withdrawal (funds held)
//! - `GET  /wallet/transactions`    – wallet history, newest first
//! - `GET  /ws`                     – odds push WebSocket

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use oddsline_core::entities::LedgerError;

use crate::state::AppState;

mod account;
mod bets;
mod fixtures;
mod wallet;
mod ws;

/// Build the User API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/fixtures", get(fixtures::list_fixtures))
        .route("/fixtures/{fixture_id}", get(fixtures::get_fixture))
        .route("/bets", post(bets::place_bet).get(bets::list_bets))
        .route("/account", get(account::get_account))
        .route("/wallet/deposits", post(wallet::request_deposit))
        .route("/wallet/withdrawals", post(wallet::request_withdrawal))
        .route("/wallet/transactions", get(wallet::list_transactions))
        .route("/ws", get(ws::odds_ws))
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

/// Errors that can occur in User API handlers.
#[derive(Debug)]
struct UserApiError(LedgerError);

impl From<LedgerError> for UserApiError {
    fn from(e: LedgerError) -> Self {
        Self(e)
    }
}

impl IntoResponse for UserApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            LedgerError::FixtureNotFound(_)
            | LedgerError::AccountNotFound(_)
            | LedgerError::TransactionNotFound(_) => StatusCode::NOT_FOUND,
            LedgerError::FixtureClosed(_)
            | LedgerError::OddsChanged { .. }
            | LedgerError::TransactionSettled { .. } => StatusCode::CONFLICT,
            LedgerError::InsufficientFunds { .. } => StatusCode::PAYMENT_REQUIRED,
            LedgerError::MarketNotOffered { .. }
            | LedgerError::InvalidOdds(_)
            | LedgerError::InvalidStake(_)
            | LedgerError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
            LedgerError::PotentialWinMismatch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            LedgerError::DuplicateFixture(_) | LedgerError::DuplicateToken(_) => {
                tracing::error!(error = %self.0, "User API ledger error");
                return (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
                    .into_response();
            }
        };
        (status, self.0.to_string()).into_response()
    }
}
