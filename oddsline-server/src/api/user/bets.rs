use axum::{Json, extract::State, http::StatusCode};
use kanau::processor::Processor;
use oddsline_core::entities::{ListBets, PlaceBet};
use oddsline_sdk::objects::{BetReceipt, PlaceBetRequest};

use super::UserApiError;
use crate::api::extractors::AccountAuth;
use crate::state::AppState;

/// `POST /bets` — place one bet and debit its stake.
///
/// Returns `201` with the receipt. Stale odds yield `409` naming the
/// current odds so the client can refresh the selection; a short balance
/// yields `402`.
pub(super) async fn place_bet(
    State(state): State<AppState>,
    AccountAuth(account): AccountAuth,
    Json(request): Json<PlaceBetRequest>,
) -> Result<(StatusCode, Json<BetReceipt>), UserApiError> {
    let bet = state
        .ledger
        .process(PlaceBet {
            account_id: account.account_id,
            request,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(BetReceipt::from(&bet))))
}

/// `GET /bets`
pub(super) async fn list_bets(
    State(state): State<AppState>,
    AccountAuth(account): AccountAuth,
) -> Result<Json<Vec<BetReceipt>>, UserApiError> {
    let bets = state
        .ledger
        .process(ListBets {
            account_id: account.account_id,
        })
        .await?;
    Ok(Json(bets.iter().map(BetReceipt::from).collect()))
}
