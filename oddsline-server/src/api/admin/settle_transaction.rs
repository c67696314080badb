use axum::{
    Json,
    extract::{Path, State},
};
use kanau::processor::Processor;
use oddsline_core::entities::{SettleTransaction, Settlement};
use oddsline_sdk::objects::TransactionResponse;
use uuid::Uuid;

use super::AdminApiError;
use crate::api::extractors::AdminAuth;
use crate::state::AppState;

/// `POST /transactions/{transaction_id}/complete`
pub async fn complete_transaction(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<TransactionResponse>, AdminApiError> {
    settle(&state, transaction_id, Settlement::Complete).await
}

/// `POST /transactions/{transaction_id}/reject`
pub async fn reject_transaction(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<TransactionResponse>, AdminApiError> {
    settle(&state, transaction_id, Settlement::Reject).await
}

/// Settling a transaction that is no longer pending yields `409`.
async fn settle(
    state: &AppState,
    transaction_id: Uuid,
    settlement: Settlement,
) -> Result<Json<TransactionResponse>, AdminApiError> {
    let transaction = state
        .ledger
        .process(SettleTransaction {
            transaction_id,
            settlement,
        })
        .await?;
    Ok(Json(TransactionResponse::from(&transaction)))
}
