use axum::{Json, extract::State, http::StatusCode};
use kanau::processor::Processor;
use oddsline_core::entities::{ListTransactions, RequestTransaction};
use oddsline_sdk::objects::{TransactionKind, TransactionRequest, TransactionResponse};
use uuid::Uuid;

use super::UserApiError;
use crate::api::extractors::AccountAuth;
use crate::state::AppState;

/// `POST /wallet/deposits` — the balance is credited when an admin
/// completes the deposit.
pub(super) async fn request_deposit(
    State(state): State<AppState>,
    AccountAuth(account): AccountAuth,
    Json(request): Json<TransactionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), UserApiError> {
    request_transaction(&state, account.account_id, TransactionKind::Deposit, request).await
}

/// `POST /wallet/withdrawals` — the amount is held immediately and
/// refunded if an admin rejects the withdrawal.
pub(super) async fn request_withdrawal(
    State(state): State<AppState>,
    AccountAuth(account): AccountAuth,
    Json(request): Json<TransactionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), UserApiError> {
    request_transaction(&state, account.account_id, TransactionKind::Withdrawal, request).await
}

/// `GET /wallet/transactions`
pub(super) async fn list_transactions(
    State(state): State<AppState>,
    AccountAuth(account): AccountAuth,
) -> Result<Json<Vec<TransactionResponse>>, UserApiError> {
    let transactions = state
        .ledger
        .process(ListTransactions {
            account_id: account.account_id,
        })
        .await?;
    Ok(Json(
        transactions.iter().map(TransactionResponse::from).collect(),
    ))
}

async fn request_transaction(
    state: &AppState,
    account_id: Uuid,
    kind: TransactionKind,
    request: TransactionRequest,
) -> Result<(StatusCode, Json<TransactionResponse>), UserApiError> {
    let transaction = state
        .ledger
        .process(RequestTransaction {
            account_id,
            kind,
            method: request.method,
            amount: request.amount,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse::from(&transaction)),
    ))
}
