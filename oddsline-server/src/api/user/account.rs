use axum::{Json, extract::State};
use kanau::processor::Processor;
use oddsline_core::entities::GetAccount;
use oddsline_sdk::objects::AccountResponse;

use super::UserApiError;
use crate::api::extractors::AccountAuth;
use crate::state::AppState;

/// `GET /account`
///
/// Re-reads the account so the balance reflects anything that settled
/// after the token was resolved.
pub(super) async fn get_account(
    State(state): State<AppState>,
    AccountAuth(account): AccountAuth,
) -> Result<Json<AccountResponse>, UserApiError> {
    let account = state
        .ledger
        .process(GetAccount {
            account_id: account.account_id,
        })
        .await?;
    Ok(Json(AccountResponse::from(&account)))
}
