use axum::{
    Json,
    extract::{Path, State},
};
use kanau::processor::Processor;
use oddsline_core::entities::UpdateOdds;
use oddsline_sdk::objects::{FixtureId, FixtureResponse, UpdateOddsRequest};

use super::AdminApiError;
use crate::api::extractors::AdminAuth;
use crate::state::AppState;

/// `PUT /fixtures/{fixture_id}/odds` — publish new odds for one market.
///
/// Adds the market if the fixture did not offer it yet. Every connected
/// odds socket is notified.
pub async fn update_odds(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(fixture_id): Path<FixtureId>,
    Json(request): Json<UpdateOddsRequest>,
) -> Result<Json<FixtureResponse>, AdminApiError> {
    let fixture = state
        .ledger
        .process(UpdateOdds {
            fixture_id,
            market: request.market,
            odds: request.odds,
        })
        .await?;
    Ok(Json(FixtureResponse::from(&fixture)))
}
