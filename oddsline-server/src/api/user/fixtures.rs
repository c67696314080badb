use axum::{
    Json,
    extract::{Path, State},
};
use kanau::processor::Processor;
use oddsline_core::entities::{GetFixture, ListFixtures};
use oddsline_sdk::objects::{FixtureId, FixtureResponse};

use super::UserApiError;
use crate::state::AppState;

/// `GET /fixtures` — every fixture with its current odds, soonest first.
pub(super) async fn list_fixtures(
    State(state): State<AppState>,
) -> Result<Json<Vec<FixtureResponse>>, UserApiError> {
    let fixtures = state.ledger.process(ListFixtures).await?;
    Ok(Json(fixtures.iter().map(FixtureResponse::from).collect()))
}

/// `GET /fixtures/{fixture_id}`
pub(super) async fn get_fixture(
    State(state): State<AppState>,
    Path(fixture_id): Path<FixtureId>,
) -> Result<Json<FixtureResponse>, UserApiError> {
    let fixture = state.ledger.process(GetFixture { fixture_id }).await?;
    Ok(Json(FixtureResponse::from(&fixture)))
}
