//! Admin API request types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::fixture::Market;

/// Request body for `PUT /api/v1/admin/fixtures/{fixture_id}/odds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOddsRequest {
    pub market: Market,
    #[serde(with = "rust_decimal::serde::str")]
    pub odds: Decimal,
}
