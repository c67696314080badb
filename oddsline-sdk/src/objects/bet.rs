//! Bet placement request and receipt types.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::fixture::{FixtureId, Market};

/// Number of decimal places carried by `potentialWin`.
pub const PAYOUT_DECIMAL_PLACES: u32 = 2;

/// `odds × stake` rounded to two decimal places, half away from zero.
///
/// The result always carries exactly two decimal places, so it renders
/// as e.g. `"15.00"` rather than `"15.0"`. Returns `None` when the product
/// does not fit in a [`Decimal`].
pub fn potential_win(odds: Decimal, stake: Decimal) -> Option<Decimal> {
    let mut win = odds.checked_mul(stake)?.round_dp_with_strategy(
        PAYOUT_DECIMAL_PLACES,
        RoundingStrategy::MidpointAwayFromZero,
    );
    win.rescale(PAYOUT_DECIMAL_PLACES);
    Some(win)
}

/// Request body for `POST /api/v1/bets`.
///
/// One request is sent per slip selection with a non-zero stake. All
/// decimals are string-encoded so no precision is lost in transit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBetRequest {
    pub fixture_id: FixtureId,
    pub market: Market,
    #[serde(with = "rust_decimal::serde::str")]
    pub odds: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub stake: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub potential_win: Decimal,
}

impl PlaceBetRequest {
    /// Build a request, deriving `potential_win` from `odds` and `stake`.
    ///
    /// Returns `None` if `odds × stake` overflows.
    pub fn new(
        fixture_id: FixtureId,
        market: Market,
        odds: Decimal,
        stake: Decimal,
    ) -> Option<Self> {
        Some(Self {
            fixture_id,
            market,
            odds,
            stake,
            potential_win: potential_win(odds, stake)?,
        })
    }
}

/// Settlement state of a placed bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    Pending,
    Won,
    Lost,
    Void,
}

impl std::fmt::Display for BetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BetStatus::Pending => write!(f, "pending"),
            BetStatus::Won => write!(f, "won"),
            BetStatus::Lost => write!(f, "lost"),
            BetStatus::Void => write!(f, "void"),
        }
    }
}

/// Response returned after a bet is accepted, and by the bet history endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetReceipt {
    pub bet_id: Uuid,
    pub fixture_id: FixtureId,
    pub market: Market,
    #[serde(with = "rust_decimal::serde::str")]
    pub odds: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub stake: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub potential_win: Decimal,
    pub status: BetStatus,
    /// Unix timestamp of when the bet was accepted.
    pub placed_at: i64,
}
