//! Fixture and market types.

use compact_str::CompactString;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier of a fixture (a schedulable sporting event).
///
/// Fixture ids are short opaque strings assigned by the odds feed, so
/// they are stored inline without a heap allocation in the common case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixtureId(CompactString);

impl FixtureId {
    pub fn new(id: impl Into<CompactString>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for FixtureId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for FixtureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bettable outcome category on a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    Home,
    Draw,
    Away,
    Over,
    Under,
}

impl Market {
    pub const ALL: [Market; 5] = [
        Market::Home,
        Market::Draw,
        Market::Away,
        Market::Over,
        Market::Under,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Home => "home",
            Market::Draw => "draw",
            Market::Away => "away",
            Market::Over => "over",
            Market::Under => "under",
        }
    }
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown market: {0}")]
pub struct UnknownMarket(pub String);

impl std::str::FromStr for Market {
    type Err = UnknownMarket;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Market::ALL
            .into_iter()
            .find(|market| market.as_str() == s)
            .ok_or_else(|| UnknownMarket(s.to_owned()))
    }
}

/// Lifecycle of a fixture. Bets are only accepted before it finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureStatus {
    Scheduled,
    Live,
    Finished,
}

impl FixtureStatus {
    pub fn accepts_bets(&self) -> bool {
        matches!(self, FixtureStatus::Scheduled | FixtureStatus::Live)
    }
}

/// Response returned by the fixture listing and lookup endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureResponse {
    pub fixture_id: FixtureId,
    pub home: String,
    pub away: String,
    pub league: String,
    /// Unix timestamp of kickoff.
    pub kickoff: i64,
    pub status: FixtureStatus,
    /// Current decimal odds for every market offered on this fixture.
    pub odds: BTreeMap<Market, Decimal>,
}

impl FixtureResponse {
    /// Human-readable "Home vs Away" label used on bet selections.
    pub fn match_label(&self) -> String {
        format!("{} vs {}", self.home, self.away)
    }
}
