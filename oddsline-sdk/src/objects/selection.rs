//! Betting slip selection types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::fixture::{FixtureId, Market};

/// Identity of a selection on the betting slip.
///
/// A slip holds at most one selection per `(fixture, market)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionKey {
    pub fixture_id: FixtureId,
    pub market: Market,
}

impl SelectionKey {
    pub fn new(fixture_id: impl Into<FixtureId>, market: Market) -> Self {
        Self {
            fixture_id: fixture_id.into(),
            market,
        }
    }
}

impl std::fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.fixture_id, self.market)
    }
}

/// A pending bet selection, created when the user clicks an odds value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetSelection {
    pub fixture_id: FixtureId,
    /// Display label, e.g. "Arsenal vs Chelsea".
    pub match_label: String,
    pub market: Market,
    /// Decimal odds at the time the selection was made.
    pub odds: Decimal,
    pub league: String,
    /// Amount wagered on this selection; `None` until the user enters one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stake: Option<Decimal>,
}

impl BetSelection {
    pub fn new(
        fixture_id: impl Into<FixtureId>,
        match_label: impl Into<String>,
        market: Market,
        odds: Decimal,
        league: impl Into<String>,
    ) -> Self {
        Self {
            fixture_id: fixture_id.into(),
            match_label: match_label.into(),
            market,
            odds,
            league: league.into(),
            stake: None,
        }
    }

    pub fn with_stake(mut self, stake: Decimal) -> Self {
        self.stake = Some(stake);
        self
    }

    pub fn key(&self) -> SelectionKey {
        SelectionKey {
            fixture_id: self.fixture_id.clone(),
            market: self.market,
        }
    }

    pub fn matches(&self, fixture_id: &FixtureId, market: Market) -> bool {
        self.market == market && &self.fixture_id == fixture_id
    }

    /// The stake, treating an unset or negative value as zero.
    pub fn effective_stake(&self) -> Decimal {
        match self.stake {
            Some(stake) if stake > Decimal::ZERO => stake,
            _ => Decimal::ZERO,
        }
    }

    /// `odds × stake`, the payout if this selection wins. `None` if the
    /// product overflows.
    pub fn potential_payout(&self) -> Option<Decimal> {
        self.odds.checked_mul(self.effective_stake())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_potential_payout_ignores_unset_stake_and_checks_overflow() {
        let selection = BetSelection::new("f1", "Arsenal vs Chelsea", Market::Home, dec!(2.0), "EPL");
        assert_eq!(selection.potential_payout(), Some(Decimal::ZERO));
        assert_eq!(selection.clone().with_stake(dec!(12.5)).potential_payout(), Some(dec!(25)));
        assert_eq!(selection.with_stake(Decimal::MAX).potential_payout(), None);
    }
}
