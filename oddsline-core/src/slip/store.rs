//! In-memory betting slip store.

use oddsline_sdk::objects::{BetSelection, FixtureId, Market, SelectionKey};
use rust_decimal::Decimal;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::debug;

/// Errors returned by slip mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlipError {
    /// Odds must be strictly positive.
    #[error("invalid odds {odds} for {key}")]
    InvalidOdds { key: SelectionKey, odds: Decimal },

    /// Stakes are never negative; use `None` to clear a stake.
    #[error("stake must not be negative: {0}")]
    NegativeStake(Decimal),

    /// `odds × stake` does not fit in a decimal.
    #[error("stake {stake} is too large for {key}")]
    StakeTooLarge { key: SelectionKey, stake: Decimal },

    /// No selection with this key is on the slip.
    #[error("no selection for {0}")]
    UnknownSelection(SelectionKey),
}

/// The user's pending selections, at most one per `(fixture, market)`.
///
/// Selections keep the order in which they were first added; replacing a
/// selection keeps its position. Slips rarely hold more than a handful of
/// entries, so lookups are linear scans over inline storage.
#[derive(Debug, Clone, Default)]
pub struct BetSlip {
    selections: SmallVec<[BetSelection; 8]>,
}

impl BetSlip {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a selection, replacing any entry for the same fixture and
    /// market. The newest odds win; a duplicate is not an error.
    ///
    /// Returns the replaced selection, if there was one.
    pub fn add(&mut self, selection: BetSelection) -> Result<Option<BetSelection>, SlipError> {
        if selection.odds <= Decimal::ZERO {
            return Err(SlipError::InvalidOdds {
                key: selection.key(),
                odds: selection.odds,
            });
        }
        if let Some(stake) = selection.stake {
            check_stake(stake)?;
            check_payout(&selection, stake)?;
        }

        match self.position(&selection.fixture_id, selection.market) {
            Some(index) => {
                debug!(
                    fixture_id = %selection.fixture_id,
                    market = %selection.market,
                    odds = %selection.odds,
                    "Replacing slip selection"
                );
                Ok(Some(std::mem::replace(&mut self.selections[index], selection)))
            }
            None => {
                debug!(
                    fixture_id = %selection.fixture_id,
                    market = %selection.market,
                    odds = %selection.odds,
                    "Adding slip selection"
                );
                self.selections.push(selection);
                Ok(None)
            }
        }
    }

    /// Remove the selection for this fixture and market. Removing a
    /// selection that is not on the slip is a no-op.
    pub fn remove(&mut self, fixture_id: &FixtureId, market: Market) -> Option<BetSelection> {
        let index = self.position(fixture_id, market)?;
        Some(self.selections.remove(index))
    }

    /// Set (or clear, with `None`) the stake of exactly one selection.
    pub fn set_stake(&mut self, key: &SelectionKey, amount: Option<Decimal>) -> Result<(), SlipError> {
        if let Some(stake) = amount {
            check_stake(stake)?;
        }
        let index = self
            .position(&key.fixture_id, key.market)
            .ok_or_else(|| SlipError::UnknownSelection(key.clone()))?;
        if let Some(stake) = amount {
            check_payout(&self.selections[index], stake)?;
        }
        self.selections[index].stake = amount;
        Ok(())
    }

    /// Set the stake of every selection on a fixture.
    ///
    /// When a fixture has more than one market selected (say `home` and
    /// `over`), all of them receive the same stake. Prefer
    /// [`set_stake`](Self::set_stake) to target a single selection.
    ///
    /// Returns the number of selections updated. Nothing changes if the
    /// stake is rejected for any of them.
    pub fn set_fixture_stake(
        &mut self,
        fixture_id: &FixtureId,
        amount: Option<Decimal>,
    ) -> Result<usize, SlipError> {
        if let Some(stake) = amount {
            check_stake(stake)?;
            for selection in self.selections.iter().filter(|s| &s.fixture_id == fixture_id) {
                check_payout(selection, stake)?;
            }
        }
        let mut updated = 0;
        for selection in self
            .selections
            .iter_mut()
            .filter(|s| &s.fixture_id == fixture_id)
        {
            selection.stake = amount;
            updated += 1;
        }
        Ok(updated)
    }

    /// Remove every selection.
    pub fn clear(&mut self) {
        self.selections.clear();
    }

    pub fn get(&self, key: &SelectionKey) -> Option<&BetSelection> {
        self.selections
            .iter()
            .find(|s| s.matches(&key.fixture_id, key.market))
    }

    pub fn selections(&self) -> &[BetSelection] {
        &self.selections
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Sum of all stakes; unset stakes count as zero. Saturates at
    /// [`Decimal::MAX`].
    pub fn total_stake(&self) -> Decimal {
        self.selections
            .iter()
            .map(BetSelection::effective_stake)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Sum of `odds × stake` over all selections. Saturates at
    /// [`Decimal::MAX`].
    pub fn total_potential_payout(&self) -> Decimal {
        self.selections
            .iter()
            .map(|s| s.potential_payout().unwrap_or(Decimal::MAX))
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    fn position(&self, fixture_id: &FixtureId, market: Market) -> Option<usize> {
        self.selections
            .iter()
            .position(|s| s.matches(fixture_id, market))
    }
}

fn check_stake(stake: Decimal) -> Result<(), SlipError> {
    if stake < Decimal::ZERO {
        Err(SlipError::NegativeStake(stake))
    } else {
        Ok(())
    }
}

fn check_payout(selection: &BetSelection, stake: Decimal) -> Result<(), SlipError> {
    match selection.odds.checked_mul(stake) {
        Some(_) => Ok(()),
        None => Err(SlipError::StakeTooLarge {
            key: selection.key(),
            stake,
        }),
    }
}
