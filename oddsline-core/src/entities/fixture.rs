use std::collections::BTreeMap;

use kanau::processor::Processor;
use oddsline_sdk::objects::{FixtureId, FixtureResponse, FixtureStatus, Market};
use rust_decimal::Decimal;
use tracing::info;

use super::LedgerError;
use crate::events::OddsChanged;
use crate::framework::LedgerProcessor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureRecord {
    pub fixture_id: FixtureId,
    pub home: String,
    pub away: String,
    pub league: String,
    pub kickoff: time::OffsetDateTime,
    pub status: FixtureStatus,
    pub odds: BTreeMap<Market, Decimal>,
}

impl FixtureRecord {
    /// Current odds for `market`, if offered.
    pub fn odds_for(&self, market: Market) -> Option<Decimal> {
        self.odds.get(&market).copied()
    }
}

impl From<&FixtureRecord> for FixtureResponse {
    fn from(record: &FixtureRecord) -> Self {
        FixtureResponse {
            fixture_id: record.fixture_id.clone(),
            home: record.home.clone(),
            away: record.away.clone(),
            league: record.league.clone(),
            kickoff: record.kickoff.unix_timestamp(),
            status: record.status,
            odds: record.odds.clone(),
        }
    }
}

#[derive(Debug, Clone)]
/// All fixtures, ordered by kickoff then id.
pub struct ListFixtures;

impl Processor<ListFixtures> for LedgerProcessor {
    type Output = Vec<FixtureRecord>;
    type Error = LedgerError;
    async fn process(&self, _: ListFixtures) -> Result<Vec<FixtureRecord>, LedgerError> {
        let ledger = self.ledger.read().await;
        let mut fixtures: Vec<_> = ledger.fixtures.values().cloned().collect();
        fixtures.sort_by(|a, b| {
            a.kickoff
                .cmp(&b.kickoff)
                .then_with(|| a.fixture_id.cmp(&b.fixture_id))
        });
        Ok(fixtures)
    }
}

#[derive(Debug, Clone)]
pub struct GetFixture {
    pub fixture_id: FixtureId,
}

impl Processor<GetFixture> for LedgerProcessor {
    type Output = FixtureRecord;
    type Error = LedgerError;
    async fn process(&self, query: GetFixture) -> Result<FixtureRecord, LedgerError> {
        let ledger = self.ledger.read().await;
        ledger
            .fixtures
            .get(&query.fixture_id)
            .cloned()
            .ok_or(LedgerError::FixtureNotFound(query.fixture_id))
    }
}

#[derive(Debug, Clone)]
/// Publish new odds for one market, adding the market if it was not
/// offered yet. Emits [`OddsChanged`] on success.
pub struct UpdateOdds {
    pub fixture_id: FixtureId,
    pub market: Market,
    pub odds: Decimal,
}

impl Processor<UpdateOdds> for LedgerProcessor {
    type Output = FixtureRecord;
    type Error = LedgerError;
    #[tracing::instrument(skip_all, err, name = "Ledger:UpdateOdds")]
    async fn process(&self, update: UpdateOdds) -> Result<FixtureRecord, LedgerError> {
        if update.odds <= Decimal::ZERO {
            return Err(LedgerError::InvalidOdds(update.odds));
        }

        let record = {
            let mut ledger = self.ledger.write().await;
            let fixture = ledger
                .fixtures
                .get_mut(&update.fixture_id)
                .ok_or_else(|| LedgerError::FixtureNotFound(update.fixture_id.clone()))?;
            fixture.odds.insert(update.market, update.odds);
            fixture.clone()
        };

        info!(
            fixture_id = %update.fixture_id,
            market = %update.market,
            odds = %update.odds,
            "Odds updated"
        );
        // No receivers just means no sockets are connected.
        let _ = self.odds_changed.send(OddsChanged {
            fixture_id: update.fixture_id,
            market: update.market,
            odds: update.odds,
        });

        Ok(record)
    }
}
