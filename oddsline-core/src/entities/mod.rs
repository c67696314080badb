//! In-memory ledger: fixtures, accounts, bets and wallet transactions.
//!
//! Records live in a [`Ledger`] owned by a
//! [`LedgerProcessor`](crate::framework::LedgerProcessor). Each operation
//! is a small input struct with a `Processor` impl in the module of the
//! record it touches.

pub mod account;
pub mod bet;
pub mod fixture;
pub mod transaction;

pub use account::{AccountRecord, FindAccountByToken, GetAccount};
pub use bet::{BetRecord, ListBets, PlaceBet};
pub use fixture::{FixtureRecord, GetFixture, ListFixtures, UpdateOdds};
pub use transaction::{
    ListTransactions, RequestTransaction, Settlement, SettleTransaction, TransactionRecord,
};

use std::collections::{BTreeMap, HashMap};

use oddsline_sdk::objects::{FixtureId, Market, TransactionStatus};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("fixture {0} not found")]
    FixtureNotFound(FixtureId),

    #[error("fixture {0} is no longer accepting bets")]
    FixtureClosed(FixtureId),

    #[error("market {market} is not offered on fixture {fixture_id}")]
    MarketNotOffered { fixture_id: FixtureId, market: Market },

    #[error("odds have changed, current odds are {current}")]
    OddsChanged { current: Decimal },

    #[error("odds must be positive: {0}")]
    InvalidOdds(Decimal),

    #[error("stake must be positive: {0}")]
    InvalidStake(Decimal),

    #[error("potential win {submitted} does not match {expected}")]
    PotentialWinMismatch { expected: Decimal, submitted: Decimal },

    #[error("insufficient funds")]
    InsufficientFunds { balance: Decimal, required: Decimal },

    #[error("amount must be positive: {0}")]
    InvalidAmount(Decimal),

    #[error("account {0} not found")]
    AccountNotFound(Uuid),

    #[error("transaction {0} not found")]
    TransactionNotFound(Uuid),

    #[error("transaction {id} is already {status}")]
    TransactionSettled { id: Uuid, status: TransactionStatus },

    #[error("duplicate fixture id {0}")]
    DuplicateFixture(FixtureId),

    #[error("duplicate account token for {0}")]
    DuplicateToken(String),
}

/// All ledger state. Not shared directly; see
/// [`LedgerProcessor`](crate::framework::LedgerProcessor).
#[derive(Debug, Default)]
pub struct Ledger {
    pub(crate) fixtures: BTreeMap<FixtureId, FixtureRecord>,
    pub(crate) accounts: HashMap<Uuid, AccountRecord>,
    pub(crate) tokens: HashMap<String, Uuid>,
    pub(crate) bets: Vec<BetRecord>,
    pub(crate) transactions: Vec<TransactionRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a fixture. Ids must be unique.
    pub fn insert_fixture(&mut self, fixture: FixtureRecord) -> Result<(), LedgerError> {
        if self.fixtures.contains_key(&fixture.fixture_id) {
            return Err(LedgerError::DuplicateFixture(fixture.fixture_id));
        }
        if let Some(odds) = fixture.odds.values().find(|odds| **odds <= Decimal::ZERO) {
            return Err(LedgerError::InvalidOdds(*odds));
        }
        self.fixtures.insert(fixture.fixture_id.clone(), fixture);
        Ok(())
    }

    /// Seed an account. Tokens must be unique.
    pub fn insert_account(&mut self, account: AccountRecord) -> Result<(), LedgerError> {
        if self.tokens.contains_key(&account.token) {
            return Err(LedgerError::DuplicateToken(account.display_name));
        }
        self.tokens.insert(account.token.clone(), account.account_id);
        self.accounts.insert(account.account_id, account);
        Ok(())
    }

    pub fn fixture_count(&self) -> usize {
        self.fixtures.len()
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub(crate) fn account_mut(&mut self, account_id: Uuid) -> Result<&mut AccountRecord, LedgerError> {
        self.accounts
            .get_mut(&account_id)
            .ok_or(LedgerError::AccountNotFound(account_id))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::events::odds_changed_channel;
    use crate::framework::LedgerProcessor;
    use oddsline_sdk::objects::FixtureStatus;
    use rust_decimal_macros::dec;
    use time::OffsetDateTime;

    pub const TOKEN: &str = "token-alice";

    pub fn fixture(id: &str, status: FixtureStatus) -> FixtureRecord {
        FixtureRecord {
            fixture_id: FixtureId::from(id),
            home: "Arsenal".into(),
            away: "Chelsea".into(),
            league: "Premier League".into(),
            kickoff: OffsetDateTime::UNIX_EPOCH,
            status,
            odds: BTreeMap::from([
                (Market::Home, dec!(2.0)),
                (Market::Draw, dec!(3.4)),
                (Market::Away, dec!(3.2)),
            ]),
        }
    }

    /// A ledger with fixtures `f1` (scheduled) and `f9` (finished) and one
    /// account holding `balance`.
    pub fn processor(balance: Decimal) -> (LedgerProcessor, Uuid) {
        let mut ledger = Ledger::new();
        ledger
            .insert_fixture(fixture("f1", FixtureStatus::Scheduled))
            .unwrap();
        ledger
            .insert_fixture(fixture("f9", FixtureStatus::Finished))
            .unwrap();

        let account = AccountRecord::new(TOKEN, "Alice", balance);
        let account_id = account.account_id;
        ledger.insert_account(account).unwrap();

        let (odds_tx, _) = odds_changed_channel(16);
        (LedgerProcessor::new(ledger, odds_tx), account_id)
    }
}
