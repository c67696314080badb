use std::sync::Arc;

use tokio::sync::RwLock;

use crate::entities::Ledger;
use crate::events::{OddsChangedSender, OddsChangedReceiver};

/// Executes ledger processors.
///
/// Every processor call holds the ledger lock for its whole
/// read-check-write, so balance checks and debits cannot interleave.
#[derive(Clone)]
pub struct LedgerProcessor {
    pub ledger: Arc<RwLock<Ledger>>,
    pub odds_changed: OddsChangedSender,
}

impl LedgerProcessor {
    pub fn new(ledger: Ledger, odds_changed: OddsChangedSender) -> Self {
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
            odds_changed,
        }
    }

    pub fn subscribe_odds(&self) -> OddsChangedReceiver {
        self.odds_changed.subscribe()
    }
}
