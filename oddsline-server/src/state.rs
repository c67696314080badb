//! Application state shared across all request handlers.

use oddsline_core::config::SharedConfig;
use oddsline_core::entities::Ledger;
use oddsline_core::events::odds_changed_channel;
use oddsline_core::framework::LedgerProcessor;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Runtime configuration (server and admin sections reload on SIGHUP).
    pub config: SharedConfig,
    /// Ledger processor; also owns the odds change channel.
    pub ledger: LedgerProcessor,
}

impl AppState {
    /// Wrap a seeded ledger. The odds channel capacity is fixed at startup.
    pub fn new(config: SharedConfig, ledger: Ledger, odds_buffer: usize) -> Self {
        let (odds_tx, _) = odds_changed_channel(odds_buffer);
        Self {
            config,
            ledger: LedgerProcessor::new(ledger, odds_tx),
        }
    }
}
