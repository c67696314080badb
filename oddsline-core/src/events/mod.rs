//! Domain events fanned out to connected clients.
//!
//! Events carry identifiers and the new value only. Subscribers that need
//! more re-read the ledger.

use oddsline_sdk::objects::{FixtureId, Market};
use rust_decimal::Decimal;
use tokio::sync::broadcast;

/// Default capacity of the odds change channel.
pub const DEFAULT_ODDS_BUFFER: usize = 256;

/// Odds on one market of a fixture were republished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OddsChanged {
    pub fixture_id: FixtureId,
    pub market: Market,
    pub odds: Decimal,
}

pub type OddsChangedSender = broadcast::Sender<OddsChanged>;
pub type OddsChangedReceiver = broadcast::Receiver<OddsChanged>;

/// Create the odds change channel.
///
/// Receivers that lag more than `capacity` events behind lose the oldest
/// ones and observe `RecvError::Lagged` once.
pub fn odds_changed_channel(capacity: usize) -> (OddsChangedSender, OddsChangedReceiver) {
    broadcast::channel(capacity.max(1))
}
