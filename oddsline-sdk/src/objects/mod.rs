//! Request, response and push-message types for the Oddsline APIs.
//!
//! All JSON objects use camelCase field names. Monetary amounts and odds
//! are [`rust_decimal::Decimal`] values carried as strings on the wire.

pub mod admin;
pub mod bet;
pub mod fixture;
pub mod selection;
pub mod wallet;
pub mod ws;

pub use admin::UpdateOddsRequest;
pub use bet::{BetReceipt, BetStatus, PAYOUT_DECIMAL_PLACES, PlaceBetRequest, potential_win};
pub use fixture::{FixtureId, FixtureResponse, FixtureStatus, Market, UnknownMarket};
pub use selection::{BetSelection, SelectionKey};
pub use wallet::{
    AccountResponse, PaymentMethod, TransactionKind, TransactionRequest, TransactionResponse,
    TransactionStatus,
};
pub use ws::{LIVE_ODDS_PATH, LiveEndpointError, PushMessage, live_odds_url};
