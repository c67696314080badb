//! WebSocket message types for the live odds stream.
//!
//! The `GET /api/v1/ws` endpoint upgrades to a WebSocket connection and
//! pushes [`PushMessage`] JSON frames.
//!
//! # Protocol
//!
//! 1. The server sends nothing on connect; clients already hold (or are
//!    fetching) a fresh fixture listing.
//! 2. Whenever odds change the server sends `{"type":"odds_update"}`.
//!    Clients respond by refetching odds-dependent views; the frame
//!    carries no payload clients need to read.
//! 3. A receiver that falls behind gets one `odds_update` in place of
//!    the frames it missed.

use serde::{Deserialize, Serialize};
use url::Url;

/// Path of the live odds WebSocket on the API host.
pub const LIVE_ODDS_PATH: &str = "/api/v1/ws";

/// Server-to-client WebSocket message.
///
/// Internally tagged on `"type"`. Fields other than `type` are ignored
/// and unrecognized `type` values decode to [`PushMessage::Unknown`]
/// instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PushMessage {
    /// Odds changed on at least one fixture.
    OddsUpdate,

    /// Any message kind this client does not know about.
    #[serde(other)]
    Unknown,
}

impl PushMessage {
    /// Decode a text frame.
    ///
    /// Fails only on frames that are not a JSON object with a string
    /// `type` field.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LiveEndpointError {
    #[error("unsupported url scheme: {0}")]
    UnsupportedScheme(String),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

/// Derive the live odds WebSocket URL from the API base URL.
///
/// `https` maps to `wss` and `http` to `ws`; a base URL that already
/// uses a WebSocket scheme keeps it. The path is always
/// [`LIVE_ODDS_PATH`].
pub fn live_odds_url(base_url: &Url) -> Result<Url, LiveEndpointError> {
    let scheme = match base_url.scheme() {
        "https" | "wss" => "wss",
        "http" | "ws" => "ws",
        other => return Err(LiveEndpointError::UnsupportedScheme(other.to_owned())),
    };

    let mut url = base_url.join(LIVE_ODDS_PATH)?;
    url.set_query(None);
    url.set_fragment(None);
    url.set_scheme(scheme)
        .map_err(|_| LiveEndpointError::UnsupportedScheme(base_url.scheme().to_owned()))?;
    Ok(url)
}
