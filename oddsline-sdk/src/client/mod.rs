//! HTTP and WebSocket clients for the Oddsline APIs.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest` or `tokio-tungstenite`.

mod admin;
mod betting;
mod live;

pub use admin::AdminClient;
pub use betting::BettingClient;
pub use live::{LiveOddsClient, LiveOddsStream};

use reqwest::StatusCode;

use crate::objects::LiveEndpointError;

/// Errors produced by the SDK clients.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// WebSocket handshake or stream failure.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The server returned a non-2xx status code.
    #[error("api error: status {status}, body: {body}")]
    Api { status: StatusCode, body: String },

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The base URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// The live odds endpoint could not be derived from the base URL.
    #[error("invalid live endpoint: {0}")]
    LiveEndpoint(#[from] LiveEndpointError),
}

impl ClientError {
    /// The response body of an API rejection, if this is one.
    ///
    /// The server answers rejected requests with a plain-text reason that
    /// is meant to be shown to the user as-is.
    pub fn rejection_reason(&self) -> Option<&str> {
        match self {
            ClientError::Api { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }
}

pub(crate) async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}
