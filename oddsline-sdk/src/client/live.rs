//! Live odds WebSocket client.
//!
//! Connects to [`LIVE_ODDS_PATH`](crate::objects::LIVE_ODDS_PATH) and
//! yields raw text frames. Decoding is left to the caller so that a
//! malformed frame can be discarded without tearing down the stream.

use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

use super::ClientError;
use crate::objects::live_odds_url;

/// Connector for the live odds stream.
#[derive(Debug, Clone)]
pub struct LiveOddsClient {
    url: Url,
}

impl LiveOddsClient {
    /// Build a connector from the API base URL (`https` → `wss`).
    pub fn new(base_url: &Url) -> Result<Self, ClientError> {
        Ok(Self {
            url: live_odds_url(base_url)?,
        })
    }

    /// Build a connector from an explicit WebSocket URL.
    pub fn from_ws_url(url: Url) -> Self {
        Self { url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Open a new connection.
    pub async fn connect(&self) -> Result<LiveOddsStream, ClientError> {
        let (inner, response) = connect_async(self.url.as_str()).await?;
        tracing::debug!(url = %self.url, status = %response.status(), "Live odds socket connected");
        Ok(LiveOddsStream { inner })
    }
}

/// An open live odds connection.
pub struct LiveOddsStream {
    inner: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl LiveOddsStream {
    /// Wait for the next text frame.
    ///
    /// Returns `None` once the server closes the connection. Ping/pong
    /// frames are answered by the transport and skipped here; binary
    /// frames are decoded lossily and left for the caller to reject.
    pub async fn next_text(&mut self) -> Option<Result<String, ClientError>> {
        while let Some(frame) = self.inner.next().await {
            match frame {
                Ok(Message::Text(text)) => return Some(Ok(text)),
                Ok(Message::Binary(bytes)) => {
                    return Some(Ok(String::from_utf8_lossy(&bytes).into_owned()));
                }
                Ok(Message::Close(_)) => return None,
                Ok(_) => continue,
                Err(e) => return Some(Err(e.into())),
            }
        }
        None
    }

    /// Send a normal close frame.
    pub async fn close(&mut self) -> Result<(), ClientError> {
        self.inner.close(None).await?;
        Ok(())
    }
}
