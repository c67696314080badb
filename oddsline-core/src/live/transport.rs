//! Push transport used by the notifier.
//!
//! The notifier only needs to open a connection and read text frames from
//! it. Production code uses the SDK WebSocket client; tests substitute
//! scripted connectors.

use async_trait::async_trait;
use oddsline_sdk::client::{LiveOddsClient, LiveOddsStream};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("connection lost: {0}")]
    Lost(String),
}

/// Opens push connections.
#[async_trait]
pub trait PushConnector: Send + Sync + 'static {
    type Channel: PushChannel;

    async fn connect(&self) -> Result<Self::Channel, TransportError>;
}

/// One open push connection.
#[async_trait]
pub trait PushChannel: Send + 'static {
    /// Next text frame, or `None` once the peer has closed the connection.
    async fn next_frame(&mut self) -> Option<Result<String, TransportError>>;

    /// Close the connection. Errors are logged, not returned.
    async fn close(&mut self);
}

#[async_trait]
impl PushConnector for LiveOddsClient {
    type Channel = LiveOddsStream;

    async fn connect(&self) -> Result<LiveOddsStream, TransportError> {
        LiveOddsClient::connect(self)
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))
    }
}

#[async_trait]
impl PushChannel for LiveOddsStream {
    async fn next_frame(&mut self) -> Option<Result<String, TransportError>> {
        self.next_text()
            .await
            .map(|frame| frame.map_err(|e| TransportError::Lost(e.to_string())))
    }

    async fn close(&mut self) {
        if let Err(e) = LiveOddsStream::close(self).await {
            tracing::debug!(error = %e, "Live odds socket close failed");
        }
    }
}
