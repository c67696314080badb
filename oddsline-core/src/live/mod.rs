//! Live odds notifier.
//!
//! Keeps a push connection to the odds stream open and marks cached
//! fixture data stale whenever the server reports an odds change. The
//! pieces are layered so each can be tested alone:
//!
//! - [`state`]: the pure connection state machine
//! - [`backoff`]: reconnect delays
//! - [`cache`]: the invalidation seam to the data layer
//! - [`transport`]: the connection seam to the WebSocket client
//! - [`notifier`]: the tokio task wiring them together

pub mod backoff;
pub mod cache;
pub mod notifier;
pub mod state;
pub mod transport;

pub use backoff::{Backoff, ReconnectPolicy};
pub use cache::{CacheInvalidator, CacheScope, InvalidationSignal, InvalidationWatcher};
pub use notifier::{LiveOddsNotifier, NotifierHandle};
pub use state::{ConnectionState, MessageOutcome, NotifierState, Phase, RetryDecision};
pub use transport::{PushChannel, PushConnector, TransportError};
