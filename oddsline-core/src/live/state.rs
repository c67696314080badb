//! Connection state machine for the live odds notifier.
//!
//! [`NotifierState`] performs no I/O. The runtime in
//! [`notifier`](super::notifier) feeds it socket events and acts on the
//! decisions it returns, which keeps every transition testable without a
//! socket or a clock.

use oddsline_sdk::objects::PushMessage;
use time::OffsetDateTime;
use tracing::{debug, warn};

/// Status label shown while the socket is open.
pub const LABEL_LIVE: &str = "Live";
/// Status label shown otherwise.
pub const LABEL_NOT_CONNECTED: &str = "Not Connected";

/// Observable connection state published to views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionState {
    pub connected: bool,
    /// When the last odds update was received. Kept across reconnects.
    pub last_update: Option<OffsetDateTime>,
}

impl ConnectionState {
    pub fn label(&self) -> &'static str {
        if self.connected {
            LABEL_LIVE
        } else {
            LABEL_NOT_CONNECTED
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Disconnected,
    Connecting,
    Connected,
    /// Terminal. No further connections are made.
    Stopped,
}

/// What the runtime should do after a failed or lost connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Arm the retry timer.
    Schedule,
    /// A retry is already armed for this disconnect.
    AlreadyScheduled,
    /// The notifier is stopped; do nothing.
    Stopped,
}

/// What the runtime should do with an inbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Odds changed; invalidate the fixture cache once.
    Invalidate,
    /// Valid frame that needs no action.
    Ignored,
    /// Frame could not be decoded and was discarded.
    Malformed,
}

#[derive(Debug, Clone)]
pub struct NotifierState {
    phase: Phase,
    connection: ConnectionState,
    retry_pending: bool,
    disconnects: u64,
}

impl Default for NotifierState {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifierState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Disconnected,
            connection: ConnectionState::default(),
            retry_pending: false,
            disconnects: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn retry_pending(&self) -> bool {
        self.retry_pending
    }

    /// Number of times an open connection has been lost.
    pub fn disconnects(&self) -> u64 {
        self.disconnects
    }

    /// Start a connection attempt. Returns `false` unless disconnected.
    ///
    /// Consumes the pending retry, if any.
    pub fn begin_connect(&mut self) -> bool {
        if self.phase != Phase::Disconnected {
            return false;
        }
        self.phase = Phase::Connecting;
        self.retry_pending = false;
        true
    }

    /// The socket opened. Returns `false` if no attempt was in progress.
    pub fn on_open(&mut self) -> bool {
        if self.phase != Phase::Connecting {
            return false;
        }
        self.phase = Phase::Connected;
        self.connection.connected = true;
        true
    }

    /// The connection attempt failed before the socket opened.
    pub fn on_connect_failed(&mut self) -> RetryDecision {
        match self.phase {
            Phase::Stopped => RetryDecision::Stopped,
            Phase::Connecting => {
                self.phase = Phase::Disconnected;
                self.schedule_retry()
            }
            _ => self.schedule_retry_if_disconnected(),
        }
    }

    /// The socket closed or errored.
    ///
    /// Repeated close/error events for the same disconnect never schedule
    /// more than one retry.
    pub fn on_closed(&mut self) -> RetryDecision {
        match self.phase {
            Phase::Stopped => RetryDecision::Stopped,
            Phase::Connected => {
                self.phase = Phase::Disconnected;
                self.connection.connected = false;
                self.disconnects += 1;
                self.schedule_retry()
            }
            Phase::Connecting => {
                self.phase = Phase::Disconnected;
                self.schedule_retry()
            }
            Phase::Disconnected => self.schedule_retry_if_disconnected(),
        }
    }

    /// Handle one inbound text frame.
    ///
    /// Frames received while not connected are ignored. A frame that is not
    /// a JSON object with a `type` field is logged and discarded.
    pub fn on_message(&mut self, text: &str, now: OffsetDateTime) -> MessageOutcome {
        if self.phase != Phase::Connected {
            return MessageOutcome::Ignored;
        }
        match PushMessage::parse(text) {
            Ok(PushMessage::OddsUpdate) => {
                self.connection.last_update = Some(now);
                MessageOutcome::Invalidate
            }
            Ok(PushMessage::Unknown) => {
                debug!(frame = text, "Ignoring unknown push message");
                MessageOutcome::Ignored
            }
            Err(e) => {
                warn!(error = %e, "Discarding malformed push message");
                MessageOutcome::Malformed
            }
        }
    }

    /// Tear down. Any pending retry is dropped.
    pub fn stop(&mut self) {
        self.phase = Phase::Stopped;
        self.connection.connected = false;
        self.retry_pending = false;
    }

    fn schedule_retry(&mut self) -> RetryDecision {
        if self.retry_pending {
            RetryDecision::AlreadyScheduled
        } else {
            self.retry_pending = true;
            RetryDecision::Schedule
        }
    }

    fn schedule_retry_if_disconnected(&mut self) -> RetryDecision {
        if self.phase == Phase::Disconnected {
            self.schedule_retry()
        } else {
            RetryDecision::AlreadyScheduled
        }
    }
}
