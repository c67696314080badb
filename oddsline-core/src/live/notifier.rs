//! The live odds notifier task.
//!
//! One tokio task per notifier. It keeps a single push connection open,
//! invalidates the fixture cache on every odds update and reconnects with
//! backoff whenever the connection fails or drops. The task never touches
//! the betting slip.

use time::OffsetDateTime;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::backoff::ReconnectPolicy;
use super::cache::{CacheInvalidator, CacheScope};
use super::state::{ConnectionState, MessageOutcome, NotifierState, RetryDecision};
use super::transport::{PushChannel, PushConnector};

pub struct LiveOddsNotifier<C, I> {
    connector: C,
    invalidator: I,
    policy: ReconnectPolicy,
}

/// Control handle for a spawned notifier.
///
/// Dropping the handle stops the notifier as well: the socket is closed
/// and any pending retry is cancelled.
pub struct NotifierHandle {
    shutdown_tx: watch::Sender<bool>,
    status_rx: watch::Receiver<ConnectionState>,
    task: JoinHandle<()>,
}

impl<C, I> LiveOddsNotifier<C, I>
where
    C: PushConnector,
    I: CacheInvalidator + 'static,
{
    pub fn new(connector: C, invalidator: I) -> Self {
        Self {
            connector,
            invalidator,
            policy: ReconnectPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ReconnectPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Start the notifier on the current tokio runtime.
    pub fn spawn(self) -> NotifierHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (status_tx, status_rx) = watch::channel(ConnectionState::default());
        let task = tokio::spawn(self.run(shutdown_rx, status_tx));
        NotifierHandle {
            shutdown_tx,
            status_rx,
            task,
        }
    }

    /// Run until `shutdown_rx` turns `true` or its sender is dropped.
    ///
    /// Connection state is published on `status_tx` after every transition.
    pub async fn run(
        self,
        mut shutdown_rx: watch::Receiver<bool>,
        status_tx: watch::Sender<ConnectionState>,
    ) {
        let mut state = NotifierState::new();
        let mut backoff = self.policy.backoff();

        'reconnect: loop {
            if !state.begin_connect() {
                break;
            }
            publish(&status_tx, &state);

            let connected = tokio::select! {
                biased;
                _ = shutdown_requested(&mut shutdown_rx) => break 'reconnect,
                result = self.connector.connect() => result,
            };

            let decision = match connected {
                Ok(mut channel) => {
                    state.on_open();
                    backoff.reset();
                    publish(&status_tx, &state);
                    info!("Live odds connected");

                    loop {
                        tokio::select! {
                            biased;

                            _ = shutdown_requested(&mut shutdown_rx) => {
                                channel.close().await;
                                break 'reconnect;
                            }

                            frame = channel.next_frame() => match frame {
                                Some(Ok(text)) => self.handle_frame(&mut state, &text, &status_tx),
                                Some(Err(e)) => {
                                    warn!(error = %e, "Live odds connection error");
                                    break;
                                }
                                None => {
                                    info!("Live odds connection closed by server");
                                    break;
                                }
                            }
                        }
                    }

                    state.on_closed()
                }
                Err(e) => {
                    warn!(error = %e, "Live odds connection failed");
                    state.on_connect_failed()
                }
            };
            publish(&status_tx, &state);

            match decision {
                RetryDecision::Schedule => {
                    let delay = backoff.next_delay();
                    info!(
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        disconnects = state.disconnects(),
                        "Scheduling live odds reconnect"
                    );
                    tokio::select! {
                        biased;
                        _ = shutdown_requested(&mut shutdown_rx) => break 'reconnect,
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                RetryDecision::AlreadyScheduled => {}
                RetryDecision::Stopped => break,
            }
        }

        state.stop();
        publish(&status_tx, &state);
        info!("Live odds notifier stopped");
    }

    fn handle_frame(
        &self,
        state: &mut NotifierState,
        text: &str,
        status_tx: &watch::Sender<ConnectionState>,
    ) {
        match state.on_message(text, OffsetDateTime::now_utc()) {
            MessageOutcome::Invalidate => {
                debug!("Odds changed, invalidating fixture listings");
                self.invalidator.invalidate(CacheScope::FixtureListings);
                publish(status_tx, state);
            }
            MessageOutcome::Ignored | MessageOutcome::Malformed => {}
        }
    }
}

impl NotifierHandle {
    pub fn status(&self) -> ConnectionState {
        *self.status_rx.borrow()
    }

    /// `"Live"` or `"Not Connected"`.
    pub fn label(&self) -> &'static str {
        self.status().label()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.status_rx.clone()
    }

    /// Stop the notifier and wait for the task to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            warn!(error = %e, "Live odds notifier task failed");
        }
    }
}

/// Resolves once shutdown is requested or the handle is gone.
async fn shutdown_requested(shutdown_rx: &mut watch::Receiver<bool>) {
    let _ = shutdown_rx.wait_for(|stop| *stop).await;
}

fn publish(status_tx: &watch::Sender<ConnectionState>, state: &NotifierState) {
    let next = state.connection();
    status_tx.send_if_modified(|current| {
        if *current == next {
            false
        } else {
            *current = next;
            true
        }
    });
}
