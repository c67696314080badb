//! Reconnect delay policy.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Floor for any reconnect delay, so a zero policy cannot spin.
const MIN_DELAY_MS: u64 = 1;

/// How long the notifier waits before reconnecting.
///
/// Delays grow geometrically from `initial_delay_ms` up to `max_delay_ms`.
/// Each delay gets up to `jitter` (a fraction of the base delay) added so
/// that clients dropped together do not reconnect together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectPolicy {
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: f64,
    pub jitter: f64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_delay_ms: 5_000,
            max_delay_ms: 60_000,
            multiplier: 2.0,
            jitter: 0.2,
        }
    }
}

impl ReconnectPolicy {
    /// Always wait exactly `delay`, with no growth and no jitter.
    pub fn fixed(delay: Duration) -> Self {
        let ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        Self {
            initial_delay_ms: ms,
            max_delay_ms: ms,
            multiplier: 1.0,
            jitter: 0.0,
        }
    }

    pub fn backoff(&self) -> Backoff {
        Backoff::new(*self)
    }
}

/// Delay state for one notifier.
#[derive(Debug, Clone)]
pub struct Backoff {
    policy: ReconnectPolicy,
    current_ms: u64,
}

impl Backoff {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            current_ms: Self::initial_ms(&policy),
            policy,
        }
    }

    fn initial_ms(policy: &ReconnectPolicy) -> u64 {
        policy
            .initial_delay_ms
            .min(policy.max_delay_ms)
            .max(MIN_DELAY_MS)
    }

    /// The delay to wait now. Advances the base delay for the next call.
    pub fn next_delay(&mut self) -> Duration {
        let base = self.current_ms;
        let delay = base.saturating_add(self.jitter_ms(base));

        let grown = (base as f64 * self.policy.multiplier.max(1.0)) as u64;
        self.current_ms = grown.clamp(base, self.policy.max_delay_ms.max(base));

        Duration::from_millis(delay)
    }

    /// Base delay the next call will start from, without jitter.
    pub fn current_base(&self) -> Duration {
        Duration::from_millis(self.current_ms)
    }

    /// Return to the initial delay after a successful connection.
    pub fn reset(&mut self) {
        self.current_ms = Self::initial_ms(&self.policy);
    }

    fn jitter_ms(&self, base_ms: u64) -> u64 {
        let range = (base_ms as f64 * self.policy.jitter.clamp(0.0, 1.0)) as u64;
        if range == 0 {
            return 0;
        }
        rand::rng().random_range(0..=range)
    }
}
