//! Fixed pre-request delay to stay inside provider quotas.
//!
//! Every fetch sleeps for the configured delay before touching the network.
//! The delay is per fetch, not per ticker; the result cache above keeps
//! repeated requests for one ticker from reaching this point at all.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

#[derive(Debug)]
pub struct Throttle {
    delay: Duration,
    pauses: AtomicU64,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pauses: AtomicU64::new(0),
        }
    }

    /// No delay. For tests and offline providers.
    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Block the calling thread for the configured delay.
    pub fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::Relaxed);
        if self.delay.is_zero() {
            return;
        }
        debug!(delay_ms = self.delay.as_millis() as u64, "throttling before provider request");
        std::thread::sleep(self.delay);
    }

    /// Number of times [`pause`](Self::pause) has been called.
    pub fn pauses(&self) -> u64 {
        self.pauses.load(Ordering::Relaxed)
    }
}
