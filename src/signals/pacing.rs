//! Request pacing for the rating source.
//!
//! Enforces a minimum gap between the starts of two consecutive requests,
//! across every worker sharing the pacer.

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Duration, Instant};
use tracing::trace;

#[derive(Debug)]
pub struct Pacer {
    min_gap: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl Pacer {
    pub fn new(min_gap: Duration) -> Self {
        Self {
            min_gap,
            next_slot: Mutex::new(None),
        }
    }

    /// A pacer that never waits.
    pub fn unpaced() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn min_gap(&self) -> Duration {
        self.min_gap
    }

    /// Wait for the next request slot.
    ///
    /// Slots are handed out in call order; the lock is held only while the
    /// slot is reserved, not while sleeping.
    pub async fn wait(&self) {
        if self.min_gap.is_zero() {
            return;
        }

        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next {
                Some(at) if at > now => at,
                _ => now,
            };
            *next = Some(slot + self.min_gap);
            slot
        };

        if slot > Instant::now() {
            trace!(wait_ms = (slot - Instant::now()).as_millis() as u64, "Pacer: waiting for slot");
            sleep_until(slot).await;
        }
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(Duration::from_millis(150))
    }
}
