use crate::application::ports::Clock;
use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Wall-clock time source
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Controllable time source for tests and replays.
///
/// Clones share the same reading, so a test can keep a handle while the
/// service owns another. Precision is one microsecond.
#[derive(Debug, Clone)]
pub struct ManualClock {
    micros_since_epoch: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            micros_since_epoch: Arc::new(AtomicI64::new(start.timestamp_micros())),
        }
    }

    /// Move time forward (or backward, for a negative duration).
    ///
    /// Saturates at the representable range instead of wrapping.
    pub fn advance(&self, by: Duration) {
        let delta = by.num_microseconds().unwrap_or(if by < Duration::zero() {
            i64::MIN
        } else {
            i64::MAX
        });
        // The closure never returns None, so the update cannot fail
        let _ = self
            .micros_since_epoch
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |micros| {
                Some(micros.saturating_add(delta))
            });
    }

    pub fn set(&self, to: DateTime<Utc>) {
        self.micros_since_epoch
            .store(to.timestamp_micros(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let micros = self.micros_since_epoch.load(Ordering::SeqCst);
        DateTime::<Utc>::UNIX_EPOCH
            .checked_add_signed(Duration::microseconds(micros))
            .unwrap_or(if micros < 0 {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            })
    }
}
