//! Wall-clock seam. Energy regeneration and streak accounting both derive
//! state from elapsed time, so the time source is injected the same way the
//! store is: a trait with a system implementation and a manual test double.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, NaiveDate, Utc};

/// Millisecond-epoch time source.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Real wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Hand-advanced clock for tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    ms: AtomicI64,
}

impl ManualClock {
    pub fn at(ms: i64) -> Self {
        Self {
            ms: AtomicI64::new(ms),
        }
    }

    pub fn set(&self, ms: i64) {
        self.ms.store(ms, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, delta: i64) {
        self.ms.fetch_add(delta, Ordering::SeqCst);
    }

    pub fn advance_minutes(&self, minutes: i64) {
        self.advance_ms(minutes * 60_000);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.ms.load(Ordering::SeqCst)
    }
}

/// Calendar date for the clock's current instant (UTC). Out-of-range
/// timestamps fall back to the real today rather than failing.
pub fn today(clock: &impl Clock) -> NaiveDate {
    DateTime::<Utc>::from_timestamp_millis(clock.now_ms())
        .map(|dt| dt.date_naive())
        .unwrap_or_else(|| Utc::now().date_naive())
}
