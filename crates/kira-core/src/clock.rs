// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction: wall-clock time everywhere goes through this trait so
//! tests can pin a fake timestamp instead of racing real time.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use parking_lot::Mutex;
use std::sync::Arc;

pub const DEFAULT_TZ: &str = "Europe/Brussels";

/// Source of truth for "now", injected everywhere time matters.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn tz(&self) -> Tz;

    fn now_local(&self) -> DateTime<Tz> {
        self.now().with_timezone(&self.tz())
    }

    fn epoch_ms(&self) -> u64 {
        self.now().timestamp_millis().max(0) as u64
    }
}

/// Real clock, backed by the configured vault timezone.
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    /// Parses `tz_name` as an IANA zone. Falls back to [`DEFAULT_TZ`] and logs
    /// a warning when the name isn't recognized.
    #[allow(clippy::expect_used)]
    pub fn new(tz_name: &str) -> Self {
        let tz = tz_name.parse::<Tz>().unwrap_or_else(|_| {
            tracing::warn!(tz = tz_name, fallback = DEFAULT_TZ, "invalid vault timezone");
            DEFAULT_TZ.parse::<Tz>().expect("default timezone is valid")
        });
        Self { tz }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(DEFAULT_TZ)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn tz(&self) -> Tz {
        self.tz
    }
}

/// Deterministic clock for tests: holds a fixed instant that callers can advance.
#[derive(Clone)]
pub struct FakeClock {
    now: Arc<Mutex<DateTime<Utc>>>,
    tz: Tz,
}

impl FakeClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
            tz: Tz::UTC,
        }
    }

    pub fn with_tz(mut self, tz: Tz) -> Self {
        self.tz = tz;
        self
    }

    pub fn set(&self, when: DateTime<Utc>) {
        *self.now.lock() = when;
    }

    pub fn advance(&self, delta: chrono::Duration) {
        let mut guard = self.now.lock();
        *guard += delta;
    }
}

impl Default for FakeClock {
    #[allow(clippy::unwrap_used)]
    fn default() -> Self {
        Self::new(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap())
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }

    fn tz(&self) -> Tz {
        self.tz
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
