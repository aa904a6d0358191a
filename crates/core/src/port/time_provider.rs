// Time Provider Port (for testability)

use crate::domain::Datetime;
use std::sync::Mutex;

/// Time provider interface (allows mocking in tests)
pub trait TimeProvider: Send + Sync {
    /// Current UTC time at microsecond precision
    fn now(&self) -> Datetime;
}

/// System time provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> Datetime {
        Datetime::now()
    }
}

/// Manually driven clock for deterministic tests
pub struct ManualClock {
    now: Mutex<Datetime>,
}

impl ManualClock {
    pub fn new(start: Datetime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, value: Datetime) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = value;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut guard = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Datetime::from_utc(guard.as_datetime() + by);
    }
}

impl TimeProvider for ManualClock {
    fn now(&self) -> Datetime {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}
