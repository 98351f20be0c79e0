use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::roster::domain::clock::Clock;

/// Wall clock that never repeats or goes backwards.
///
/// When the system time has not advanced past the last issued value (same
/// tick, or an adjustment backwards), the previous value plus one
/// microsecond is returned instead.
#[derive(Default)]
pub struct SystemClock {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_after(last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
        match last {
            Some(prev) if now <= prev => prev + Duration::microseconds(1),
            _ => now,
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        let now = Utc::now();
        match self.last.lock() {
            Ok(mut last) => {
                let next = Self::next_after(*last, now);
                *last = Some(next);
                next
            }
            // A poisoned guard still holds the last value; keep advancing it.
            Err(poisoned) => {
                let mut last = poisoned.into_inner();
                let next = Self::next_after(*last, now);
                *last = Some(next);
                next
            }
        }
    }
}
