use crate::domain::TrackingCode;
use crate::ports::outbound::{TimeSource, TrackingCodeSource};
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Default time source using system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Tracking codes from the thread-local CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTrackingCodeSource;

impl TrackingCodeSource for RandomTrackingCodeSource {
    fn next_code(&self) -> TrackingCode {
        TrackingCode::generate(&mut rand::thread_rng())
    }
}

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Hands out a fixed list of codes, then falls back to random ones.
#[derive(Default)]
pub struct ScriptedTrackingCodeSource {
    script: Mutex<VecDeque<TrackingCode>>,
}

impl ScriptedTrackingCodeSource {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            script: Mutex::new(
                codes
                    .into_iter()
                    .map(|c| TrackingCode::from_input(c.as_ref()))
                    .collect(),
            ),
        }
    }
}

impl TrackingCodeSource for ScriptedTrackingCodeSource {
    fn next_code(&self) -> TrackingCode {
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| RandomTrackingCodeSource.next_code())
    }
}
