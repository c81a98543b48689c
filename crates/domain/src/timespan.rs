use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Half open interval of timestamps in millis, used to ask the event source
/// for the instances it should return.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSpan {
    start_ts: i64,
    end_ts: i64,
}

impl TimeSpan {
    pub fn new(start_ts: i64, end_ts: i64) -> Self {
        Self { start_ts, end_ts }
    }

    /// Span from `behind` before `now` until `ahead` after `now`
    pub fn around(now: i64, behind: Duration, ahead: Duration) -> Self {
        Self::new(
            now - behind.num_milliseconds(),
            now + ahead.num_milliseconds(),
        )
    }

    pub fn start(&self) -> i64 {
        self.start_ts
    }

    pub fn end(&self) -> i64 {
        self.end_ts
    }
}
