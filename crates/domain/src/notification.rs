use crate::event_instance::EventId;
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Immediate change notifications live in
/// `[CHANGE_NOTIFICATION_ID_OFFSET, CHANGE_NOTIFICATION_ID_OFFSET + 10000)`
pub const CHANGE_NOTIFICATION_ID_OFFSET: i32 = 10_000;
/// Scheduled reminders are numbered upwards from here on every scheduling run
pub const REMINDER_NOTIFICATION_ID_OFFSET: i32 = 100_000;

const CHANGE_NOTIFICATION_ID_SPACE: i64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationChannel {
    Reminders,
    Changes,
}

/// A request to the notification sink. Issuing the same `id` again replaces
/// the previous notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub id: i32,
    pub channel: NotificationChannel,
    pub title: String,
    pub body: String,
    /// Show immediately when `None`
    pub fire_at: Option<i64>,
}

/// Repeated notifications about the same event share an id so that they
/// replace each other instead of stacking up.
pub fn change_notification_id(event_id: EventId) -> i32 {
    (event_id.rem_euclid(CHANGE_NOTIFICATION_ID_SPACE) as i32) + CHANGE_NOTIFICATION_ID_OFFSET
}

const UNKNOWN_TIME: &str = "unknown time";

/// Whether `ts` falls into the range of dates that can be rendered
pub(crate) fn is_representable(ts: i64) -> bool {
    Utc.timestamp_millis_opt(ts).single().is_some()
}

fn local_time(ts: i64, tz: &Tz) -> Option<DateTime<Tz>> {
    tz.timestamp_millis_opt(ts).single()
}

/// `HH:MM` in the given timezone
pub fn format_time(ts: i64, tz: &Tz) -> String {
    match local_time(ts, tz) {
        Some(time) => time.format("%H:%M").to_string(),
        None => UNKNOWN_TIME.to_string(),
    }
}

/// `Mon 10.3. 18:30` in the given timezone
pub fn format_date_time(ts: i64, tz: &Tz) -> String {
    match local_time(ts, tz) {
        Some(time) => time.format("%a %-d.%-m. %H:%M").to_string(),
        None => UNKNOWN_TIME.to_string(),
    }
}

pub(crate) fn same_day(ts1: i64, ts2: i64, tz: &Tz) -> bool {
    match (local_time(ts1, tz), local_time(ts2, tz)) {
        (Some(t1), Some(t2)) => t1.naive_local().date() == t2.naive_local().date(),
        _ => false,
    }
}
