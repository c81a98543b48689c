use crate::{
    event_instance::{EventId, EventInstance},
    notification::{
        format_time, NotificationChannel, NotificationRequest, REMINDER_NOTIFICATION_ID_OFFSET,
    },
    rule::NotificationRule,
};
use chrono_tz::Tz;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A reminder that has been handed to the notification sink and is
/// expected to fire at `fire_at`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledNotification {
    pub notification_id: i32,
    pub event_id: EventId,
    pub fire_at: i64,
}

/// What the scheduler remembers between runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledNotificationsState {
    #[serde(default)]
    pub notifications: Vec<ScheduledNotification>,
    pub last_run: Option<i64>,
}

impl ScheduledNotificationsState {
    /// The previous run is older than the staleness window, or there was none
    pub fn is_stale(&self, now: i64, staleness_window_millis: i64) -> bool {
        match self.last_run {
            Some(last_run) => now - last_run > staleness_window_millis,
            None => true,
        }
    }

    pub fn ids(&self) -> Vec<i32> {
        self.notifications.iter().map(|n| n.notification_id).collect()
    }

    pub fn next_fire_at(&self) -> Option<i64> {
        self.notifications.iter().map(|n| n.fire_at).min()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedReminder {
    pub scheduled: ScheduledNotification,
    pub request: NotificationRequest,
}

/// "1 hour", "2 hours", "1 minute", "15 minutes"
pub fn lead_time_label(minutes_before: i64) -> String {
    let plural = |n: i64, unit: &str| {
        if n == 1 {
            format!("1 {}", unit)
        } else {
            format!("{} {}s", n, unit)
        }
    };
    if minutes_before > 0 && minutes_before % 60 == 0 {
        plural(minutes_before / 60, "hour")
    } else {
        plural(minutes_before, "minute")
    }
}

/// Computes the reminders for all upcoming events and matching rules.
///
/// Ids are handed out from `REMINDER_NOTIFICATION_ID_OFFSET` upwards in
/// order of event start, then rule order, so that the same input always
/// yields the same ids. Reminders that would fire at or before `now` are
/// skipped, as are duplicates for the same event and fire time. Events with
/// unrepresentable times and rules with invalid lead times are ignored.
pub fn plan_reminders(
    events: &[EventInstance],
    rules: &[NotificationRule],
    now: i64,
    tz: &Tz,
) -> Vec<PlannedReminder> {
    let mut seen = HashSet::new();
    let mut next_id = REMINDER_NOTIFICATION_ID_OFFSET;
    let mut planned = Vec::new();

    let upcoming = events
        .iter()
        .filter(|e| e.is_upcoming(now) && !e.has_times_out_of_range())
        .sorted_by_key(|e| (e.since, e.id));

    for event in upcoming {
        let since = match event.since {
            Some(since) => since,
            None => continue,
        };
        let trainer_ids = event.trainer_ids();

        for rule in rules.iter().filter(|r| r.matches(&event.event_type, &trainer_ids)) {
            let fire_at = match rule
                .lead_time_millis()
                .and_then(|lead| since.checked_sub(lead))
            {
                Some(fire_at) => fire_at,
                None => continue,
            };
            if fire_at <= now || !seen.insert((event.id, fire_at)) {
                continue;
            }

            let request = NotificationRequest {
                id: next_id,
                channel: NotificationChannel::Reminders,
                title: event.name.clone(),
                body: reminder_body(event, since, rule.minutes_before, tz),
                fire_at: Some(fire_at),
            };
            planned.push(PlannedReminder {
                scheduled: ScheduledNotification {
                    notification_id: next_id,
                    event_id: event.id,
                    fire_at,
                },
                request,
            });
            next_id += 1;
        }
    }

    planned
}

fn reminder_body(event: &EventInstance, since: i64, minutes_before: i64, tz: &Tz) -> String {
    let location = event.location_text.trim();
    let mut body = format!(
        "Starts in {} at {}",
        lead_time_label(minutes_before),
        format_time(since, tz)
    );
    if !location.is_empty() {
        body.push_str(", ");
        body.push_str(location);
    }
    body
}
