use crate::{
    current_user::CurrentUser,
    event_instance::{EventId, EventInstance},
    notification::{
        change_notification_id, format_date_time, format_time, same_day, NotificationChannel,
        NotificationRequest,
    },
    rule::{should_notify, NotificationRule},
    snapshot::{EventSnapshot, SnapshotState, UserKeys},
};
use chrono_tz::Tz;
use std::collections::BTreeSet;
use thiserror::Error;

/// A change to an event that the user should hear about right away
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeNotification {
    EventCancelled {
        event_id: EventId,
        name: String,
        since: Option<i64>,
        location_text: String,
    },
    TimeChanged {
        event_id: EventId,
        name: String,
        old_since: Option<i64>,
        old_until: Option<i64>,
        new_since: Option<i64>,
        new_until: Option<i64>,
    },
    LocationChanged {
        event_id: EventId,
        name: String,
        new_location: String,
    },
    /// Trainers of the event changed
    DetailsChanged { event_id: EventId, name: String },
    YouWereRegistered {
        event_id: EventId,
        name: String,
        since: Option<i64>,
    },
    YouWereUnregistered {
        event_id: EventId,
        name: String,
        since: Option<i64>,
    },
}

#[derive(Error, Debug)]
pub enum DetectError {
    #[error("Event {event_id} ends before it starts")]
    InvalidTimeRange { event_id: EventId },
    #[error("Event {event_id} has a start or end outside of the supported date range")]
    TimeOutOfRange { event_id: EventId },
    #[error("Unable to fingerprint event {event_id}: {source}")]
    Fingerprint {
        event_id: EventId,
        #[source]
        source: serde_json::Error,
    },
}

impl DetectError {
    pub fn event_id(&self) -> EventId {
        match self {
            Self::InvalidTimeRange { event_id }
            | Self::TimeOutOfRange { event_id }
            | Self::Fingerprint { event_id, .. } => *event_id,
        }
    }
}

/// Result of comparing a fetched event list against the previous snapshots
#[derive(Debug, Default)]
pub struct ChangeDetection {
    pub notifications: Vec<ChangeNotification>,
    /// Replaces the previous state as a whole
    pub state: SnapshotState,
    /// Events that could not be processed. Their previous snapshot, if any,
    /// is kept in `state` so the next valid observation is compared to it.
    pub failures: Vec<DetectError>,
}

/// Diffs `current` against `previous`. A failing event never stops the
/// remaining events from being processed.
pub fn detect_changes(
    current: &[EventInstance],
    previous: &SnapshotState,
    user: Option<&CurrentUser>,
    rules: &[NotificationRule],
) -> ChangeDetection {
    let previous_by_id = previous.by_id();
    let user_keys = match user {
        Some(user) => Some(resolve_user_keys(current, previous.user_keys.as_ref(), user)),
        None => previous.user_keys.clone(),
    };
    let no_keys = BTreeSet::new();
    let my_keys = match (user, &user_keys) {
        (Some(_), Some(user_keys)) => &user_keys.keys,
        _ => &no_keys,
    };

    let mut detection = ChangeDetection::default();
    for event in current.iter().filter(|e| e.since.is_some()) {
        let previous = previous_by_id.get(&event.id).copied();
        match detect_event_changes(event, previous, my_keys, rules) {
            Ok((snapshot, mut changes)) => {
                detection.state.snapshots.push(snapshot);
                detection.notifications.append(&mut changes);
            }
            Err(e) => {
                detection.state.snapshots.extend(previous.cloned());
                detection.failures.push(e);
            }
        }
    }
    detection.state.user_keys = user_keys;

    detection
}

/// Keys of `user` found in `current`, plus the keys remembered for the same
/// person from earlier runs
fn resolve_user_keys(
    current: &[EventInstance],
    remembered: Option<&UserKeys>,
    user: &CurrentUser,
) -> UserKeys {
    let mut keys = user.registration_keys(current);
    if let Some(remembered) = remembered.filter(|r| r.person_id == user.person_id) {
        keys.extend(remembered.keys.iter().cloned());
    }
    UserKeys {
        person_id: user.person_id.clone(),
        keys,
    }
}

fn detect_event_changes(
    event: &EventInstance,
    previous: Option<&EventSnapshot>,
    my_keys: &BTreeSet<String>,
    rules: &[NotificationRule],
) -> Result<(EventSnapshot, Vec<ChangeNotification>), DetectError> {
    if event.has_times_out_of_range() {
        return Err(DetectError::TimeOutOfRange { event_id: event.id });
    }
    if let (Some(since), Some(until)) = (event.since, event.until) {
        if until < since {
            return Err(DetectError::InvalidTimeRange { event_id: event.id });
        }
    }

    let snapshot = EventSnapshot::from_event(event).map_err(|source| DetectError::Fingerprint {
        event_id: event.id,
        source,
    })?;

    // First sighting is the baseline, not a change
    let previous = match previous {
        Some(previous) => previous,
        None => return Ok((snapshot, Vec::new())),
    };

    let mut changes = Vec::new();
    if let Some(change) = detect_field_change(event, &snapshot, previous) {
        if should_notify(rules, &event.event_type, &event.trainer_ids()) {
            changes.push(change);
        }
    }
    if let Some(change) = detect_registration_change(event, &snapshot, previous, my_keys) {
        changes.push(change);
    }

    Ok((snapshot, changes))
}

/// At most one change per event, checked in order of importance
fn detect_field_change(
    event: &EventInstance,
    current: &EventSnapshot,
    previous: &EventSnapshot,
) -> Option<ChangeNotification> {
    let event_id = event.id;
    let name = event.name.clone();

    if current.is_cancelled {
        if previous.is_cancelled {
            return None;
        }
        return Some(ChangeNotification::EventCancelled {
            event_id,
            name,
            since: current.since,
            location_text: current.location_text.clone(),
        });
    }

    if current.since != previous.since || current.until != previous.until {
        Some(ChangeNotification::TimeChanged {
            event_id,
            name,
            old_since: previous.since,
            old_until: previous.until,
            new_since: current.since,
            new_until: current.until,
        })
    } else if current.location_text != previous.location_text {
        Some(ChangeNotification::LocationChanged {
            event_id,
            name,
            new_location: current.location_text.clone(),
        })
    } else if current.trainers_fingerprint != previous.trainers_fingerprint {
        Some(ChangeNotification::DetailsChanged { event_id, name })
    } else {
        None
    }
}

/// Only about the current user, so category filters do not apply here
fn detect_registration_change(
    event: &EventInstance,
    current: &EventSnapshot,
    previous: &EventSnapshot,
    my_keys: &BTreeSet<String>,
) -> Option<ChangeNotification> {
    if my_keys.is_empty() {
        return None;
    }

    let current_regs = &current.registrations_fingerprint;
    let previous_regs = &previous.registrations_fingerprint;
    let was_added = current_regs
        .difference(previous_regs)
        .any(|key| my_keys.contains(key));
    let was_removed = previous_regs
        .difference(current_regs)
        .any(|key| my_keys.contains(key));

    if was_added {
        Some(ChangeNotification::YouWereRegistered {
            event_id: event.id,
            name: event.name.clone(),
            since: event.since,
        })
    } else if was_removed {
        Some(ChangeNotification::YouWereUnregistered {
            event_id: event.id,
            name: event.name.clone(),
            since: event.since,
        })
    } else {
        None
    }
}

impl ChangeNotification {
    pub fn event_id(&self) -> EventId {
        match self {
            Self::EventCancelled { event_id, .. }
            | Self::TimeChanged { event_id, .. }
            | Self::LocationChanged { event_id, .. }
            | Self::DetailsChanged { event_id, .. }
            | Self::YouWereRegistered { event_id, .. }
            | Self::YouWereUnregistered { event_id, .. } => *event_id,
        }
    }

    pub fn event_name(&self) -> &str {
        match self {
            Self::EventCancelled { name, .. }
            | Self::TimeChanged { name, .. }
            | Self::LocationChanged { name, .. }
            | Self::DetailsChanged { name, .. }
            | Self::YouWereRegistered { name, .. }
            | Self::YouWereUnregistered { name, .. } => name,
        }
    }

    pub fn notification_id(&self) -> i32 {
        change_notification_id(self.event_id())
    }

    pub fn body(&self, tz: &Tz) -> String {
        let when = |ts: &Option<i64>| match ts {
            Some(ts) => format_date_time(*ts, tz),
            None => "unknown time".to_string(),
        };

        match self {
            Self::EventCancelled {
                since,
                location_text,
                ..
            } => {
                if location_text.trim().is_empty() {
                    format!("Cancelled: {}", when(since))
                } else {
                    format!("Cancelled: {}, {}", when(since), location_text.trim())
                }
            }
            Self::TimeChanged {
                old_since,
                old_until,
                new_since,
                new_until,
                ..
            } => format!(
                "Time changed: {} -> {}",
                format_range(*old_since, *old_until, tz),
                format_range(*new_since, *new_until, tz)
            ),
            Self::LocationChanged { new_location, .. } => {
                format!("New location: {}", new_location.trim())
            }
            Self::DetailsChanged { .. } => "Trainer changed".to_string(),
            Self::YouWereRegistered { since, .. } => {
                format!("You were registered ({})", when(since))
            }
            Self::YouWereUnregistered { since, .. } => {
                format!("You were unregistered ({})", when(since))
            }
        }
    }

    pub fn to_request(&self, tz: &Tz) -> NotificationRequest {
        NotificationRequest {
            id: self.notification_id(),
            channel: NotificationChannel::Changes,
            title: self.event_name().to_string(),
            body: self.body(tz),
            fire_at: None,
        }
    }
}

fn format_range(since: Option<i64>, until: Option<i64>, tz: &Tz) -> String {
    match (since, until) {
        (Some(since), Some(until)) if same_day(since, until, tz) => {
            format!("{}-{}", format_date_time(since, tz), format_time(until, tz))
        }
        (Some(since), Some(until)) => {
            format!("{}-{}", format_date_time(since, tz), format_date_time(until, tz))
        }
        (Some(since), None) => format_date_time(since, tz),
        (None, _) => "unknown time".to_string(),
    }
}
