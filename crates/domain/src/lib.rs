mod change;
mod current_user;
mod event_instance;
mod notification;
mod reminder;
mod rule;
mod shared;
mod snapshot;
mod timespan;

pub use change::{detect_changes, ChangeDetection, ChangeNotification, DetectError};
pub use current_user::CurrentUser;
pub use event_instance::{Couple, EventId, EventInstance, Person, Registration, Trainer};
pub use notification::{
    change_notification_id, format_time, NotificationChannel, NotificationRequest,
    CHANGE_NOTIFICATION_ID_OFFSET, REMINDER_NOTIFICATION_ID_OFFSET,
};
pub use reminder::{
    lead_time_label, plan_reminders, PlannedReminder, ScheduledNotification,
    ScheduledNotificationsState,
};
pub use rule::{should_notify, NotificationRule, RuleValidationError};
pub use shared::entity::{InvalidIDError, ID};
pub use snapshot::{
    registrations_fingerprint, trainers_fingerprint, EventSnapshot, SnapshotState, UserKeys,
};
pub use timespan::TimeSpan;
