pub mod schedule_reminders;
