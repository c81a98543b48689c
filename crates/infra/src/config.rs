use chrono_tz::Tz;
use event_watch_domain::CurrentUser;
use std::{fmt::Display, ops::RangeInclusive, path::PathBuf, str::FromStr};
use tracing::{info, warn};

/// One second up to a week
const POLL_INTERVAL_SECS_RANGE: RangeInclusive<u64> = 1..=60 * 60 * 24 * 7;
const LOOKAHEAD_DAYS_RANGE: RangeInclusive<i64> = 1..=365;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreConfig {
    InMemory,
    /// Directory the JSON files are kept in
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreConfig,
    /// JSON file the event source reads from
    pub events_file: PathBuf,
    /// Seconds between two detection and scheduling passes
    pub poll_interval_secs: u64,
    /// Timezone used to render times in notification texts
    pub timezone: Tz,
    /// How far back and ahead of now to ask the event source for events
    pub lookbehind_days: i64,
    pub lookahead_days: i64,
    /// Previously scheduled reminders are all cancelled before rescheduling
    /// when the last run is older than this.
    pub staleness_window_millis: i64,
    /// Signed in user. Registration changes are only detected when present.
    pub current_user: Option<CurrentUser>,
}

impl Config {
    /// Defaults overridden by the `EVENT_WATCH_*` environment variables
    pub fn new() -> Self {
        let defaults = Self::default();

        let store = match std::env::var("EVENT_WATCH_STORE") {
            Ok(store) if store == "inmemory" => {
                warn!("Using the in memory store, nothing will survive a restart.");
                StoreConfig::InMemory
            }
            _ => match std::env::var("EVENT_WATCH_STORE_DIR") {
                Ok(dir) => StoreConfig::File(dir.into()),
                Err(_) => defaults.store,
            },
        };

        let events_file = std::env::var("EVENT_WATCH_EVENTS_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.events_file);

        let timezone = match std::env::var("EVENT_WATCH_TIMEZONE") {
            Ok(tz) => match tz.parse::<Tz>() {
                Ok(tz) => tz,
                Err(_) => {
                    warn!(
                        "The given EVENT_WATCH_TIMEZONE: {} is not valid, falling back to: {:?}.",
                        tz, defaults.timezone
                    );
                    defaults.timezone
                }
            },
            Err(_) => defaults.timezone,
        };

        let current_user = match std::env::var("EVENT_WATCH_PERSON_ID") {
            Ok(person_id) if !person_id.trim().is_empty() => Some(CurrentUser {
                person_id: person_id.trim().to_string(),
                person_name: std::env::var("EVENT_WATCH_PERSON_NAME").ok(),
                couple_ids: std::env::var("EVENT_WATCH_COUPLE_IDS")
                    .map(|ids| parse_list(&ids))
                    .unwrap_or_default(),
            }),
            _ => {
                info!(
                    "Did not find EVENT_WATCH_PERSON_ID environment variable. \
                     Registration changes will not be detected."
                );
                None
            }
        };

        let poll_interval_secs = env_in_range(
            "EVENT_WATCH_POLL_INTERVAL_SECS",
            defaults.poll_interval_secs,
            POLL_INTERVAL_SECS_RANGE,
        );
        let lookahead_days = env_in_range(
            "EVENT_WATCH_LOOKAHEAD_DAYS",
            defaults.lookahead_days,
            LOOKAHEAD_DAYS_RANGE,
        );

        Self {
            store,
            events_file,
            poll_interval_secs,
            timezone,
            lookbehind_days: defaults.lookbehind_days,
            lookahead_days,
            staleness_window_millis: defaults.staleness_window_millis,
            current_user,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::File(".event-watch".into()),
            events_file: "events.json".into(),
            poll_interval_secs: 60 * 60,
            timezone: Tz::UTC,
            lookbehind_days: 1,
            lookahead_days: 14,
            staleness_window_millis: 1000 * 60 * 5, // 5 minutes
            current_user: None,
        }
    }
}

fn env_in_range<T>(name: &str, default: T, range: RangeInclusive<T>) -> T
where
    T: FromStr + Display + PartialOrd,
{
    match std::env::var(name) {
        Ok(value) => parse_in_range(name, &value, default, range),
        Err(_) => default,
    }
}

fn parse_in_range<T>(name: &str, value: &str, default: T, range: RangeInclusive<T>) -> T
where
    T: FromStr + Display + PartialOrd,
{
    match value.trim().parse::<T>() {
        Ok(parsed) if range.contains(&parsed) => parsed,
        Ok(parsed) => {
            warn!(
                "The given {}: {} is not between {} and {}, falling back to the default: {}.",
                name,
                parsed,
                range.start(),
                range.end(),
                default
            );
            default
        }
        Err(_) => {
            warn!(
                "The given {}: {} is not valid, falling back to the default: {}.",
                name, value, default
            );
            default
        }
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
