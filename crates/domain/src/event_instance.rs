use crate::notification::is_representable;
use serde::{Deserialize, Serialize};

/// Identity of a single event instance as handed out by the event source
pub type EventId = i64;

/// Occurrence of an event, e.g. one lesson slot, as returned by the event source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInstance {
    pub id: EventId,
    pub name: String,
    /// Category of the event, e.g. "LESSON", "CAMP" or "HOLIDAY"
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub is_cancelled: bool,
    /// Start timestamp in millis
    pub since: Option<i64>,
    /// End timestamp in millis
    pub until: Option<i64>,
    #[serde(default)]
    pub location_text: String,
    #[serde(default)]
    pub trainers: Vec<Trainer>,
    #[serde(default)]
    pub registrations: Vec<Registration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trainer {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    /// Full display name
    pub name: String,
    #[serde(default)]
    pub surname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Couple {
    pub id: String,
    pub man: Person,
    pub woman: Person,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Registration {
    Person(Person),
    Couple(Couple),
}

impl Registration {
    /// Normalized key used in registration fingerprints.
    /// Returns `None` when the key would be blank.
    pub fn key(&self) -> Option<String> {
        match self {
            Registration::Person(person) => person_key(&person.name),
            Registration::Couple(couple) => couple_key(&couple.man.surname, &couple.woman.surname),
        }
    }
}

pub(crate) fn person_key(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(format!("p:{}", name))
    }
}

pub(crate) fn couple_key(man_surname: &str, woman_surname: &str) -> Option<String> {
    let names = format!("{} {}", man_surname.trim(), woman_surname.trim());
    let names = names.trim();
    if names.is_empty() {
        None
    } else {
        Some(format!("c:{}", names))
    }
}

impl EventInstance {
    pub fn trainer_ids(&self) -> Vec<&str> {
        self.trainers.iter().map(|t| t.id.as_str()).collect()
    }

    /// Not cancelled and starting strictly after `now`
    pub fn is_upcoming(&self, now: i64) -> bool {
        !self.is_cancelled && matches!(self.since, Some(since) if since > now)
    }

    /// A start or end that lies outside of any renderable date
    pub fn has_times_out_of_range(&self) -> bool {
        [self.since, self.until]
            .iter()
            .flatten()
            .any(|ts| !is_representable(*ts))
    }
}
