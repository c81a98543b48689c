use crate::event_instance::{EventId, EventInstance, Registration, Trainer};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Minimal state of an `EventInstance` as it was observed on the previous poll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSnapshot {
    pub id: EventId,
    pub since: Option<i64>,
    pub until: Option<i64>,
    #[serde(default)]
    pub location_text: String,
    #[serde(default)]
    pub is_cancelled: bool,
    /// JSON encoded sorted list of trainer names
    #[serde(default)]
    pub trainers_fingerprint: String,
    #[serde(default)]
    pub registrations_fingerprint: BTreeSet<String>,
}

/// Registration keys that belonged to a user on a previous run. Kept so that
/// an unregistration is noticed even when the user no longer appears in any
/// fetched registration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserKeys {
    pub person_id: String,
    #[serde(default)]
    pub keys: BTreeSet<String>,
}

/// Everything change detection remembers between runs. Replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotState {
    #[serde(default)]
    pub snapshots: Vec<EventSnapshot>,
    #[serde(default)]
    pub user_keys: Option<UserKeys>,
}

impl SnapshotState {
    /// Later snapshots for the same id win
    pub fn by_id(&self) -> HashMap<EventId, &EventSnapshot> {
        self.snapshots.iter().map(|s| (s.id, s)).collect()
    }
}

impl EventSnapshot {
    pub fn from_event(event: &EventInstance) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: event.id,
            since: event.since,
            until: event.until,
            location_text: event.location_text.clone(),
            is_cancelled: event.is_cancelled,
            trainers_fingerprint: trainers_fingerprint(&event.trainers)?,
            registrations_fingerprint: registrations_fingerprint(&event.registrations),
        })
    }
}

pub fn trainers_fingerprint(trainers: &[Trainer]) -> Result<String, serde_json::Error> {
    let names = trainers
        .iter()
        .map(|t| t.name.trim())
        .sorted()
        .collect::<Vec<_>>();
    serde_json::to_string(&names)
}

pub fn registrations_fingerprint(registrations: &[Registration]) -> BTreeSet<String> {
    registrations.iter().filter_map(Registration::key).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::event_instance::Person;

    fn person_reg(name: &str) -> Registration {
        Registration::Person(Person {
            id: name.to_lowercase(),
            name: name.into(),
            surname: String::new(),
        })
    }

    fn trainer(name: &str) -> Trainer {
        Trainer {
            id: name.to_lowercase(),
            name: name.into(),
        }
    }

    #[test]
    fn registration_fingerprint_is_order_independent() {
        let a = registrations_fingerprint(&[person_reg("Alice"), person_reg("Bob")]);
        let b = registrations_fingerprint(&[person_reg("Bob"), person_reg("Alice")]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn registration_fingerprint_drops_blank_keys() {
        let fp = registrations_fingerprint(&[person_reg(" "), person_reg("Alice")]);
        assert_eq!(fp.into_iter().collect::<Vec<_>>(), vec!["p:Alice".to_string()]);
    }

    #[test]
    fn trainer_fingerprint_is_sorted_json() {
        let a = trainers_fingerprint(&[trainer("Zed"), trainer("Anna")]).unwrap();
        let b = trainers_fingerprint(&[trainer("Anna"), trainer("Zed")]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, r#"["Anna","Zed"]"#);
        assert_eq!(trainers_fingerprint(&[]).unwrap(), "[]");
    }

    #[test]
    fn lookup_by_id_keeps_last_duplicate() {
        let snapshot = |location: &str| EventSnapshot {
            id: 1,
            since: None,
            until: None,
            location_text: location.into(),
            is_cancelled: false,
            trainers_fingerprint: "[]".into(),
            registrations_fingerprint: Default::default(),
        };
        let state = SnapshotState {
            snapshots: vec![snapshot("A"), snapshot("B")],
            user_keys: None,
        };
        let map = state.by_id();
        assert_eq!(map.len(), 1);
        assert_eq!(map[&1].location_text, "B");
    }
}
