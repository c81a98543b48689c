use crate::event_instance::{couple_key, person_key, EventInstance, Registration};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The signed in user as exposed by the identity provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub person_id: String,
    /// Used when the person does not appear in any fetched registration
    #[serde(default)]
    pub person_name: Option<String>,
    #[serde(default)]
    pub couple_ids: Vec<String>,
}

impl CurrentUser {
    /// Resolves the user's identities into the keys used by registration
    /// fingerprints by looking them up in the fetched registrations.
    pub fn registration_keys(&self, events: &[EventInstance]) -> BTreeSet<String> {
        let mut keys = BTreeSet::new();

        for registration in events.iter().flat_map(|e| e.registrations.iter()) {
            let key = match registration {
                Registration::Person(person) if person.id == self.person_id => {
                    person_key(&person.name)
                }
                Registration::Couple(couple) if self.couple_ids.contains(&couple.id) => {
                    couple_key(&couple.man.surname, &couple.woman.surname)
                }
                _ => None,
            };
            keys.extend(key);
        }

        if let Some(name) = &self.person_name {
            keys.extend(person_key(name));
        }

        keys
    }
}
