use event_watch_domain::{EventId, EventInstance, Person, Registration, Trainer};
use event_watch_infra::{
    Config, InMemoryCurrentUserProvider, InMemoryEventSource, InMemoryKeyValueStore,
    InMemoryNotificationSink, Repos, Services, StaticTimeSys, WatchContext,
};
use std::sync::Arc;

// Mon Mar 01 2021 00:00:00 UTC
pub const DAY: i64 = 1614556800000;
pub const MINUTE: i64 = 1000 * 60;
pub const HOUR: i64 = 60 * MINUTE;

pub struct TestContext {
    pub ctx: WatchContext,
    pub store: Arc<InMemoryKeyValueStore>,
    pub sink: Arc<InMemoryNotificationSink>,
    pub source: Arc<InMemoryEventSource>,
    pub user: Arc<InMemoryCurrentUserProvider>,
    pub sys: Arc<StaticTimeSys>,
}

pub fn setup(now: i64) -> TestContext {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let sink = Arc::new(InMemoryNotificationSink::new());
    let source = Arc::new(InMemoryEventSource::new(Vec::new()));
    let user = Arc::new(InMemoryCurrentUserProvider::new(None));
    let sys = Arc::new(StaticTimeSys::new(now));

    let ctx = WatchContext {
        repos: Repos::create(store.clone()),
        services: Services {
            event_source: source.clone(),
            current_user: user.clone(),
            notifications: sink.clone(),
        },
        config: Config::default(),
        sys: sys.clone(),
    };

    TestContext {
        ctx,
        store,
        sink,
        source,
        user,
        sys,
    }
}

pub fn lesson(id: EventId, since: i64) -> EventInstance {
    EventInstance {
        id,
        name: format!("Lesson {}", id),
        event_type: "LESSON".into(),
        is_cancelled: false,
        since: Some(since),
        until: Some(since + HOUR),
        location_text: "Hall A".into(),
        trainers: vec![Trainer {
            id: "t1".into(),
            name: "Trainer One".into(),
        }],
        registrations: Vec::new(),
    }
}

pub fn person(id: &str, name: &str) -> Registration {
    Registration::Person(Person {
        id: id.into(),
        name: name.into(),
        surname: name.split_whitespace().last().unwrap_or_default().into(),
    })
}
