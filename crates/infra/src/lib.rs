mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, StoreConfig};
pub use repos::{
    FileKeyValueStore, IKeyValueStore, IRuleRepo, IScheduledNotificationRepo, ISnapshotRepo,
    InMemoryKeyValueStore, Repos,
};
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};

#[derive(Clone)]
pub struct WatchContext {
    pub repos: Repos,
    pub services: Services,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
}

impl WatchContext {
    /// Context without any durable state, showing notifications only in the log
    pub fn create_inmemory() -> Self {
        let config = Config::default();
        Self {
            repos: Repos::create_inmemory(),
            services: Services {
                event_source: Arc::new(InMemoryEventSource::new(Vec::new())),
                current_user: Arc::new(InMemoryCurrentUserProvider::new(None)),
                notifications: Arc::new(LogNotificationSink {}),
            },
            config,
            sys: Arc::new(RealSys {}),
        }
    }

    fn create(config: Config) -> Self {
        let repos = match &config.store {
            StoreConfig::InMemory => Repos::create_inmemory(),
            StoreConfig::File(dir) => Repos::create_file(dir),
        };
        let services = Services {
            event_source: Arc::new(FileEventSource::new(config.events_file.clone())),
            current_user: Arc::new(InMemoryCurrentUserProvider::new(config.current_user.clone())),
            notifications: Arc::new(LogNotificationSink {}),
        };
        Self {
            repos,
            services,
            config,
            sys: Arc::new(RealSys {}),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub fn setup_context() -> WatchContext {
    WatchContext::create(Config::new())
}
