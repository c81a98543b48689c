use event_watch_domain::CurrentUser;
use std::sync::Mutex;

#[async_trait::async_trait]
pub trait ICurrentUserProvider: Send + Sync {
    /// `None` when nobody is signed in
    async fn current_user(&self) -> anyhow::Result<Option<CurrentUser>>;
}

pub struct InMemoryCurrentUserProvider {
    user: Mutex<Option<CurrentUser>>,
}

impl InMemoryCurrentUserProvider {
    pub fn new(user: Option<CurrentUser>) -> Self {
        Self {
            user: Mutex::new(user),
        }
    }

    pub fn set_user(&self, user: Option<CurrentUser>) {
        *self.user.lock().unwrap() = user;
    }
}

#[async_trait::async_trait]
impl ICurrentUserProvider for InMemoryCurrentUserProvider {
    async fn current_user(&self) -> anyhow::Result<Option<CurrentUser>> {
        Ok(self.user.lock().unwrap().clone())
    }
}
