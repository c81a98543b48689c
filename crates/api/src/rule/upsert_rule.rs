use crate::{error::EventWatchError, shared::usecase::UseCase};
use event_watch_domain::{NotificationRule, RuleValidationError};
use event_watch_infra::WatchContext;

/// Replaces the rule with the same id, or appends it when it is new
#[derive(Debug)]
pub struct UpsertRuleUseCase {
    pub rule: NotificationRule,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidRule(RuleValidationError),
    StorageError,
}

impl From<UseCaseError> for EventWatchError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidRule(e) => Self::BadClientData(e.to_string()),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait]
impl UseCase for UpsertRuleUseCase {
    type Response = NotificationRule;

    type Error = UseCaseError;

    const NAME: &'static str = "UpsertRule";

    async fn execute(&mut self, ctx: &WatchContext) -> Result<Self::Response, Self::Error> {
        self.rule.validate().map_err(UseCaseError::InvalidRule)?;
        self.rule.name = self.rule.name.trim().to_string();

        ctx.repos
            .rules
            .upsert_rule(&self.rule)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(self.rule.clone())
    }
}
