use crate::{error::EventWatchError, shared::usecase::UseCase};
use event_watch_domain::{NotificationRule, ID};
use event_watch_infra::WatchContext;

#[derive(Debug)]
pub struct RemoveRuleUseCase {
    pub rule_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for EventWatchError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(rule_id) => Self::NotFound(format!(
                "The notification rule with id: {}, was not found.",
                rule_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait]
impl UseCase for RemoveRuleUseCase {
    type Response = NotificationRule;

    type Error = UseCaseError;

    const NAME: &'static str = "RemoveRule";

    async fn execute(&mut self, ctx: &WatchContext) -> Result<Self::Response, Self::Error> {
        match ctx.repos.rules.remove_rule(&self.rule_id).await {
            Ok(Some(rule)) => Ok(rule),
            Ok(None) => Err(UseCaseError::NotFound(self.rule_id.clone())),
            Err(_) => Err(UseCaseError::StorageError),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_utils::{setup, DAY};

    #[tokio::test]
    async fn removes_rule() {
        let t = setup(DAY);
        let rules = t.ctx.repos.rules.load_rules().await;

        let mut usecase = RemoveRuleUseCase {
            rule_id: rules[0].id.clone(),
        };
        let removed = usecase.execute(&t.ctx).await.unwrap();
        assert_eq!(removed, rules[0]);

        let remaining = t.ctx.repos.rules.load_rules().await;
        assert_eq!(remaining, vec![rules[1].clone()]);
    }

    #[tokio::test]
    async fn unknown_rule_is_not_found() {
        let t = setup(DAY);
        let mut usecase = RemoveRuleUseCase { rule_id: ID::new() };
        let res = usecase.execute(&t.ctx).await;
        assert!(matches!(res, Err(UseCaseError::NotFound(_))));
    }
}
