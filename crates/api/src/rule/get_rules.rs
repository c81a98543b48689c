use crate::shared::usecase::UseCase;
use event_watch_domain::NotificationRule;
use event_watch_infra::WatchContext;

/// The ordered rule list, with the default rules when none are configured
#[derive(Debug)]
pub struct GetRulesUseCase {}

#[derive(Debug)]
pub enum UseCaseErrors {}

#[async_trait::async_trait]
impl UseCase for GetRulesUseCase {
    type Response = Vec<NotificationRule>;

    type Error = UseCaseErrors;

    const NAME: &'static str = "GetRules";

    async fn execute(&mut self, ctx: &WatchContext) -> Result<Self::Response, Self::Error> {
        Ok(ctx.repos.rules.load_rules().await)
    }
}
