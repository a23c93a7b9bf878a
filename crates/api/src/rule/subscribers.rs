use super::{
    create_rule::CreateRuleUseCase, sync_scheduled_mails::SyncScheduledMailsUseCase,
    update_rule::UpdateRuleUseCase,
};
use crate::shared::usecase::{execute, Subscriber};
use event_mailer_domain::Rule;
use event_mailer_infra::MailerContext;

pub struct CreateScheduledMailsOnRuleCreated;

#[async_trait::async_trait(?Send)]
impl Subscriber<CreateRuleUseCase> for CreateScheduledMailsOnRuleCreated {
    async fn notify(&self, rule: &Rule, ctx: &MailerContext) {
        let sync_scheduled_mails = SyncScheduledMailsUseCase { rule };

        // Sideeffect, ignore result
        let _ = execute(sync_scheduled_mails, ctx).await;
    }
}

pub struct SyncScheduledMailsOnRuleUpdated;

#[async_trait::async_trait(?Send)]
impl Subscriber<UpdateRuleUseCase> for SyncScheduledMailsOnRuleUpdated {
    async fn notify(&self, rule: &Rule, ctx: &MailerContext) {
        let sync_scheduled_mails = SyncScheduledMailsUseCase { rule };

        // Sideeffect, ignore result
        let _ = execute(sync_scheduled_mails, ctx).await;
    }
}
