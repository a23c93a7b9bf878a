use crate::shared::usecase::UseCase;
use event_mailer_domain::{Rule, ScheduledMail, ID};
use event_mailer_infra::MailerContext;
use tracing::error;

/// Makes sure there is one `ScheduledMail` per date of the event of the
/// `Rule`. Existing mails are never touched, so a mail that has been sent
/// stays sent.
#[derive(Debug)]
pub struct SyncScheduledMailsUseCase<'a> {
    pub rule: &'a Rule,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EventNotFound(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl<'a> UseCase for SyncScheduledMailsUseCase<'a> {
    /// The created mails
    type Response = Vec<ScheduledMail>;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &MailerContext) -> Result<Self::Response, Self::Errors> {
        let event = ctx
            .repos
            .events
            .find(&self.rule.event_id)
            .await
            .ok_or_else(|| UseCaseError::EventNotFound(self.rule.event_id.clone()))?;

        let targets = if event.has_subevents {
            ctx.repos
                .subevents
                .find_by_event(&event.id)
                .await
                .into_iter()
                .map(|subevent| Some(subevent.id))
                .collect::<Vec<_>>()
        } else {
            vec![None]
        };

        let existing = ctx.repos.scheduled_mails.find_by_rule(&self.rule.id).await;
        let missing = targets
            .into_iter()
            .filter(|target| !existing.iter().any(|mail| mail.subevent_id == *target))
            .map(|target| ScheduledMail::new(self.rule, target))
            .collect::<Vec<_>>();
        if missing.is_empty() {
            return Ok(missing);
        }

        ctx.repos
            .scheduled_mails
            .bulk_insert(&missing)
            .await
            .map_err(|e| {
                error!("Unable to store scheduled mails: {:?}", e);
                UseCaseError::StorageError
            })?;

        Ok(missing)
    }
}
