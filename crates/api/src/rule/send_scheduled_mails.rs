use super::resolve_send_time;
use crate::shared::usecase::UseCase;
use event_mailer_domain::{rule_recipients, ScheduledMail, ID};
use event_mailer_infra::{
    mail::{compose_mail, mail_send},
    MailerContext,
};
use std::collections::HashMap;
use tracing::{error, info, warn};

/// Sends every unsent `ScheduledMail` whose send time has passed.
///
/// A mail is marked as sent before it is handed to the mail backend. Marking
/// is a compare-and-set, so concurrent runs never send the same mail twice,
/// and a mail that fails to send is not retried.
#[derive(Debug)]
pub struct SendScheduledMailsUseCase;

#[derive(Debug)]
pub enum UseCaseError {}

#[derive(Debug, Default, PartialEq)]
pub struct DispatchReport {
    /// Scheduled mails that were due and claimed by this run
    pub scheduled_mails: usize,
    /// Mails accepted by the mail backend
    pub sent_mails: usize,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendScheduledMailsUseCase {
    type Response = DispatchReport;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &MailerContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.now();
        let mut report = DispatchReport::default();

        let mut mails_by_rule: HashMap<ID, Vec<ScheduledMail>> = HashMap::new();
        for mail in ctx.repos.scheduled_mails.find_unsent().await {
            mails_by_rule
                .entry(mail.rule_id.clone())
                .or_default()
                .push(mail);
        }

        for (rule_id, mails) in mails_by_rule {
            let rule = match ctx.repos.rules.find(&rule_id).await {
                Some(rule) => rule,
                None => {
                    warn!("Scheduled mails refer to the unknown rule {}", rule_id);
                    continue;
                }
            };
            let event = match ctx.repos.events.find(&rule.event_id).await {
                Some(event) => event,
                None => {
                    warn!("Rule {} refers to the unknown event {}", rule.id, rule.event_id);
                    continue;
                }
            };
            let subevents = ctx.repos.subevents.find_by_event(&event.id).await;

            let due = mails
                .into_iter()
                .filter(|mail| match resolve_send_time(&rule, mail, &event, &subevents) {
                    Some(send_at) => send_at <= now,
                    None => false,
                })
                .collect::<Vec<_>>();
            if due.is_empty() {
                continue;
            }

            // Nothing is claimed when the orders can not be read, so the
            // mails are picked up again by the next run
            let orders = match ctx.repos.orders.find_by_event(&event.id).await {
                Ok(orders) => orders,
                Err(e) => {
                    error!("Unable to load the orders of event {}: {:?}", event.id, e);
                    continue;
                }
            };
            for mail in due {
                match ctx.repos.scheduled_mails.mark_sent(&mail.id).await {
                    Ok(true) => (),
                    // Claimed by another run
                    Ok(false) => continue,
                    Err(e) => {
                        error!("Unable to mark scheduled mail {} as sent: {:?}", mail.id, e);
                        continue;
                    }
                }
                report.scheduled_mails += 1;

                let recipients = rule_recipients(&rule, &orders, mail.subevent_id.as_ref());
                for recipient in &recipients {
                    let outgoing = compose_mail(
                        &event,
                        recipient,
                        &rule.subject,
                        &rule.template,
                        &ctx.config.mail_from,
                    );
                    if mail_send(ctx.mail_backend.as_ref(), &outgoing).await {
                        report.sent_mails += 1;
                    }
                }
                info!(
                    "Scheduled mail {} of rule {} sent to {} recipients",
                    mail.id,
                    rule.id,
                    recipients.len()
                );
            }
        }

        Ok(report)
    }
}
