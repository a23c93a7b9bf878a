use super::IScheduledMailRepo;
use crate::repos::shared::{inmemory_repo::*, repo::DeleteResult};
use event_mailer_domain::{ScheduledMail, ID};

pub struct InMemoryScheduledMailRepo {
    scheduled_mails: std::sync::Mutex<Vec<ScheduledMail>>,
}

impl InMemoryScheduledMailRepo {
    pub fn new() -> Self {
        Self {
            scheduled_mails: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IScheduledMailRepo for InMemoryScheduledMailRepo {
    async fn bulk_insert(&self, mails: &[ScheduledMail]) -> anyhow::Result<()> {
        let mut scheduled_mails = self.scheduled_mails.lock().unwrap();
        // Same uniqueness as the (rule, subevent) index, all or nothing
        for (i, mail) in mails.iter().enumerate() {
            let taken = scheduled_mails
                .iter()
                .chain(&mails[..i])
                .any(|m| m.rule_id == mail.rule_id && m.subevent_id == mail.subevent_id);
            if taken {
                return Err(anyhow::anyhow!(
                    "Rule {} already has a scheduled mail for {:?}",
                    mail.rule_id,
                    mail.subevent_id
                ));
            }
        }
        scheduled_mails.extend_from_slice(mails);
        Ok(())
    }

    async fn find_by_rule(&self, rule_id: &ID) -> Vec<ScheduledMail> {
        find_by(&self.scheduled_mails, |mail| mail.rule_id == *rule_id)
    }

    async fn find_unsent(&self) -> Vec<ScheduledMail> {
        find_by(&self.scheduled_mails, |mail| !mail.sent)
    }

    async fn mark_sent(&self, mail_id: &ID) -> anyhow::Result<bool> {
        let updated = update_many(
            &self.scheduled_mails,
            |mail| mail.id == *mail_id && !mail.sent,
            |mail| {
                mail.mark_sent();
            },
        );
        Ok(updated > 0)
    }

    async fn delete_by_rule(&self, rule_id: &ID) -> anyhow::Result<DeleteResult> {
        Ok(delete_by(&self.scheduled_mails, |mail| {
            mail.rule_id == *rule_id
        }))
    }
}
