mod inmemory;
mod postgres;

pub use inmemory::InMemoryScheduledMailRepo;
pub use postgres::PostgresScheduledMailRepo;

use crate::repos::shared::repo::DeleteResult;
use event_mailer_domain::{ScheduledMail, ID};

#[async_trait::async_trait]
pub trait IScheduledMailRepo: Send + Sync {
    async fn bulk_insert(&self, mails: &[ScheduledMail]) -> anyhow::Result<()>;
    async fn find_by_rule(&self, rule_id: &ID) -> Vec<ScheduledMail>;
    async fn find_unsent(&self) -> Vec<ScheduledMail>;
    /// Flips `sent` from false to true. Returns false if the mail was
    /// already sent or does not exist, so only one caller can claim a mail.
    async fn mark_sent(&self, mail_id: &ID) -> anyhow::Result<bool>;
    async fn delete_by_rule(&self, rule_id: &ID) -> anyhow::Result<DeleteResult>;
}
