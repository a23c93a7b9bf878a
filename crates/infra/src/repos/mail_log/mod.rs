mod inmemory;
mod postgres;

pub use inmemory::InMemoryMailLogRepo;
pub use postgres::PostgresMailLogRepo;

use event_mailer_domain::{MailLogEntry, ID};

#[async_trait::async_trait]
pub trait IMailLogRepo: Send + Sync {
    async fn insert(&self, entry: &MailLogEntry) -> anyhow::Result<()>;
    /// Newest entries first
    async fn find_by_event(&self, event_id: &ID) -> Vec<MailLogEntry>;
}
