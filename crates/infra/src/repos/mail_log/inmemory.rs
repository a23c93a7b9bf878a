use super::IMailLogRepo;
use crate::repos::shared::inmemory_repo::*;
use event_mailer_domain::{MailLogEntry, ID};

pub struct InMemoryMailLogRepo {
    entries: std::sync::Mutex<Vec<MailLogEntry>>,
}

impl InMemoryMailLogRepo {
    pub fn new() -> Self {
        Self {
            entries: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IMailLogRepo for InMemoryMailLogRepo {
    async fn insert(&self, entry: &MailLogEntry) -> anyhow::Result<()> {
        insert(entry, &self.entries);
        Ok(())
    }

    async fn find_by_event(&self, event_id: &ID) -> Vec<MailLogEntry> {
        let mut entries = find_by(&self.entries, |entry| entry.event_id == *event_id);
        entries.sort_by(|a, b| b.created.cmp(&a.created));
        entries
    }
}
