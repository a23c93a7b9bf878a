use super::{IMailBackend, OutgoingMail};
use std::sync::Mutex;
use tracing::info;

/// Keeps every mail in memory instead of delivering it
pub struct InMemoryMailBackend {
    outbox: Mutex<Vec<OutgoingMail>>,
}

impl InMemoryMailBackend {
    pub fn new() -> Self {
        Self {
            outbox: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.outbox.lock().unwrap().clone()
    }
}

impl Default for InMemoryMailBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IMailBackend for InMemoryMailBackend {
    async fn send(&self, mail: &OutgoingMail) -> anyhow::Result<()> {
        info!("Storing mail to {} in the in-memory outbox", mail.to);
        self.outbox.lock().unwrap().push(mail.clone());
        Ok(())
    }
}
