use super::IItemRepo;
use crate::repos::shared::inmemory_repo::*;
use event_mailer_domain::{Item, ID};

pub struct InMemoryItemRepo {
    items: std::sync::Mutex<Vec<Item>>,
}

impl InMemoryItemRepo {
    pub fn new() -> Self {
        Self {
            items: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IItemRepo for InMemoryItemRepo {
    async fn insert(&self, item: &Item) -> anyhow::Result<()> {
        insert(item, &self.items);
        Ok(())
    }

    async fn find_by_event(&self, event_id: &ID) -> Vec<Item> {
        find_by(&self.items, |item| item.event_id == *event_id)
    }
}
