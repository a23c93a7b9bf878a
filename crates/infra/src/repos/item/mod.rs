mod inmemory;
mod postgres;

pub use inmemory::InMemoryItemRepo;
pub use postgres::PostgresItemRepo;

use event_mailer_domain::{Item, ID};

#[async_trait::async_trait]
pub trait IItemRepo: Send + Sync {
    async fn insert(&self, item: &Item) -> anyhow::Result<()>;
    async fn find_by_event(&self, event_id: &ID) -> Vec<Item>;
}

#[cfg(test)]
mod tests {
    use crate::create_test_contexts;
    use event_mailer_domain::{Item, ID};

    #[tokio::test]
    async fn find_by_event() {
        for ctx in create_test_contexts().await {
            let event_id = ID::new();
            let item = Item {
                id: Default::default(),
                event_id: event_id.clone(),
                name: "Regular ticket".into(),
            };
            let other_event_item = Item {
                id: Default::default(),
                event_id: ID::new(),
                name: "Regular ticket".into(),
            };
            assert!(ctx.repos.items.insert(&item).await.is_ok());
            assert!(ctx.repos.items.insert(&other_event_item).await.is_ok());

            assert_eq!(ctx.repos.items.find_by_event(&event_id).await, vec![item]);
        }
    }
}
