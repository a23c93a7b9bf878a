use super::IOrderRepo;
use crate::repos::shared::inmemory_repo::*;
use event_mailer_domain::{Order, ID};

pub struct InMemoryOrderRepo {
    orders: std::sync::Mutex<Vec<Order>>,
}

impl InMemoryOrderRepo {
    pub fn new() -> Self {
        Self {
            orders: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IOrderRepo for InMemoryOrderRepo {
    async fn insert(&self, order: &Order) -> anyhow::Result<()> {
        insert(order, &self.orders);
        Ok(())
    }

    async fn save(&self, order: &Order) -> anyhow::Result<()> {
        save(order, &self.orders);
        Ok(())
    }

    async fn find_by_event(&self, event_id: &ID) -> anyhow::Result<Vec<Order>> {
        Ok(find_by(&self.orders, |order| order.event_id == *event_id))
    }
}
