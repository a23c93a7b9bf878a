mod inmemory;
mod postgres;

pub use inmemory::InMemoryOrderRepo;
pub use postgres::PostgresOrderRepo;

use event_mailer_domain::{Order, ID};

#[async_trait::async_trait]
pub trait IOrderRepo: Send + Sync {
    async fn insert(&self, order: &Order) -> anyhow::Result<()>;
    async fn save(&self, order: &Order) -> anyhow::Result<()>;
    /// All orders of the event including their positions. Fails instead of
    /// returning a partial list when the storage can not be read.
    async fn find_by_event(&self, event_id: &ID) -> anyhow::Result<Vec<Order>>;
}
