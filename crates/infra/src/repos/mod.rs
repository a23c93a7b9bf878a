mod event;
mod item;
mod mail_log;
mod order;
mod rule;
mod scheduled_mail;
pub(crate) mod shared;
mod subevent;

use event::{IEventRepo, InMemoryEventRepo, PostgresEventRepo};
use item::{IItemRepo, InMemoryItemRepo, PostgresItemRepo};
use mail_log::{IMailLogRepo, InMemoryMailLogRepo, PostgresMailLogRepo};
use order::{InMemoryOrderRepo, PostgresOrderRepo};
use rule::{IRuleRepo, InMemoryRuleRepo, PostgresRuleRepo};
use scheduled_mail::{IScheduledMailRepo, InMemoryScheduledMailRepo, PostgresScheduledMailRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use subevent::{ISubEventRepo, InMemorySubEventRepo, PostgresSubEventRepo};
use tracing::info;

pub use order::IOrderRepo;
pub use shared::repo::DeleteResult;

#[derive(Clone)]
pub struct Repos {
    pub events: Arc<dyn IEventRepo>,
    pub subevents: Arc<dyn ISubEventRepo>,
    pub items: Arc<dyn IItemRepo>,
    pub orders: Arc<dyn IOrderRepo>,
    pub rules: Arc<dyn IRuleRepo>,
    pub scheduled_mails: Arc<dyn IScheduledMailRepo>,
    pub mail_log: Arc<dyn IMailLogRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");
        Ok(Self {
            events: Arc::new(PostgresEventRepo::new(pool.clone())),
            subevents: Arc::new(PostgresSubEventRepo::new(pool.clone())),
            items: Arc::new(PostgresItemRepo::new(pool.clone())),
            orders: Arc::new(PostgresOrderRepo::new(pool.clone())),
            rules: Arc::new(PostgresRuleRepo::new(pool.clone())),
            scheduled_mails: Arc::new(PostgresScheduledMailRepo::new(pool.clone())),
            mail_log: Arc::new(PostgresMailLogRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            events: Arc::new(InMemoryEventRepo::new()),
            subevents: Arc::new(InMemorySubEventRepo::new()),
            items: Arc::new(InMemoryItemRepo::new()),
            orders: Arc::new(InMemoryOrderRepo::new()),
            rules: Arc::new(InMemoryRuleRepo::new()),
            scheduled_mails: Arc::new(InMemoryScheduledMailRepo::new()),
            mail_log: Arc::new(InMemoryMailLogRepo::new()),
        }
    }
}
