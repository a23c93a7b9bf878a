use super::IItemRepo;
use event_mailer_domain::{Item, LocalizedText, ID};
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};
use tracing::error;

pub struct PostgresItemRepo {
    pool: PgPool,
}

impl PostgresItemRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ItemRaw {
    item_uid: Uuid,
    event_uid: Uuid,
    name: Json<LocalizedText>,
}

impl Into<Item> for ItemRaw {
    fn into(self) -> Item {
        Item {
            id: self.item_uid.into(),
            event_id: self.event_uid.into(),
            name: self.name.0,
        }
    }
}

#[async_trait::async_trait]
impl IItemRepo for PostgresItemRepo {
    async fn insert(&self, item: &Item) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO items
            (item_uid, event_uid, name)
            VALUES($1, $2, $3)
            "#,
        )
        .bind(item.id.inner_ref())
        .bind(item.event_id.inner_ref())
        .bind(Json(&item.name))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Unable to insert item: {:?}. DB returned error: {:?}", item, e);
            e
        })?;
        Ok(())
    }

    async fn find_by_event(&self, event_id: &ID) -> Vec<Item> {
        sqlx::query_as::<_, ItemRaw>(
            r#"
            SELECT * FROM items AS i
            WHERE i.event_uid = $1
            "#,
        )
        .bind(event_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!(
                "Find items of event: {:?} failed. DB returned error: {:?}",
                event_id, e
            );
            vec![]
        })
        .into_iter()
        .map(|i| i.into())
        .collect()
    }
}
