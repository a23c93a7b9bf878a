use super::IEventRepo;
use chrono::{DateTime, Utc};
use event_mailer_domain::{Event, EventSettings, LocalizedText, ID};
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};
use tracing::error;

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EventRaw {
    event_uid: Uuid,
    slug: String,
    name: Json<LocalizedText>,
    date_from: DateTime<Utc>,
    date_to: Option<DateTime<Utc>>,
    has_subevents: bool,
    settings: Json<EventSettings>,
}

impl Into<Event> for EventRaw {
    fn into(self) -> Event {
        Event {
            id: self.event_uid.into(),
            slug: self.slug,
            name: self.name.0,
            date_from: self.date_from,
            date_to: self.date_to,
            has_subevents: self.has_subevents,
            settings: self.settings.0,
        }
    }
}

#[async_trait::async_trait]
impl IEventRepo for PostgresEventRepo {
    async fn insert(&self, e: &Event) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO events
            (event_uid, slug, name, date_from, date_to, has_subevents, settings)
            VALUES($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(e.id.inner_ref())
        .bind(&e.slug)
        .bind(Json(&e.name))
        .bind(e.date_from)
        .bind(e.date_to)
        .bind(e.has_subevents)
        .bind(Json(&e.settings))
        .execute(&self.pool)
        .await
        .map_err(|err| {
            error!("Unable to insert event: {:?}. DB returned error: {:?}", e, err);
            err
        })?;
        Ok(())
    }

    async fn save(&self, e: &Event) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE events
            SET slug = $2,
            name = $3,
            date_from = $4,
            date_to = $5,
            has_subevents = $6,
            settings = $7
            WHERE event_uid = $1
            "#,
        )
        .bind(e.id.inner_ref())
        .bind(&e.slug)
        .bind(Json(&e.name))
        .bind(e.date_from)
        .bind(e.date_to)
        .bind(e.has_subevents)
        .bind(Json(&e.settings))
        .execute(&self.pool)
        .await
        .map_err(|err| {
            error!("Unable to save event: {:?}. DB returned error: {:?}", e, err);
            err
        })?;
        Ok(())
    }

    async fn find(&self, event_id: &ID) -> Option<Event> {
        sqlx::query_as::<_, EventRaw>(
            r#"
            SELECT * FROM events AS e
            WHERE e.event_uid = $1
            "#,
        )
        .bind(event_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| {
            error!("Find event with id: {:?} failed. DB returned error: {:?}", event_id, err);
            err
        })
        .ok()?
        .map(|e| e.into())
    }
}
