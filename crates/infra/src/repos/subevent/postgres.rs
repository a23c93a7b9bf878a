use super::ISubEventRepo;
use chrono::{DateTime, Utc};
use event_mailer_domain::{LocalizedText, SubEvent, ID};
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};
use tracing::error;

pub struct PostgresSubEventRepo {
    pool: PgPool,
}

impl PostgresSubEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SubEventRaw {
    subevent_uid: Uuid,
    event_uid: Uuid,
    name: Json<LocalizedText>,
    date_from: DateTime<Utc>,
    date_to: Option<DateTime<Utc>>,
}

impl Into<SubEvent> for SubEventRaw {
    fn into(self) -> SubEvent {
        SubEvent {
            id: self.subevent_uid.into(),
            event_id: self.event_uid.into(),
            name: self.name.0,
            date_from: self.date_from,
            date_to: self.date_to,
        }
    }
}

#[async_trait::async_trait]
impl ISubEventRepo for PostgresSubEventRepo {
    async fn insert(&self, subevent: &SubEvent) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO subevents
            (subevent_uid, event_uid, name, date_from, date_to)
            VALUES($1, $2, $3, $4, $5)
            "#,
        )
        .bind(subevent.id.inner_ref())
        .bind(subevent.event_id.inner_ref())
        .bind(Json(&subevent.name))
        .bind(subevent.date_from)
        .bind(subevent.date_to)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert subevent: {:?}. DB returned error: {:?}",
                subevent, e
            );
            e
        })?;
        Ok(())
    }

    async fn find(&self, subevent_id: &ID) -> Option<SubEvent> {
        sqlx::query_as::<_, SubEventRaw>(
            r#"
            SELECT * FROM subevents AS s
            WHERE s.subevent_uid = $1
            "#,
        )
        .bind(subevent_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find subevent with id: {:?} failed. DB returned error: {:?}",
                subevent_id, e
            );
            e
        })
        .ok()?
        .map(|s| s.into())
    }

    async fn find_by_event(&self, event_id: &ID) -> Vec<SubEvent> {
        sqlx::query_as::<_, SubEventRaw>(
            r#"
            SELECT * FROM subevents AS s
            WHERE s.event_uid = $1
            ORDER BY s.date_from
            "#,
        )
        .bind(event_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!(
                "Find subevents of event: {:?} failed. DB returned error: {:?}",
                event_id, e
            );
            vec![]
        })
        .into_iter()
        .map(|s| s.into())
        .collect()
    }
}
