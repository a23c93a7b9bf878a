use super::IMailLogRepo;
use chrono::{DateTime, Utc};
use event_mailer_domain::{LocalizedText, MailLogEntry, OrderStatusFilter, ID};
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};
use std::convert::TryFrom;
use tracing::error;

pub struct PostgresMailLogRepo {
    pool: PgPool,
}

impl PostgresMailLogRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct MailLogEntryRaw {
    entry_uid: Uuid,
    event_uid: Uuid,
    created: DateTime<Utc>,
    subject: Json<LocalizedText>,
    message: Json<LocalizedText>,
    recipients: String,
    sendto: Vec<String>,
    items: Vec<Uuid>,
    subevent_uid: Option<Uuid>,
    sent_count: i64,
}

impl TryFrom<MailLogEntryRaw> for MailLogEntry {
    type Error = anyhow::Error;

    fn try_from(raw: MailLogEntryRaw) -> anyhow::Result<Self> {
        let sendto = raw
            .sendto
            .iter()
            .map(|s| s.parse::<OrderStatusFilter>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(anyhow::Error::msg)?;
        Ok(MailLogEntry {
            id: raw.entry_uid.into(),
            event_id: raw.event_uid.into(),
            created: raw.created,
            subject: raw.subject.0,
            message: raw.message.0,
            recipients: raw.recipients.parse().map_err(anyhow::Error::msg)?,
            sendto,
            items: raw.items.into_iter().map(ID::from).collect(),
            subevent_id: raw.subevent_uid.map(ID::from),
            sent_count: raw.sent_count,
        })
    }
}

#[async_trait::async_trait]
impl IMailLogRepo for PostgresMailLogRepo {
    async fn insert(&self, entry: &MailLogEntry) -> anyhow::Result<()> {
        let sendto = entry
            .sendto
            .iter()
            .map(|s| s.code().to_string())
            .collect::<Vec<_>>();
        let items = entry
            .items
            .iter()
            .map(|id| *id.inner_ref())
            .collect::<Vec<_>>();
        sqlx::query(
            r#"
            INSERT INTO mail_log
            (entry_uid, event_uid, created, subject, message, recipients, sendto, items, subevent_uid, sent_count)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(entry.id.inner_ref())
        .bind(entry.event_id.inner_ref())
        .bind(entry.created)
        .bind(Json(&entry.subject))
        .bind(Json(&entry.message))
        .bind(entry.recipients.as_str())
        .bind(sendto)
        .bind(items)
        .bind(entry.subevent_id.as_ref().map(|id| *id.inner_ref()))
        .bind(entry.sent_count)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert mail log entry: {:?}. DB returned error: {:?}",
                entry, e
            );
            e
        })?;
        Ok(())
    }

    async fn find_by_event(&self, event_id: &ID) -> Vec<MailLogEntry> {
        sqlx::query_as::<_, MailLogEntryRaw>(
            r#"
            SELECT * FROM mail_log AS l
            WHERE l.event_uid = $1
            ORDER BY l.created DESC
            "#,
        )
        .bind(event_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!(
                "Find mail log of event: {:?} failed. DB returned error: {:?}",
                event_id, e
            );
            vec![]
        })
        .into_iter()
        .filter_map(|raw| match MailLogEntry::try_from(raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                error!("Skipping invalid mail log row: {:?}", e);
                None
            }
        })
        .collect()
    }
}
