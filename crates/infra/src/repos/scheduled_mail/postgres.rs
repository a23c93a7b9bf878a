use super::IScheduledMailRepo;
use crate::repos::shared::repo::DeleteResult;
use event_mailer_domain::{ScheduledMail, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresScheduledMailRepo {
    pool: PgPool,
}

impl PostgresScheduledMailRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ScheduledMailRaw {
    scheduled_mail_uid: Uuid,
    rule_uid: Uuid,
    event_uid: Uuid,
    subevent_uid: Option<Uuid>,
    sent: bool,
}

impl Into<ScheduledMail> for ScheduledMailRaw {
    fn into(self) -> ScheduledMail {
        ScheduledMail {
            id: self.scheduled_mail_uid.into(),
            rule_id: self.rule_uid.into(),
            event_id: self.event_uid.into(),
            subevent_id: self.subevent_uid.map(|id| id.into()),
            sent: self.sent,
        }
    }
}

#[async_trait::async_trait]
impl IScheduledMailRepo for PostgresScheduledMailRepo {
    async fn bulk_insert(&self, mails: &[ScheduledMail]) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;
        for mail in mails {
            sqlx::query(
                r#"
                INSERT INTO scheduled_mails
                (scheduled_mail_uid, rule_uid, event_uid, subevent_uid, sent)
                VALUES($1, $2, $3, $4, $5)
                "#,
            )
            .bind(mail.id.inner_ref())
            .bind(mail.rule_id.inner_ref())
            .bind(mail.event_id.inner_ref())
            .bind(mail.subevent_id.as_ref().map(|id| *id.inner_ref()))
            .bind(mail.sent)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!(
                    "Unable to insert scheduled mail: {:?}. DB returned error: {:?}",
                    mail, e
                );
                e
            })?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn find_by_rule(&self, rule_id: &ID) -> Vec<ScheduledMail> {
        sqlx::query_as::<_, ScheduledMailRaw>(
            r#"
            SELECT * FROM scheduled_mails AS m
            WHERE m.rule_uid = $1
            "#,
        )
        .bind(rule_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!(
                "Find scheduled mails of rule: {:?} failed. DB returned error: {:?}",
                rule_id, e
            );
            vec![]
        })
        .into_iter()
        .map(|m| m.into())
        .collect()
    }

    async fn find_unsent(&self) -> Vec<ScheduledMail> {
        sqlx::query_as::<_, ScheduledMailRaw>(
            r#"
            SELECT * FROM scheduled_mails AS m
            WHERE m.sent = false
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!("Find unsent scheduled mails failed. DB returned error: {:?}", e);
            vec![]
        })
        .into_iter()
        .map(|m| m.into())
        .collect()
    }

    async fn mark_sent(&self, mail_id: &ID) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE scheduled_mails
            SET sent = true
            WHERE scheduled_mail_uid = $1 AND sent = false
            "#,
        )
        .bind(mail_id.inner_ref())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to mark scheduled mail: {:?} as sent. DB returned error: {:?}",
                mail_id, e
            );
            e
        })?;
        Ok(res.rows_affected() == 1)
    }

    async fn delete_by_rule(&self, rule_id: &ID) -> anyhow::Result<DeleteResult> {
        let res = sqlx::query(
            r#"
            DELETE FROM scheduled_mails AS m
            WHERE m.rule_uid = $1
            "#,
        )
        .bind(rule_id.inner_ref())
        .execute(&self.pool)
        .await?;
        Ok(DeleteResult {
            deleted_count: res.rows_affected() as i64,
        })
    }
}
