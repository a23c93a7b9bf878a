use super::IRuleRepo;
use chrono::{DateTime, NaiveTime, Utc};
use event_mailer_domain::{LocalizedText, Rule, RuleSchedule, ScheduleFields, ID};
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};
use std::convert::TryFrom;
use tracing::error;

pub struct PostgresRuleRepo {
    pool: PgPool,
}

impl PostgresRuleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RuleRaw {
    rule_uid: Uuid,
    event_uid: Uuid,
    subject: Json<LocalizedText>,
    template: Json<LocalizedText>,
    all_products: bool,
    limit_products: Vec<Uuid>,
    include_pending: bool,
    date_is_absolute: bool,
    send_date: Option<DateTime<Utc>>,
    send_offset_days: Option<i64>,
    send_offset_time: Option<NaiveTime>,
    offset_is_after: Option<bool>,
    offset_to_event_end: Option<bool>,
    send_to: String,
}

impl TryFrom<RuleRaw> for Rule {
    type Error = anyhow::Error;

    fn try_from(raw: RuleRaw) -> anyhow::Result<Self> {
        let schedule = RuleSchedule::from_fields(&ScheduleFields {
            date_is_absolute: raw.date_is_absolute,
            send_date: raw.send_date,
            send_offset_days: raw.send_offset_days,
            send_offset_time: raw.send_offset_time,
            offset_is_after: raw.offset_is_after,
            offset_to_event_end: raw.offset_to_event_end,
        })?;
        Ok(Rule {
            id: raw.rule_uid.into(),
            event_id: raw.event_uid.into(),
            subject: raw.subject.0,
            template: raw.template.0,
            all_products: raw.all_products,
            limit_products: raw.limit_products.into_iter().map(ID::from).collect(),
            include_pending: raw.include_pending,
            schedule,
            send_to: raw.send_to.parse().map_err(anyhow::Error::msg)?,
        })
    }
}

fn into_rules(raws: Vec<RuleRaw>) -> Vec<Rule> {
    raws.into_iter()
        .filter_map(|raw| match Rule::try_from(raw) {
            Ok(rule) => Some(rule),
            Err(e) => {
                error!("Skipping invalid rule row: {:?}", e);
                None
            }
        })
        .collect()
}

fn limit_products(rule: &Rule) -> Vec<Uuid> {
    rule.limit_products
        .iter()
        .map(|id| *id.inner_ref())
        .collect()
}

#[async_trait::async_trait]
impl IRuleRepo for PostgresRuleRepo {
    async fn insert(&self, rule: &Rule) -> anyhow::Result<()> {
        let fields = rule.schedule.to_fields();
        sqlx::query(
            r#"
            INSERT INTO rules
            (rule_uid, event_uid, subject, template, all_products, limit_products, include_pending,
             date_is_absolute, send_date, send_offset_days, send_offset_time, offset_is_after,
             offset_to_event_end, send_to)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(rule.id.inner_ref())
        .bind(rule.event_id.inner_ref())
        .bind(Json(&rule.subject))
        .bind(Json(&rule.template))
        .bind(rule.all_products)
        .bind(limit_products(rule))
        .bind(rule.include_pending)
        .bind(fields.date_is_absolute)
        .bind(fields.send_date)
        .bind(fields.send_offset_days)
        .bind(fields.send_offset_time)
        .bind(fields.offset_is_after)
        .bind(fields.offset_to_event_end)
        .bind(rule.send_to.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Unable to insert rule: {:?}. DB returned error: {:?}", rule, e);
            e
        })?;
        Ok(())
    }

    async fn save(&self, rule: &Rule) -> anyhow::Result<()> {
        let fields = rule.schedule.to_fields();
        sqlx::query(
            r#"
            UPDATE rules
            SET subject = $2,
            template = $3,
            all_products = $4,
            limit_products = $5,
            include_pending = $6,
            date_is_absolute = $7,
            send_date = $8,
            send_offset_days = $9,
            send_offset_time = $10,
            offset_is_after = $11,
            offset_to_event_end = $12,
            send_to = $13
            WHERE rule_uid = $1
            "#,
        )
        .bind(rule.id.inner_ref())
        .bind(Json(&rule.subject))
        .bind(Json(&rule.template))
        .bind(rule.all_products)
        .bind(limit_products(rule))
        .bind(rule.include_pending)
        .bind(fields.date_is_absolute)
        .bind(fields.send_date)
        .bind(fields.send_offset_days)
        .bind(fields.send_offset_time)
        .bind(fields.offset_is_after)
        .bind(fields.offset_to_event_end)
        .bind(rule.send_to.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Unable to save rule: {:?}. DB returned error: {:?}", rule, e);
            e
        })?;
        Ok(())
    }

    async fn find(&self, rule_id: &ID) -> Option<Rule> {
        let raw = sqlx::query_as::<_, RuleRaw>(
            r#"
            SELECT * FROM rules AS r
            WHERE r.rule_uid = $1
            "#,
        )
        .bind(rule_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find rule with id: {:?} failed. DB returned error: {:?}",
                rule_id, e
            );
            e
        })
        .ok()??;
        into_rules(vec![raw]).pop()
    }

    async fn find_by_event(&self, event_id: &ID) -> Vec<Rule> {
        let raws = sqlx::query_as::<_, RuleRaw>(
            r#"
            SELECT * FROM rules AS r
            WHERE r.event_uid = $1
            ORDER BY r.created
            "#,
        )
        .bind(event_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!(
                "Find rules of event: {:?} failed. DB returned error: {:?}",
                event_id, e
            );
            vec![]
        });
        into_rules(raws)
    }

    async fn delete(&self, rule_id: &ID) -> Option<Rule> {
        let raw = sqlx::query_as::<_, RuleRaw>(
            r#"
            DELETE FROM rules AS r
            WHERE r.rule_uid = $1
            RETURNING *
            "#,
        )
        .bind(rule_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Delete rule with id: {:?} failed. DB returned error: {:?}",
                rule_id, e
            );
            e
        })
        .ok()??;
        into_rules(vec![raw]).pop()
    }
}
