use super::IOrderRepo;
use chrono::{DateTime, Utc};
use event_mailer_domain::{Order, OrderPosition, ID};
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};
use std::convert::TryFrom;
use tracing::error;

pub struct PostgresOrderRepo {
    pool: PgPool,
}

impl PostgresOrderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct OrderRaw {
    order_uid: Uuid,
    code: String,
    event_uid: Uuid,
    email: Option<String>,
    locale: String,
    status: String,
    require_approval: bool,
    expires: DateTime<Utc>,
    invoice_name: Option<String>,
    positions: Json<Vec<OrderPosition>>,
}

impl TryFrom<OrderRaw> for Order {
    type Error = anyhow::Error;

    fn try_from(raw: OrderRaw) -> anyhow::Result<Self> {
        Ok(Order {
            id: raw.order_uid.into(),
            code: raw.code,
            event_id: raw.event_uid.into(),
            email: raw.email,
            locale: raw.locale,
            status: raw.status.parse().map_err(anyhow::Error::msg)?,
            require_approval: raw.require_approval,
            expires: raw.expires,
            invoice_name: raw.invoice_name,
            positions: raw.positions.0,
        })
    }
}

#[async_trait::async_trait]
impl IOrderRepo for PostgresOrderRepo {
    async fn insert(&self, order: &Order) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO orders
            (order_uid, code, event_uid, email, locale, status, require_approval, expires, invoice_name, positions)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(order.id.inner_ref())
        .bind(&order.code)
        .bind(order.event_id.inner_ref())
        .bind(&order.email)
        .bind(&order.locale)
        .bind(order.status.as_str())
        .bind(order.require_approval)
        .bind(order.expires)
        .bind(&order.invoice_name)
        .bind(Json(&order.positions))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Unable to insert order: {:?}. DB returned error: {:?}", order, e);
            e
        })?;
        Ok(())
    }

    async fn save(&self, order: &Order) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE orders
            SET email = $2,
            locale = $3,
            status = $4,
            require_approval = $5,
            expires = $6,
            invoice_name = $7,
            positions = $8
            WHERE order_uid = $1
            "#,
        )
        .bind(order.id.inner_ref())
        .bind(&order.email)
        .bind(&order.locale)
        .bind(order.status.as_str())
        .bind(order.require_approval)
        .bind(order.expires)
        .bind(&order.invoice_name)
        .bind(Json(&order.positions))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Unable to save order: {:?}. DB returned error: {:?}", order, e);
            e
        })?;
        Ok(())
    }

    async fn find_by_event(&self, event_id: &ID) -> anyhow::Result<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRaw>(
            r#"
            SELECT * FROM orders AS o
            WHERE o.event_uid = $1
            ORDER BY o.code
            "#,
        )
        .bind(event_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find orders of event: {:?} failed. DB returned error: {:?}",
                event_id, e
            );
            e
        })?;

        rows.into_iter().map(Order::try_from).collect()
    }
}
