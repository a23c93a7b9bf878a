use crate::shared::entity::{Entity, ID};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Expired,
    Canceled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Expired => "expired",
            Self::Canceled => "canceled",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "expired" => Ok(Self::Expired),
            "canceled" => Ok(Self::Canceled),
            _ => Err(format!("Unknown order status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: ID,
    pub code: String,
    pub event_id: ID,
    /// Contact address of the customer who placed the order
    pub email: Option<String>,
    pub locale: String,
    pub status: OrderStatus,
    pub require_approval: bool,
    /// End of the payment term
    pub expires: DateTime<Utc>,
    /// Name on the invoice address
    pub invoice_name: Option<String>,
    pub positions: Vec<OrderPosition>,
}

/// One ticket of an `Order`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPosition {
    pub id: ID,
    pub item_id: ID,
    pub subevent_id: Option<ID>,
    pub attendee_name: Option<String>,
    pub attendee_email: Option<String>,
    /// Check-in lists this position has been checked in on
    #[serde(default)]
    pub checkins: Vec<ID>,
}

impl Order {
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == OrderStatus::Pending && self.expires < now
    }

    /// The order contact address, if there is a usable one
    pub fn contact_email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}

impl OrderPosition {
    /// Attendee address, falling back to the order contact address
    pub fn email_or<'a>(&'a self, order: &'a Order) -> Option<&'a str> {
        self.attendee_email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .or_else(|| order.contact_email())
    }
}

impl Entity for Order {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
pub(crate) mod test_factory {
    use super::*;
    use chrono::TimeZone;

    pub fn order(event_id: &ID, status: OrderStatus, positions: Vec<OrderPosition>) -> Order {
        Order {
            id: Default::default(),
            code: "ABC12".into(),
            event_id: event_id.clone(),
            email: Some("buyer@example.org".into()),
            locale: "en".into(),
            status,
            require_approval: false,
            expires: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            invoice_name: Some("Jane Buyer".into()),
            positions,
        }
    }

    pub fn position(item_id: &ID, subevent_id: Option<&ID>, email: Option<&str>) -> OrderPosition {
        OrderPosition {
            id: Default::default(),
            item_id: item_id.clone(),
            subevent_id: subevent_id.cloned(),
            attendee_name: Some("Ann Attendee".into()),
            attendee_email: email.map(String::from),
            checkins: Vec::new(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::test_factory::*;
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn overdue_only_when_pending_and_expired() {
        let event_id = ID::new();
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
        let pending = order(&event_id, OrderStatus::Pending, vec![]);
        assert!(pending.is_overdue(now));
        assert!(!pending.is_overdue(pending.expires));

        let paid = order(&event_id, OrderStatus::Paid, vec![]);
        assert!(!paid.is_overdue(now));
    }

    #[test]
    fn attendee_email_falls_back_to_order() {
        let event_id = ID::new();
        let item_id = ID::new();
        let mut o = order(&event_id, OrderStatus::Paid, vec![]);
        let with_email = position(&item_id, None, Some("ann@example.org"));
        let without_email = position(&item_id, None, Some("  "));
        assert_eq!(with_email.email_or(&o), Some("ann@example.org"));
        assert_eq!(without_email.email_or(&o), Some("buyer@example.org"));

        o.email = None;
        assert_eq!(without_email.email_or(&o), None);
    }
}
