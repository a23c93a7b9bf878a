use crate::{
    mail_form::{OrderStatusFilter, Recipients},
    shared::{
        entity::{Entity, ID},
        localized::LocalizedText,
    },
};
use chrono::{DateTime, Utc};

/// Record of a bulk mail sent to the orders of an `Event`
#[derive(Debug, Clone, PartialEq)]
pub struct MailLogEntry {
    pub id: ID,
    pub event_id: ID,
    pub created: DateTime<Utc>,
    pub subject: LocalizedText,
    pub message: LocalizedText,
    pub recipients: Recipients,
    pub sendto: Vec<OrderStatusFilter>,
    pub items: Vec<ID>,
    pub subevent_id: Option<ID>,
    /// Number of mails the backend accepted
    pub sent_count: i64,
}

impl Entity for MailLogEntry {
    fn id(&self) -> &ID {
        &self.id
    }
}
