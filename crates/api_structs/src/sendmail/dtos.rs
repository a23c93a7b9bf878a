use chrono::{DateTime, Utc};
use event_mailer_domain::{LocalizedText, MailLogEntry, OrderStatusFilter, Recipients, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MailLogEntryDTO {
    pub id: ID,
    pub created: DateTime<Utc>,
    pub subject: LocalizedText,
    pub message: LocalizedText,
    pub recipients: Recipients,
    pub sendto: Vec<OrderStatusFilter>,
    pub items: Vec<ID>,
    pub subevent_id: Option<ID>,
    pub sent_count: i64,
}

impl MailLogEntryDTO {
    pub fn new(entry: MailLogEntry) -> Self {
        Self {
            id: entry.id,
            created: entry.created,
            subject: entry.subject,
            message: entry.message,
            recipients: entry.recipients,
            sendto: entry.sendto,
            items: entry.items,
            subevent_id: entry.subevent_id,
            sent_count: entry.sent_count,
        }
    }
}
