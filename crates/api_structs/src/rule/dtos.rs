use chrono::{DateTime, Utc};
use event_mailer_domain::{LocalizedText, Rule, ScheduleFields, ScheduledMail, SendTo, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RuleDTO {
    pub id: ID,
    pub event_id: ID,
    pub subject: LocalizedText,
    pub template: LocalizedText,
    pub all_products: bool,
    pub limit_products: Vec<ID>,
    pub include_pending: bool,
    #[serde(flatten)]
    pub schedule: ScheduleFields,
    pub send_to: SendTo,
}

impl RuleDTO {
    pub fn new(rule: Rule) -> Self {
        Self {
            schedule: rule.schedule.to_fields(),
            id: rule.id,
            event_id: rule.event_id,
            subject: rule.subject,
            template: rule.template,
            all_products: rule.all_products,
            limit_products: rule.limit_products,
            include_pending: rule.include_pending,
            send_to: rule.send_to,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledMailDTO {
    pub id: ID,
    pub rule_id: ID,
    pub subevent_id: Option<ID>,
    pub sent: bool,
    /// `None` when the send time cannot be computed, e.g. because the
    /// subevent has been removed
    pub send_at: Option<DateTime<Utc>>,
}

impl ScheduledMailDTO {
    pub fn new(mail: ScheduledMail, send_at: Option<DateTime<Utc>>) -> Self {
        Self {
            id: mail.id,
            rule_id: mail.rule_id,
            subevent_id: mail.subevent_id,
            sent: mail.sent,
            send_at,
        }
    }
}
