use crate::dtos::MailLogEntryDTO;
use event_mailer_domain::{MailFilter, MailFormConfig, MailLogEntry, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct EventPathParams {
    pub event_id: ID,
}

pub mod get_mail_form_config {
    use super::*;

    pub type PathParams = EventPathParams;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub config: MailFormConfig,
    }

    impl APIResponse {
        pub fn new(config: MailFormConfig) -> Self {
            Self { config }
        }
    }
}

pub mod send_mail {
    use super::*;
    use event_mailer_domain::{LocalizedText, MailAttachment};

    pub type PathParams = EventPathParams;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub subject: LocalizedText,
        pub message: LocalizedText,
        #[serde(flatten)]
        pub filter: MailFilter,
        #[serde(default)]
        pub attachment: Option<MailAttachment>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        /// Number of mails handed to the mail backend
        pub sent_count: i64,
    }

    impl APIResponse {
        pub fn new(sent_count: i64) -> Self {
            Self { sent_count }
        }
    }
}

pub mod get_mail_history {
    use super::*;

    pub type PathParams = EventPathParams;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub entries: Vec<MailLogEntryDTO>,
    }

    impl APIResponse {
        pub fn new(entries: Vec<MailLogEntry>) -> Self {
            Self {
                entries: entries.into_iter().map(MailLogEntryDTO::new).collect(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::send_mail::RequestBody;
    use event_mailer_domain::{OrderStatusFilter, Recipients};

    #[test]
    fn send_mail_body_is_flat() {
        let body: RequestBody = serde_json::from_str(
            r#"{
                "subject": {"en": "Hello {event}"},
                "message": {"en": "See you"},
                "recipients": "both",
                "sendto": ["p", "overdue"],
                "items": ["9f0ab1a4-3b0a-4f5e-9a7e-3f6b1f0e2d11"],
                "filterCheckins": true,
                "notCheckedIn": true
            }"#,
        )
        .unwrap();
        assert_eq!(body.filter.recipients, Recipients::Both);
        assert_eq!(
            body.filter.sendto,
            vec![OrderStatusFilter::Paid, OrderStatusFilter::Overdue]
        );
        assert_eq!(body.filter.items.len(), 1);
        assert!(body.filter.filter_checkins);
        assert!(body.filter.checkin_lists.is_empty());
        assert!(body.filter.subevent.is_none());
        assert!(body.attachment.is_none());
    }
}
