mod base;
mod rule;
mod sendmail;
mod status;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIErrorVariant, APIResponse};
pub use event_mailer_api_structs::dtos::*;
pub use event_mailer_api_structs::send_mail::RequestBody as SendMailBody;
pub use event_mailer_api_structs::RuleRequestBody as RuleBody;
pub use event_mailer_domain::{
    LocalizedText, MailAttachment, MailFilter, MailFormConfig, OrderStatusFilter, Recipients,
    ScheduleFields, SendTo, Tz, ID,
};
use rule::RuleClient;
pub use rule::{CreateRuleInput, UpdateRuleInput};
use sendmail::SendmailClient;
pub use sendmail::SendMailInput;
use status::StatusClient;
use std::sync::Arc;

// Domain
pub use event_mailer_api_structs::dtos::MailLogEntryDTO as MailLogEntry;
pub use event_mailer_api_structs::dtos::RuleDTO as Rule;
pub use event_mailer_api_structs::dtos::ScheduledMailDTO as ScheduledMail;

/// Event Mailer Server SDK
///
/// The SDK contains methods for interacting with the Event Mailer server
/// API.
#[derive(Clone)]
pub struct MailerSDK {
    pub rule: RuleClient,
    pub sendmail: SendmailClient,
    pub status: StatusClient,
}

impl MailerSDK {
    pub fn new<T: Into<String>>(address: String, api_key: T) -> Self {
        let mut base = BaseClient::new(address);
        base.set_api_key(api_key.into());
        let base = Arc::new(base);
        let rule = RuleClient::new(base.clone());
        let sendmail = SendmailClient::new(base.clone());
        let status = StatusClient::new(base);

        Self {
            rule,
            sendmail,
            status,
        }
    }
}
