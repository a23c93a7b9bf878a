mod attachment;
mod event;
mod mail_form;
mod mail_log;
mod order;
pub mod placeholders;
mod recipients;
mod rule;
mod scheduled_mail;
mod shared;

pub use attachment::{MailAttachment, ATTACHMENT_EXTENSIONS, MAX_ATTACHMENT_SIZE};
pub use chrono_tz::Tz;
pub use event::{Event, EventSettings, Item, Occurrence, SubEvent};
pub use mail_form::{MailFilter, MailFormConfig, MailFormError, OrderStatusFilter, Recipients};
pub use mail_log::MailLogEntry;
pub use order::{Order, OrderPosition, OrderStatus};
pub use recipients::{bulk_recipients, rule_recipients, Recipient};
pub use rule::{
    RelativeOffset, Rule, RuleError, RuleInput, RuleSchedule, ScheduleFields, SendTo,
};
pub use scheduled_mail::ScheduledMail;
pub use shared::entity::{Entity, ID};
pub use shared::localized::LocalizedText;
