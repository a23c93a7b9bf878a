use crate::{
    event::{Event, SubEvent},
    order::{Order, OrderPosition, OrderStatus},
    placeholders::{self, MAIL_PLACEHOLDERS},
    shared::{entity::ID, localized::LocalizedText},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Who receives a bulk mail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recipients {
    /// The contact address of every order
    Orders,
    /// Every attendee, falling back to the order contact address
    Attendees,
    Both,
}

impl Recipients {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Orders => "orders",
            Self::Attendees => "attendees",
            Self::Both => "both",
        }
    }

    pub fn includes_orders(&self) -> bool {
        matches!(self, Self::Orders | Self::Both)
    }

    pub fn includes_attendees(&self) -> bool {
        matches!(self, Self::Attendees | Self::Both)
    }
}

impl std::str::FromStr for Recipients {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "orders" => Ok(Self::Orders),
            "attendees" => Ok(Self::Attendees),
            "both" => Ok(Self::Both),
            _ => Err(format!("Unknown recipients: {}", s)),
        }
    }
}

/// Order status selection of a bulk mail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatusFilter {
    /// Any pending order
    #[serde(rename = "n")]
    Pending,
    /// Pending, waiting for approval
    #[serde(rename = "pa")]
    PendingApproval,
    /// Pending, not waiting for approval
    #[serde(rename = "na")]
    PendingPayment,
    #[serde(rename = "p")]
    Paid,
    #[serde(rename = "e")]
    Expired,
    #[serde(rename = "c")]
    Canceled,
    /// Pending with the payment term passed
    #[serde(rename = "overdue")]
    Overdue,
}

impl OrderStatusFilter {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Pending => "n",
            Self::PendingApproval => "pa",
            Self::PendingPayment => "na",
            Self::Paid => "p",
            Self::Expired => "e",
            Self::Canceled => "c",
            Self::Overdue => "overdue",
        }
    }

    pub fn matches(&self, order: &Order, now: DateTime<Utc>) -> bool {
        match self {
            Self::Pending => order.status == OrderStatus::Pending,
            Self::PendingApproval => order.status == OrderStatus::Pending && order.require_approval,
            Self::PendingPayment => order.status == OrderStatus::Pending && !order.require_approval,
            Self::Paid => order.status == OrderStatus::Paid,
            Self::Expired => order.status == OrderStatus::Expired,
            Self::Canceled => order.status == OrderStatus::Canceled,
            Self::Overdue => order.is_overdue(now),
        }
    }
}

impl std::str::FromStr for OrderStatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "n" => Ok(Self::Pending),
            "pa" => Ok(Self::PendingApproval),
            "na" => Ok(Self::PendingPayment),
            "p" => Ok(Self::Paid),
            "e" => Ok(Self::Expired),
            "c" => Ok(Self::Canceled),
            "overdue" => Ok(Self::Overdue),
            _ => Err(format!("Unknown order status filter: {}", s)),
        }
    }
}

/// The options of the bulk mail form that apply to an `Event`, computed once
/// from its settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailFormConfig {
    pub recipients: Vec<Recipients>,
    pub status_choices: Vec<OrderStatusFilter>,
    pub default_statuses: Vec<OrderStatusFilter>,
    /// Whether mails can be limited to one subevent or a range of subevents
    pub subevent_filters: bool,
    pub locales: Vec<String>,
    pub placeholders: Vec<String>,
}

/// Filters of a bulk mail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailFilter {
    pub recipients: Recipients,
    pub sendto: Vec<OrderStatusFilter>,
    /// Only orders containing one of these products
    pub items: Vec<ID>,
    #[serde(default)]
    pub filter_checkins: bool,
    #[serde(default)]
    pub checkin_lists: Vec<ID>,
    #[serde(default)]
    pub not_checked_in: bool,
    #[serde(default)]
    pub subevent: Option<ID>,
    #[serde(default)]
    pub subevents_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub subevents_to: Option<DateTime<Utc>>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MailFormError {
    #[error("Recipients `{0}` are not available for this event")]
    UnavailableRecipients(&'static str),
    #[error("Order status `{0}` is not available for this event")]
    UnavailableStatus(&'static str),
    #[error("Please select at least one order status")]
    MissingStatus,
    #[error("Please select at least one product")]
    MissingItems,
    #[error("Please select a check-in list or customers not checked in")]
    MissingCheckinFilter,
    #[error("This event has no dates to filter by")]
    UnavailableSubeventFilter,
    #[error("Please either select a specific date or a date range, not both.")]
    SubeventAndRange,
    #[error("If you set a date range, please set both a start and an end.")]
    IncompleteRange,
    #[error("The {0} must not be empty")]
    EmptyText(&'static str),
    #[error("The {field} uses unavailable placeholders: {invalid}")]
    InvalidPlaceholder { field: &'static str, invalid: String },
    #[error("The file `{0}` has an extension that is not allowed")]
    AttachmentExtension(String),
    #[error("`{0}` is not a valid content type")]
    AttachmentContentType(String),
    #[error("The attachment is not valid base64")]
    AttachmentEncoding,
    #[error("The attachment must not be larger than 10 MiB")]
    AttachmentTooLarge,
}

impl MailFormConfig {
    pub fn from_event(event: &Event) -> Self {
        let mut recipients = vec![Recipients::Orders];
        if event.settings.attendee_emails_asked {
            recipients.push(Recipients::Attendees);
            recipients.push(Recipients::Both);
        }

        let mut status_choices = vec![
            OrderStatusFilter::Paid,
            OrderStatusFilter::Pending,
            OrderStatusFilter::PendingApproval,
            OrderStatusFilter::PendingPayment,
            OrderStatusFilter::Expired,
            OrderStatusFilter::Canceled,
        ];
        if !event.settings.payment_term_expire_automatically {
            status_choices.push(OrderStatusFilter::Overdue);
        }

        Self {
            recipients,
            status_choices,
            default_statuses: vec![OrderStatusFilter::Paid, OrderStatusFilter::PendingPayment],
            subevent_filters: event.has_subevents,
            locales: event.settings.locales.clone(),
            placeholders: MAIL_PLACEHOLDERS.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn validate(
        &self,
        filter: &MailFilter,
        subject: &LocalizedText,
        message: &LocalizedText,
    ) -> Result<(), MailFormError> {
        for (text, field) in [(subject, "subject"), (message, "message")] {
            if text.is_blank() {
                return Err(MailFormError::EmptyText(field));
            }
            let invalid = placeholders::invalid_placeholders(text, MAIL_PLACEHOLDERS);
            if !invalid.is_empty() {
                return Err(MailFormError::InvalidPlaceholder {
                    field,
                    invalid: invalid.join(", "),
                });
            }
        }

        if !self.recipients.contains(&filter.recipients) {
            return Err(MailFormError::UnavailableRecipients(
                filter.recipients.as_str(),
            ));
        }
        if filter.sendto.is_empty() {
            return Err(MailFormError::MissingStatus);
        }
        if let Some(status) = filter
            .sendto
            .iter()
            .find(|s| !self.status_choices.contains(s))
        {
            return Err(MailFormError::UnavailableStatus(status.code()));
        }
        if filter.items.is_empty() {
            return Err(MailFormError::MissingItems);
        }
        if filter.filter_checkins && filter.checkin_lists.is_empty() && !filter.not_checked_in {
            return Err(MailFormError::MissingCheckinFilter);
        }

        let has_range = filter.subevents_from.is_some() || filter.subevents_to.is_some();
        if !self.subevent_filters && (filter.subevent.is_some() || has_range) {
            return Err(MailFormError::UnavailableSubeventFilter);
        }
        if filter.subevent.is_some() && has_range {
            return Err(MailFormError::SubeventAndRange);
        }
        if filter.subevents_from.is_some() != filter.subevents_to.is_some() {
            return Err(MailFormError::IncompleteRange);
        }
        Ok(())
    }
}

impl MailFilter {
    pub fn includes_order(&self, order: &Order, now: DateTime<Utc>) -> bool {
        self.sendto.iter().any(|s| s.matches(order, now))
    }

    /// `subevents` must contain the subevents referenced by the position
    /// when a date range is set.
    pub fn includes_position(&self, position: &OrderPosition, subevents: &[SubEvent]) -> bool {
        if !self.items.contains(&position.item_id) {
            return false;
        }
        if let Some(subevent) = &self.subevent {
            if position.subevent_id.as_ref() != Some(subevent) {
                return false;
            }
        }
        if let (Some(from), Some(to)) = (self.subevents_from, self.subevents_to) {
            let in_range = position
                .subevent_id
                .as_ref()
                .and_then(|id| subevents.iter().find(|s| &s.id == id))
                .map(|s| s.date_from >= from && s.date_from < to)
                .unwrap_or(false);
            if !in_range {
                return false;
            }
        }
        if self.filter_checkins {
            let on_list = position
                .checkins
                .iter()
                .any(|list| self.checkin_lists.contains(list));
            let not_checked_in = self.not_checked_in && position.checkins.is_empty();
            if !(on_list || not_checked_in) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
pub(crate) mod test_factory {
    use super::*;
    use crate::event::EventSettings;
    use chrono::TimeZone;

    pub fn event(has_subevents: bool) -> Event {
        Event {
            id: Default::default(),
            slug: "rustconf".into(),
            name: "Rust Conf".into(),
            date_from: Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap(),
            date_to: None,
            has_subevents,
            settings: EventSettings::default(),
        }
    }

    pub fn filter(items: Vec<ID>) -> MailFilter {
        MailFilter {
            recipients: Recipients::Orders,
            sendto: vec![OrderStatusFilter::Paid, OrderStatusFilter::PendingPayment],
            items,
            filter_checkins: false,
            checkin_lists: Vec::new(),
            not_checked_in: false,
            subevent: None,
            subevents_from: None,
            subevents_to: None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::test_factory::*;
    use super::*;
    use crate::order::test_factory::{order, position};
    use chrono::TimeZone;

    fn texts() -> (LocalizedText, LocalizedText) {
        ("Hello {event}".into(), "Order {order}".into())
    }

    #[test]
    fn config_follows_event_settings() {
        let mut e = event(false);
        let config = MailFormConfig::from_event(&e);
        assert_eq!(
            config.recipients,
            vec![Recipients::Orders, Recipients::Attendees, Recipients::Both]
        );
        assert!(!config.status_choices.contains(&OrderStatusFilter::Overdue));
        assert!(!config.subevent_filters);

        e.settings.attendee_emails_asked = false;
        e.settings.payment_term_expire_automatically = false;
        e.has_subevents = true;
        let config = MailFormConfig::from_event(&e);
        assert_eq!(config.recipients, vec![Recipients::Orders]);
        assert!(config.status_choices.contains(&OrderStatusFilter::Overdue));
        assert!(config.subevent_filters);
    }

    #[test]
    fn validates_filters_against_config() {
        let (subject, message) = texts();
        let mut e = event(false);
        e.settings.attendee_emails_asked = false;
        let config = MailFormConfig::from_event(&e);
        let item = ID::new();

        assert!(config.validate(&filter(vec![item.clone()]), &subject, &message).is_ok());

        let mut f = filter(vec![item.clone()]);
        f.recipients = Recipients::Attendees;
        assert_eq!(
            config.validate(&f, &subject, &message),
            Err(MailFormError::UnavailableRecipients("attendees"))
        );

        let mut f = filter(vec![item.clone()]);
        f.sendto.push(OrderStatusFilter::Overdue);
        assert_eq!(
            config.validate(&f, &subject, &message),
            Err(MailFormError::UnavailableStatus("overdue"))
        );

        assert_eq!(
            config.validate(&filter(vec![]), &subject, &message),
            Err(MailFormError::MissingItems)
        );

        let mut f = filter(vec![item.clone()]);
        f.subevent = Some(ID::new());
        assert_eq!(
            config.validate(&f, &subject, &message),
            Err(MailFormError::UnavailableSubeventFilter)
        );

        let mut f = filter(vec![item]);
        f.filter_checkins = true;
        assert_eq!(
            config.validate(&f, &subject, &message),
            Err(MailFormError::MissingCheckinFilter)
        );
    }

    #[test]
    fn validates_subevent_filters() {
        let (subject, message) = texts();
        let config = MailFormConfig::from_event(&event(true));
        let from = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let mut f = filter(vec![ID::new()]);
        f.subevent = Some(ID::new());
        f.subevents_from = Some(from);
        f.subevents_to = Some(from);
        assert_eq!(
            config.validate(&f, &subject, &message),
            Err(MailFormError::SubeventAndRange)
        );

        f.subevent = None;
        f.subevents_to = None;
        assert_eq!(
            config.validate(&f, &subject, &message),
            Err(MailFormError::IncompleteRange)
        );
    }

    #[test]
    fn validates_texts() {
        let config = MailFormConfig::from_event(&event(false));
        let f = filter(vec![ID::new()]);
        assert_eq!(
            config.validate(&f, &LocalizedText::new(), &"Hi".into()),
            Err(MailFormError::EmptyText("subject"))
        );
        assert!(matches!(
            config.validate(&f, &"Hi".into(), &"Hi {nope}".into()),
            Err(MailFormError::InvalidPlaceholder { field: "message", .. })
        ));
    }

    #[test]
    fn matches_order_status() {
        let e = event(false);
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
        let mut pending = order(&e.id, OrderStatus::Pending, vec![]);
        assert!(OrderStatusFilter::PendingPayment.matches(&pending, now));
        assert!(OrderStatusFilter::Pending.matches(&pending, now));
        assert!(!OrderStatusFilter::PendingApproval.matches(&pending, now));
        assert!(OrderStatusFilter::Overdue.matches(&pending, now));
        pending.require_approval = true;
        assert!(OrderStatusFilter::PendingApproval.matches(&pending, now));
        assert!(!OrderStatusFilter::PendingPayment.matches(&pending, now));

        let paid = order(&e.id, OrderStatus::Paid, vec![]);
        let f = filter(vec![]);
        assert!(f.includes_order(&paid, now));
        let canceled = order(&e.id, OrderStatus::Canceled, vec![]);
        assert!(!f.includes_order(&canceled, now));
    }

    #[test]
    fn matches_positions() {
        let e = event(true);
        let item = ID::new();
        let early = SubEvent {
            id: ID::new(),
            event_id: e.id.clone(),
            name: "Early".into(),
            date_from: Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
            date_to: None,
        };
        let late = SubEvent {
            id: ID::new(),
            date_from: Utc.with_ymd_and_hms(2024, 7, 1, 10, 0, 0).unwrap(),
            ..early.clone()
        };
        let subevents = vec![early.clone(), late.clone()];

        let mut f = filter(vec![item.clone()]);
        let p_early = position(&item, Some(&early.id), None);
        let p_late = position(&item, Some(&late.id), None);
        let p_other = position(&ID::new(), Some(&early.id), None);
        assert!(f.includes_position(&p_early, &subevents));
        assert!(!f.includes_position(&p_other, &subevents));

        f.subevent = Some(late.id.clone());
        assert!(!f.includes_position(&p_early, &subevents));
        assert!(f.includes_position(&p_late, &subevents));

        f.subevent = None;
        f.subevents_from = Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        f.subevents_to = Some(Utc.with_ymd_and_hms(2024, 7, 1, 10, 0, 0).unwrap());
        assert!(f.includes_position(&p_early, &subevents));
        // The end of the range is exclusive
        assert!(!f.includes_position(&p_late, &subevents));
    }

    #[test]
    fn matches_checkins() {
        let item = ID::new();
        let list = ID::new();
        let mut f = filter(vec![item.clone()]);
        f.filter_checkins = true;
        f.checkin_lists = vec![list.clone()];

        let not_checked_in = position(&item, None, None);
        let mut checked_in = position(&item, None, None);
        checked_in.checkins = vec![list];
        let mut other_list = position(&item, None, None);
        other_list.checkins = vec![ID::new()];

        assert!(f.includes_position(&checked_in, &[]));
        assert!(!f.includes_position(&not_checked_in, &[]));
        assert!(!f.includes_position(&other_list, &[]));

        f.not_checked_in = true;
        assert!(f.includes_position(&not_checked_in, &[]));
        assert!(!f.includes_position(&other_list, &[]));
    }
}
