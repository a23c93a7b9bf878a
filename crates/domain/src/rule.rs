use crate::{
    event::{Event, Item, Occurrence, SubEvent},
    order::{Order, OrderPosition, OrderStatus},
    placeholders::{self, MAIL_PLACEHOLDERS},
    shared::{
        entity::{Entity, ID},
        localized::LocalizedText,
    },
};
use chrono::{DateTime, Days, Duration, LocalResult, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),
    #[error("Please specify a product")]
    MissingProductFilter,
    #[error("The product {0} does not belong to this event")]
    UnknownProduct(ID),
    #[error("The rule is relative to the end of the event, but the event has no end date")]
    MissingAnchor,
    #[error("The {field} uses unavailable placeholders: {invalid}. Available placeholders: {available}")]
    InvalidPlaceholder {
        field: &'static str,
        invalid: String,
        available: String,
    },
    #[error("The {0} must not be empty")]
    EmptyText(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendTo {
    Customers,
    Attendees,
}

impl SendTo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::Attendees => "attendees",
        }
    }
}

impl std::str::FromStr for SendTo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customers" => Ok(Self::Customers),
            "attendees" => Ok(Self::Attendees),
            _ => Err(format!("Unknown recipients: {}", s)),
        }
    }
}

/// A send time relative to the start or end of an event or subevent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeOffset {
    /// Number of days between the anchor date and the send date
    pub days: u32,
    /// Time of day on the send date
    pub time: NaiveTime,
    pub is_after: bool,
    pub to_event_end: bool,
}

impl RelativeOffset {
    /// Computes the send time for an occurrence starting at `date_from` and
    /// ending at `date_to`. The day is shifted in the anchor's timezone and
    /// the time of day is replaced by `self.time`, the result keeps the
    /// anchor's timezone.
    pub fn resolve<Tz: TimeZone>(
        &self,
        date_from: &DateTime<Tz>,
        date_to: Option<&DateTime<Tz>>,
    ) -> Result<DateTime<Tz>, RuleError> {
        let anchor = if self.to_event_end {
            date_to.ok_or(RuleError::MissingAnchor)?
        } else {
            date_from
        };

        let days = Days::new(u64::from(self.days));
        let date = anchor.date_naive();
        let date = if self.is_after {
            date.checked_add_days(days)
        } else {
            date.checked_sub_days(days)
        }
        .ok_or_else(|| RuleError::InvalidSchedule("The offset is out of range".into()))?;

        let local = date.and_time(self.time);
        let tz = anchor.timezone();
        match tz.from_local_datetime(&local) {
            LocalResult::Single(dt) => Ok(dt),
            LocalResult::Ambiguous(earliest, _) => Ok(earliest),
            // The local time falls into a DST gap
            LocalResult::None => tz
                .from_local_datetime(&(local + Duration::hours(1)))
                .earliest()
                .ok_or_else(|| {
                    RuleError::InvalidSchedule(format!("{} does not exist in this timezone", local))
                }),
        }
    }
}

/// When a `Rule` fires: either at a fixed date or relative to every date
/// of the event.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleSchedule {
    Absolute { send_date: DateTime<Utc> },
    Relative(RelativeOffset),
}

/// The flat representation of a `RuleSchedule`, as it is submitted by clients
/// and stored in the database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleFields {
    pub date_is_absolute: bool,
    #[serde(default)]
    pub send_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub send_offset_days: Option<i64>,
    #[serde(default)]
    pub send_offset_time: Option<NaiveTime>,
    #[serde(default)]
    pub offset_is_after: Option<bool>,
    #[serde(default)]
    pub offset_to_event_end: Option<bool>,
}

impl RuleSchedule {
    /// Validates that exactly one of the absolute date and the relative
    /// offset is given.
    pub fn from_fields(fields: &ScheduleFields) -> Result<Self, RuleError> {
        let has_offset = fields.send_offset_days.is_some()
            || fields.send_offset_time.is_some()
            || fields.offset_is_after.is_some()
            || fields.offset_to_event_end.is_some();
        if fields.date_is_absolute {
            let send_date = fields
                .send_date
                .ok_or_else(|| RuleError::InvalidSchedule("Please specify the send date".into()))?;
            if has_offset {
                return Err(RuleError::InvalidSchedule(
                    "An absolute schedule must not have an offset".into(),
                ));
            }
            return Ok(Self::Absolute { send_date });
        }

        if fields.send_date.is_some() {
            return Err(RuleError::InvalidSchedule(
                "A relative schedule must not have a send date".into(),
            ));
        }
        let (days, time, is_after, to_event_end) = match (
            fields.send_offset_days,
            fields.send_offset_time,
            fields.offset_is_after,
            fields.offset_to_event_end,
        ) {
            (Some(days), Some(time), Some(is_after), Some(to_event_end)) => {
                (days, time, is_after, to_event_end)
            }
            _ => {
                return Err(RuleError::InvalidSchedule(
                    "Please specify the offset days and time".into(),
                ))
            }
        };
        let days = u32::try_from(days).map_err(|_| {
            RuleError::InvalidSchedule("The number of offset days must not be negative".into())
        })?;

        Ok(Self::Relative(RelativeOffset {
            days,
            time,
            is_after,
            to_event_end,
        }))
    }

    pub fn to_fields(&self) -> ScheduleFields {
        match self {
            Self::Absolute { send_date } => ScheduleFields {
                date_is_absolute: true,
                send_date: Some(*send_date),
                ..Default::default()
            },
            Self::Relative(offset) => ScheduleFields {
                date_is_absolute: false,
                send_date: None,
                send_offset_days: Some(i64::from(offset.days)),
                send_offset_time: Some(offset.time),
                offset_is_after: Some(offset.is_after),
                offset_to_event_end: Some(offset.to_event_end),
            },
        }
    }

    /// The send time for an occurrence, in the occurrence's timezone
    pub fn resolve<Tz: TimeZone>(
        &self,
        date_from: &DateTime<Tz>,
        date_to: Option<&DateTime<Tz>>,
    ) -> Result<DateTime<Tz>, RuleError> {
        match self {
            Self::Absolute { send_date } => Ok(send_date.with_timezone(&date_from.timezone())),
            Self::Relative(offset) => offset.resolve(date_from, date_to),
        }
    }
}

/// A `Rule` describes when and to whom a scheduled mail is sent
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub id: ID,
    pub event_id: ID,
    pub subject: LocalizedText,
    pub template: LocalizedText,
    /// Send to buyers of all products, otherwise only of `limit_products`
    pub all_products: bool,
    pub limit_products: Vec<ID>,
    /// Also send to orders that are not paid yet
    pub include_pending: bool,
    pub schedule: RuleSchedule,
    pub send_to: SendTo,
}

/// Unvalidated content of a `Rule`
#[derive(Debug, Clone)]
pub struct RuleInput {
    pub subject: LocalizedText,
    pub template: LocalizedText,
    pub all_products: bool,
    pub limit_products: Vec<ID>,
    pub include_pending: bool,
    pub schedule: ScheduleFields,
    pub send_to: SendTo,
}

fn validate_text(text: &LocalizedText, field: &'static str) -> Result<(), RuleError> {
    if text.is_blank() {
        return Err(RuleError::EmptyText(field));
    }
    let invalid = placeholders::invalid_placeholders(text, MAIL_PLACEHOLDERS);
    if !invalid.is_empty() {
        return Err(RuleError::InvalidPlaceholder {
            field,
            invalid: invalid
                .iter()
                .map(|p| format!("{{{}}}", p))
                .collect::<Vec<_>>()
                .join(", "),
            available: placeholders::describe(MAIL_PLACEHOLDERS),
        });
    }
    Ok(())
}

impl Rule {
    pub fn new(event_id: ID, input: RuleInput) -> Result<Self, RuleError> {
        let mut rule = Self {
            id: Default::default(),
            event_id,
            subject: Default::default(),
            template: Default::default(),
            all_products: true,
            limit_products: Vec::new(),
            include_pending: false,
            schedule: RuleSchedule::Absolute {
                send_date: Utc::now(),
            },
            send_to: SendTo::Customers,
        };
        rule.update(input)?;
        Ok(rule)
    }

    /// Replaces the content of the rule. The rule is left untouched when
    /// `input` is invalid.
    pub fn update(&mut self, input: RuleInput) -> Result<(), RuleError> {
        validate_text(&input.subject, "subject")?;
        validate_text(&input.template, "message")?;
        let schedule = RuleSchedule::from_fields(&input.schedule)?;

        let limit_products = if input.all_products {
            // Selected products are ignored when all products are included
            Vec::new()
        } else if input.limit_products.is_empty() {
            return Err(RuleError::MissingProductFilter);
        } else {
            let mut products = input.limit_products;
            products.sort();
            products.dedup();
            products
        };

        self.subject = input.subject;
        self.template = input.template;
        self.all_products = input.all_products;
        self.limit_products = limit_products;
        self.include_pending = input.include_pending;
        self.schedule = schedule;
        self.send_to = input.send_to;
        Ok(())
    }

    pub fn date_is_absolute(&self) -> bool {
        matches!(self.schedule, RuleSchedule::Absolute { .. })
    }

    pub fn includes_order(&self, order: &Order) -> bool {
        match order.status {
            OrderStatus::Paid => true,
            OrderStatus::Pending => self.include_pending,
            OrderStatus::Expired | OrderStatus::Canceled => false,
        }
    }

    /// The send time of this rule for one date of an event taking place in `tz`
    pub fn send_time<O: Occurrence>(
        &self,
        occurrence: &O,
        tz: &chrono_tz::Tz,
    ) -> Result<DateTime<Utc>, RuleError> {
        let date_to = occurrence.local_date_to(tz);
        self.schedule
            .resolve(&occurrence.local_date_from(tz), date_to.as_ref())
            .map(|send_at| send_at.with_timezone(&Utc))
    }

    /// Checks that the limited products are sold for `event` and that a send
    /// time can be computed for the event, or for every subevent of it.
    pub fn validate_for_event(
        &self,
        event: &Event,
        items: &[Item],
        subevents: &[SubEvent],
    ) -> Result<(), RuleError> {
        if let Some(unknown) = self
            .limit_products
            .iter()
            .find(|id| !items.iter().any(|item| item.id == **id && item.event_id == event.id))
        {
            return Err(RuleError::UnknownProduct(unknown.clone()));
        }

        let tz = event.settings.timezone;
        if event.has_subevents {
            for subevent in subevents {
                self.send_time(subevent, &tz)?;
            }
        } else {
            self.send_time(event, &tz)?;
        }
        Ok(())
    }

    /// Whether the position is targeted by this rule for the given date of the event
    pub fn includes_position(&self, position: &OrderPosition, subevent_id: Option<&ID>) -> bool {
        let product_matches = self.all_products || self.limit_products.contains(&position.item_id);
        let subevent_matches = match subevent_id {
            Some(id) => position.subevent_id.as_ref() == Some(id),
            None => true,
        };
        product_matches && subevent_matches
    }
}

impl Entity for Rule {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
pub(crate) mod test_factory {
    use super::*;

    pub fn relative_fields(
        days: i64,
        time: NaiveTime,
        is_after: bool,
        to_event_end: bool,
    ) -> ScheduleFields {
        ScheduleFields {
            date_is_absolute: false,
            send_date: None,
            send_offset_days: Some(days),
            send_offset_time: Some(time),
            offset_is_after: Some(is_after),
            offset_to_event_end: Some(to_event_end),
        }
    }

    pub fn rule_input(schedule: ScheduleFields) -> RuleInput {
        RuleInput {
            subject: LocalizedText::new().with("en", "See you at {event}"),
            template: LocalizedText::new().with("en", "Your order {order}"),
            all_products: true,
            limit_products: Vec::new(),
            include_pending: false,
            schedule,
            send_to: SendTo::Customers,
        }
    }
}
