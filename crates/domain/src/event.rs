use crate::shared::{entity::Entity, entity::ID, localized::LocalizedText};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A ticketed `Event`. Events with `has_subevents` set are a series of dates,
/// each date being a `SubEvent`.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: ID,
    pub slug: String,
    pub name: LocalizedText,
    pub date_from: DateTime<Utc>,
    pub date_to: Option<DateTime<Utc>>,
    pub has_subevents: bool,
    pub settings: EventSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSettings {
    /// Default locale of the event
    pub locale: String,
    /// All locales the event is available in
    pub locales: Vec<String>,
    /// Timezone the event takes place in. Relative send times are computed
    /// in this timezone.
    pub timezone: Tz,
    /// Sender address, the global default is used when not set
    pub mail_from: Option<String>,
    /// Prefix put in brackets in front of every subject
    pub mail_prefix: Option<String>,
    pub attendee_emails_asked: bool,
    pub payment_term_expire_automatically: bool,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            locale: "en".into(),
            locales: vec!["en".into()],
            timezone: Tz::UTC,
            mail_from: None,
            mail_prefix: None,
            attendee_emails_asked: true,
            payment_term_expire_automatically: true,
        }
    }
}

/// A single date of an `Event` series
#[derive(Debug, Clone, PartialEq)]
pub struct SubEvent {
    pub id: ID,
    pub event_id: ID,
    pub name: LocalizedText,
    pub date_from: DateTime<Utc>,
    pub date_to: Option<DateTime<Utc>>,
}

/// Anything with a start and an optional end that scheduled mails can
/// be anchored to.
pub trait Occurrence {
    fn date_from(&self) -> DateTime<Utc>;
    fn date_to(&self) -> Option<DateTime<Utc>>;

    fn local_date_from(&self, tz: &Tz) -> DateTime<Tz> {
        self.date_from().with_timezone(tz)
    }

    fn local_date_to(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        self.date_to().map(|d| d.with_timezone(tz))
    }
}

impl Occurrence for Event {
    fn date_from(&self) -> DateTime<Utc> {
        self.date_from
    }
    fn date_to(&self) -> Option<DateTime<Utc>> {
        self.date_to
    }
}

impl Occurrence for SubEvent {
    fn date_from(&self) -> DateTime<Utc> {
        self.date_from
    }
    fn date_to(&self) -> Option<DateTime<Utc>> {
        self.date_to
    }
}

impl Entity for Event {
    fn id(&self) -> &ID {
        &self.id
    }
}

impl Entity for SubEvent {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// A product sold for an `Event`
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ID,
    pub event_id: ID,
    pub name: LocalizedText,
}

impl Entity for Item {
    fn id(&self) -> &ID {
        &self.id
    }
}
