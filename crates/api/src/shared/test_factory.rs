use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use event_mailer_domain::{
    Event, EventSettings, Item, LocalizedText, Order, OrderPosition, OrderStatus, RuleInput,
    ScheduleFields, SendTo, SubEvent, ID,
};
use event_mailer_infra::{mail::InMemoryMailBackend, MailerContext, StaticTimeSys};
use std::sync::Arc;

pub struct TestContext {
    pub ctx: MailerContext,
    pub outbox: Arc<InMemoryMailBackend>,
    pub event: Event,
    pub item: Item,
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// An event on 2024-06-01 18:00 UTC with one product, "now" pinned to `now`
pub async fn setup(has_subevents: bool, now: DateTime<Utc>) -> TestContext {
    let outbox = Arc::new(InMemoryMailBackend::new());
    let mut ctx = MailerContext::create_inmemory()
        .with_mail_backend(outbox.clone())
        .with_sys(Arc::new(StaticTimeSys(now.timestamp_millis())));
    ctx.config.mail_from = "noreply@example.org".into();

    let event = Event {
        id: ID::new(),
        slug: "rustconf".into(),
        name: LocalizedText::new()
            .with("en", "Rust Conf")
            .with("de", "Rust Konferenz"),
        date_from: utc(2024, 6, 1, 18, 0),
        date_to: None,
        has_subevents,
        settings: EventSettings::default(),
    };
    ctx.repos.events.insert(&event).await.unwrap();
    let item = Item {
        id: ID::new(),
        event_id: event.id.clone(),
        name: "Ticket".into(),
    };
    ctx.repos.items.insert(&item).await.unwrap();

    TestContext {
        ctx,
        outbox,
        event,
        item,
    }
}

pub async fn add_subevent(
    ctx: &MailerContext,
    event: &Event,
    date_from: DateTime<Utc>,
    date_to: Option<DateTime<Utc>>,
) -> SubEvent {
    let subevent = SubEvent {
        id: ID::new(),
        event_id: event.id.clone(),
        name: "Date".into(),
        date_from,
        date_to,
    };
    ctx.repos.subevents.insert(&subevent).await.unwrap();
    subevent
}

pub fn position(item: &Item, subevent: Option<&SubEvent>, email: Option<&str>) -> OrderPosition {
    OrderPosition {
        id: ID::new(),
        item_id: item.id.clone(),
        subevent_id: subevent.map(|s| s.id.clone()),
        attendee_name: Some("Ann Attendee".into()),
        attendee_email: email.map(String::from),
        checkins: Vec::new(),
    }
}

pub async fn add_order(
    ctx: &MailerContext,
    event: &Event,
    email: &str,
    status: OrderStatus,
    positions: Vec<OrderPosition>,
) -> Order {
    let order = Order {
        id: ID::new(),
        code: format!("ORD{}", &ID::new().as_string()[..4]),
        event_id: event.id.clone(),
        email: Some(email.into()),
        locale: "en".into(),
        status,
        require_approval: false,
        expires: utc(2024, 5, 1, 0, 0),
        invoice_name: Some("Jane Buyer".into()),
        positions,
    };
    ctx.repos.orders.insert(&order).await.unwrap();
    order
}

/// Offset of `days` days at `hour`:00, relative to the start of the event
pub fn relative_schedule(days: i64, hour: u32, is_after: bool) -> ScheduleFields {
    ScheduleFields {
        date_is_absolute: false,
        send_date: None,
        send_offset_days: Some(days),
        send_offset_time: NaiveTime::from_hms_opt(hour, 0, 0),
        offset_is_after: Some(is_after),
        offset_to_event_end: Some(false),
    }
}

pub fn rule_input(schedule: ScheduleFields) -> RuleInput {
    RuleInput {
        subject: LocalizedText::new().with("en", "See you at {event}"),
        template: LocalizedText::new().with("en", "Hi {position_or_address}, order {order}"),
        all_products: true,
        limit_products: Vec::new(),
        include_pending: false,
        schedule,
        send_to: SendTo::Customers,
    }
}
