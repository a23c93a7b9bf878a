use chrono::{DateTime, TimeZone, Utc};
use event_mailer_domain::{
    Event, EventSettings, Item, LocalizedText, Order, OrderPosition, OrderStatus, SubEvent, ID,
};
use event_mailer_infra::MailerContext;

pub fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

/// Stores an event on 2024-06-01 18:00 UTC with a single product
pub async fn seed_event(ctx: &MailerContext, has_subevents: bool) -> (Event, Item) {
    let event = Event {
        id: ID::new(),
        slug: "rustconf".into(),
        name: LocalizedText::new().with("en", "Rust Conf"),
        date_from: utc(2024, 6, 1, 18),
        date_to: Some(utc(2024, 6, 2, 18)),
        has_subevents,
        settings: EventSettings {
            mail_prefix: Some("RC".into()),
            ..Default::default()
        },
    };
    ctx.repos.events.insert(&event).await.unwrap();
    let item = Item {
        id: ID::new(),
        event_id: event.id.clone(),
        name: "Ticket".into(),
    };
    ctx.repos.items.insert(&item).await.unwrap();
    (event, item)
}

pub async fn seed_subevent(ctx: &MailerContext, event: &Event, date_from: DateTime<Utc>) -> SubEvent {
    let subevent = SubEvent {
        id: ID::new(),
        event_id: event.id.clone(),
        name: "Date".into(),
        date_from,
        date_to: None,
    };
    ctx.repos.subevents.insert(&subevent).await.unwrap();
    subevent
}

pub async fn seed_order(
    ctx: &MailerContext,
    event: &Event,
    item: &Item,
    email: &str,
    status: OrderStatus,
) -> Order {
    let order = Order {
        id: ID::new(),
        code: "ABC12".into(),
        event_id: event.id.clone(),
        email: Some(email.into()),
        locale: "en".into(),
        status,
        require_approval: false,
        expires: utc(2024, 5, 20, 0),
        invoice_name: Some("Jane Buyer".into()),
        positions: vec![OrderPosition {
            id: ID::new(),
            item_id: item.id.clone(),
            subevent_id: None,
            attendee_name: None,
            attendee_email: None,
            checkins: Vec::new(),
        }],
    };
    ctx.repos.orders.insert(&order).await.unwrap();
    order
}
