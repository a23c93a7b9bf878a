use crate::{
    event::{Event, SubEvent},
    mail_form::MailFilter,
    order::{Order, OrderPosition},
    placeholders::{MailContext, EVENT, ORDER, POSITION_OR_ADDRESS},
    rule::{Rule, SendTo},
    shared::entity::ID,
};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// One mail to be rendered and sent
#[derive(Debug, Clone, PartialEq)]
pub struct Recipient {
    pub email: String,
    pub locale: String,
    pub order_id: ID,
    pub order_code: String,
    /// Set when the mail is addressed to an attendee
    pub position_id: Option<ID>,
    /// Attendee name for attendee mails, invoice name for order mails
    pub position_or_address: String,
}

impl Recipient {
    fn for_order(order: &Order, email: &str) -> Self {
        Self {
            email: email.to_string(),
            locale: order.locale.clone(),
            order_id: order.id.clone(),
            order_code: order.code.clone(),
            position_id: None,
            position_or_address: order.invoice_name.clone().unwrap_or_default(),
        }
    }

    fn for_position(order: &Order, position: &OrderPosition, email: &str) -> Self {
        let name = position
            .attendee_name
            .clone()
            .or_else(|| order.invoice_name.clone())
            .unwrap_or_default();
        Self {
            position_id: Some(position.id.clone()),
            position_or_address: name,
            ..Self::for_order(order, email)
        }
    }

    /// Placeholder values for this recipient, localized to its locale
    pub fn context(&self, event: &Event) -> MailContext {
        let mut ctx = MailContext::new();
        ctx.insert(EVENT.into(), event.name.localize(&self.locale).to_string());
        ctx.insert(ORDER.into(), self.order_code.clone());
        ctx.insert(POSITION_OR_ADDRESS.into(), self.position_or_address.clone());
        ctx
    }
}

/// Collects the recipients of a single order, skipping addresses that
/// were already added for this order.
struct OrderRecipients<'a> {
    order: &'a Order,
    seen: HashSet<String>,
    out: &'a mut Vec<Recipient>,
}

impl<'a> OrderRecipients<'a> {
    fn new(order: &'a Order, out: &'a mut Vec<Recipient>) -> Self {
        Self {
            order,
            seen: HashSet::new(),
            out,
        }
    }

    fn add_order(&mut self) {
        if let Some(email) = self.order.contact_email() {
            if self.seen.insert(email.to_lowercase()) {
                self.out.push(Recipient::for_order(self.order, email));
            }
        }
    }

    fn add_position(&mut self, position: &OrderPosition) {
        if let Some(email) = position.email_or(self.order) {
            if self.seen.insert(email.to_lowercase()) {
                self.out
                    .push(Recipient::for_position(self.order, position, email));
            }
        }
    }
}

/// Recipients of a bulk mail. An order is included when its status matches
/// and at least one of its positions passes the filter.
pub fn bulk_recipients(
    filter: &MailFilter,
    orders: &[Order],
    subevents: &[SubEvent],
    now: DateTime<Utc>,
) -> Vec<Recipient> {
    let mut recipients = Vec::new();
    for order in orders.iter().filter(|o| filter.includes_order(o, now)) {
        let positions = order
            .positions
            .iter()
            .filter(|p| filter.includes_position(p, subevents))
            .collect::<Vec<_>>();
        if positions.is_empty() {
            continue;
        }

        let mut collector = OrderRecipients::new(order, &mut recipients);
        if filter.recipients.includes_orders() {
            collector.add_order();
        }
        if filter.recipients.includes_attendees() {
            for position in positions {
                collector.add_position(position);
            }
        }
    }
    recipients
}

/// Recipients of a scheduled mail of `rule` for one date of the event
pub fn rule_recipients(rule: &Rule, orders: &[Order], subevent_id: Option<&ID>) -> Vec<Recipient> {
    let mut recipients = Vec::new();
    for order in orders
        .iter()
        .filter(|o| o.event_id == rule.event_id && rule.includes_order(o))
    {
        let positions = order
            .positions
            .iter()
            .filter(|p| rule.includes_position(p, subevent_id))
            .collect::<Vec<_>>();
        if positions.is_empty() {
            continue;
        }

        let mut collector = OrderRecipients::new(order, &mut recipients);
        match rule.send_to {
            SendTo::Customers => collector.add_order(),
            SendTo::Attendees => {
                for position in positions {
                    collector.add_position(position);
                }
            }
        }
    }
    recipients
}
