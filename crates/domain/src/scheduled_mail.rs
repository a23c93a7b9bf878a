use crate::{
    rule::Rule,
    shared::entity::{Entity, ID},
};

/// Tracks whether a `Rule` has been sent for one date of an event.
/// `subevent_id` is `None` for events without subevents.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledMail {
    pub id: ID,
    pub rule_id: ID,
    pub event_id: ID,
    pub subevent_id: Option<ID>,
    /// Only ever goes from false to true
    pub sent: bool,
}

impl ScheduledMail {
    pub fn new(rule: &Rule, subevent_id: Option<ID>) -> Self {
        Self {
            id: Default::default(),
            rule_id: rule.id.clone(),
            event_id: rule.event_id.clone(),
            subevent_id,
            sent: false,
        }
    }

    /// Marks the mail as sent. Returns false if it was already sent.
    pub fn mark_sent(&mut self) -> bool {
        if self.sent {
            return false;
        }
        self.sent = true;
        true
    }
}

impl Entity for ScheduledMail {
    fn id(&self) -> &ID {
        &self.id
    }
}
