mod create_rule;
mod delete_rule;
mod get_rule;
mod get_rules;
mod get_scheduled_mails;
pub mod send_scheduled_mails;
mod subscribers;
mod sync_scheduled_mails;
mod update_rule;

use actix_web::web;
use chrono::{DateTime, Utc};
use create_rule::create_rule_controller;
use delete_rule::delete_rule_controller;
use event_mailer_domain::{Event, Rule, ScheduledMail, SubEvent};
use get_rule::get_rule_controller;
use get_rules::get_rules_controller;
use get_scheduled_mails::get_scheduled_mails_controller;
use tracing::warn;
use update_rule::update_rule_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/events/{event_id}/sendmail/rules",
        web::post().to(create_rule_controller),
    );
    cfg.route(
        "/events/{event_id}/sendmail/rules",
        web::get().to(get_rules_controller),
    );
    cfg.route(
        "/events/{event_id}/sendmail/rules/{rule_id}",
        web::get().to(get_rule_controller),
    );
    cfg.route(
        "/events/{event_id}/sendmail/rules/{rule_id}",
        web::put().to(update_rule_controller),
    );
    cfg.route(
        "/events/{event_id}/sendmail/rules/{rule_id}",
        web::delete().to(delete_rule_controller),
    );
    cfg.route(
        "/events/{event_id}/sendmail/rules/{rule_id}/scheduled",
        web::get().to(get_scheduled_mails_controller),
    );
}

/// When `mail` is due. `None` if its subevent no longer exists or the rule
/// cannot be resolved against it.
pub(crate) fn resolve_send_time(
    rule: &Rule,
    mail: &ScheduledMail,
    event: &Event,
    subevents: &[SubEvent],
) -> Option<DateTime<Utc>> {
    let tz = event.settings.timezone;
    let send_at = match &mail.subevent_id {
        Some(subevent_id) => match subevents.iter().find(|s| s.id == *subevent_id) {
            Some(subevent) => rule.send_time(subevent, &tz),
            None => {
                warn!(
                    "Scheduled mail {} refers to the unknown subevent {}",
                    mail.id, subevent_id
                );
                return None;
            }
        },
        None => rule.send_time(event, &tz),
    };

    match send_at {
        Ok(send_at) => Some(send_at),
        Err(e) => {
            warn!("Unable to compute the send time of scheduled mail {}: {}", mail.id, e);
            None
        }
    }
}
