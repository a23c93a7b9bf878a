use crate::{rule::send_scheduled_mails::SendScheduledMailsUseCase, shared::usecase::execute};
use actix_web::rt::time::{interval, sleep_until, Instant};
use event_mailer_infra::MailerContext;
use std::time::Duration;

pub fn get_start_delay(now_ts: usize, secs_before_min: usize) -> usize {
    let secs_to_next_minute = 60 - (now_ts / 1000) % 60;
    if secs_to_next_minute > secs_before_min {
        secs_to_next_minute - secs_before_min
    } else {
        secs_to_next_minute + (60 - secs_before_min)
    }
}

/// Periodically sends the scheduled mails that are due, starting at the
/// next full minute
pub fn start_send_scheduled_mails_job(ctx: MailerContext) {
    actix_web::rt::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_run = get_start_delay(now as usize, 0);
        let start = Instant::now() + Duration::from_secs(secs_to_next_run as u64);

        sleep_until(start).await;
        let period = ctx.config.scheduled_mails_interval_secs.max(1);
        let mut scheduled_mails_interval = interval(Duration::from_secs(period));
        loop {
            scheduled_mails_interval.tick().await;
            let context = ctx.clone();
            actix_web::rt::spawn(send_scheduled_mails(context));
        }
    });
}

async fn send_scheduled_mails(context: MailerContext) {
    // Errors are logged by the use case executor
    let _ = execute(SendScheduledMailsUseCase, &context).await;
}
