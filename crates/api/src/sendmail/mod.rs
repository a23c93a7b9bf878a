mod get_mail_form_config;
mod get_mail_history;
mod send_mail;

use actix_web::web;
use get_mail_form_config::get_mail_form_config_controller;
use get_mail_history::get_mail_history_controller;
use send_mail::send_mail_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/events/{event_id}/sendmail/config",
        web::get().to(get_mail_form_config_controller),
    );
    // Room for a base64 encoded attachment of up to 10 MiB
    cfg.service(
        web::resource("/events/{event_id}/sendmail")
            .app_data(web::JsonConfig::default().limit(16 * 1024 * 1024))
            .route(web::post().to(send_mail_controller)),
    );
    cfg.route(
        "/events/{event_id}/sendmail/history",
        web::get().to(get_mail_history_controller),
    );
}
