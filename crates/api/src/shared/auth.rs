use crate::error::MailerError;
use actix_web::HttpRequest;
use event_mailer_infra::MailerContext;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Only clients knowing the api secret key may use the mailer routes
pub fn protect_route(http_req: &HttpRequest, ctx: &MailerContext) -> Result<(), MailerError> {
    let api_key = http_req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            MailerError::Unauthorized(format!(
                "Unable to find the api key. Expected a `{}` header",
                API_KEY_HEADER
            ))
        })?;

    if api_key != ctx.config.api_secret_key {
        return Err(MailerError::Unauthorized("Invalid api key provided".into()));
    }
    Ok(())
}
