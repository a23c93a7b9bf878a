use chrono::{TimeZone, Utc};
use event_mailer_api::Application;
use event_mailer_infra::{mail::InMemoryMailBackend, Config, MailerContext, StaticTimeSys};
use event_mailer_sdk::MailerSDK;
use std::sync::Arc;

pub struct TestApp {
    pub config: Config,
    pub ctx: MailerContext,
    pub outbox: Arc<InMemoryMailBackend>,
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, MailerSDK, String) {
    let outbox = Arc::new(InMemoryMailBackend::new());
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    let mut ctx = MailerContext::create_inmemory()
        .with_mail_backend(outbox.clone())
        .with_sys(Arc::new(StaticTimeSys(now.timestamp_millis())));
    ctx.config.port = 0; // Random port
    ctx.config.api_secret_key = "test-secret-key".into();
    ctx.config.mail_from = "noreply@example.org".into();

    let config = ctx.config.clone();
    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let sdk = MailerSDK::new(address.clone(), config.api_secret_key.clone());
    let app = TestApp {
        config,
        ctx,
        outbox,
    };
    (app, sdk, address)
}
