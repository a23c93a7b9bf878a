mod inmemory;
mod smtp;

pub use inmemory::InMemoryMailBackend;
pub use smtp::SmtpMailBackend;

use event_mailer_domain::{placeholders, Event, LocalizedText, Recipient};
use std::sync::Arc;
use tracing::{error, warn};

/// A decoded file attached to an `OutgoingMail`
#[derive(Debug, Clone, PartialEq)]
pub struct MailFile {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

/// A rendered mail, ready to be handed to a `IMailBackend`
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    /// Shared by every mail of a bulk send
    pub attachment: Option<Arc<MailFile>>,
}

#[async_trait::async_trait]
pub trait IMailBackend: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> anyhow::Result<()>;
}

/// Renders `subject` and `template` for `recipient` in the recipient's
/// locale. The subject gets the event's mail prefix and the body gets a
/// footer naming the event.
pub fn compose_mail(
    event: &Event,
    recipient: &Recipient,
    subject: &LocalizedText,
    template: &LocalizedText,
    default_from: &str,
) -> OutgoingMail {
    let ctx = recipient.context(event);
    let locale = recipient.locale.as_str();

    let mut subject = placeholders::render(subject.localize(locale), &ctx);
    if let Some(prefix) = event.settings.mail_prefix.as_deref().filter(|p| !p.is_empty()) {
        subject = format!("[{}] {}", prefix, subject);
    }

    let mut body = placeholders::render(template.localize(locale), &ctx);
    body.push_str("\r\n\r\n----\r\n");
    body.push_str(&format!(
        "You are receiving this e-mail because you placed an order for {}.",
        event.name.localize(locale)
    ));
    body.push_str("\r\n");

    let from = event
        .settings
        .mail_from
        .clone()
        .filter(|from| !from.trim().is_empty())
        .unwrap_or_else(|| default_from.to_string());

    OutgoingMail {
        from,
        to: recipient.email.clone(),
        subject,
        body,
        attachment: None,
    }
}

/// Hands the mail to the backend. Failures are logged and reported as
/// `false`, they are never retried.
pub async fn mail_send(backend: &dyn IMailBackend, mail: &OutgoingMail) -> bool {
    if mail.to.trim().is_empty() {
        warn!("Not sending mail {:?} without a recipient", mail.subject);
        return false;
    }
    match backend.send(mail).await {
        Ok(_) => true,
        Err(e) => {
            error!("Error sending e-mail to {}: {:?}", mail.to, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use event_mailer_domain::{EventSettings, ID};

    fn event() -> Event {
        Event {
            id: Default::default(),
            slug: "rustconf".into(),
            name: LocalizedText::new()
                .with("en", "Rust Conf")
                .with("de", "Rust Konferenz"),
            date_from: Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap(),
            date_to: None,
            has_subevents: false,
            settings: EventSettings::default(),
        }
    }

    fn recipient(locale: &str) -> Recipient {
        Recipient {
            email: "buyer@example.org".into(),
            locale: locale.into(),
            order_id: ID::new(),
            order_code: "ABC12".into(),
            position_id: None,
            position_or_address: "Jane Buyer".into(),
        }
    }

    #[test]
    fn composes_localized_mail_with_footer() {
        let subject = LocalizedText::new()
            .with("en", "Your ticket for {event}")
            .with("de", "Dein Ticket für {event}");
        let template = LocalizedText::new().with("en", "Hi {position_or_address}, order {order}");

        let mail = compose_mail(&event(), &recipient("de"), &subject, &template, "noreply@localhost");
        assert_eq!(mail.from, "noreply@localhost");
        assert_eq!(mail.to, "buyer@example.org");
        assert_eq!(mail.subject, "Dein Ticket für Rust Konferenz");
        assert_eq!(
            mail.body,
            "Hi Jane Buyer, order ABC12\r\n\r\n----\r\nYou are receiving this e-mail because you placed an order for Rust Konferenz.\r\n"
        );
    }

    #[test]
    fn uses_event_sender_and_prefix() {
        let mut e = event();
        e.settings.mail_from = Some("tickets@rustconf.org".into());
        e.settings.mail_prefix = Some("RC24".into());
        let mail = compose_mail(&e, &recipient("en"), &"Hello".into(), &"Body".into(), "noreply@localhost");
        assert_eq!(mail.from, "tickets@rustconf.org");
        assert_eq!(mail.subject, "[RC24] Hello");
    }

    struct FailingBackend;

    #[async_trait::async_trait]
    impl IMailBackend for FailingBackend {
        async fn send(&self, _mail: &OutgoingMail) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("connection refused"))
        }
    }

    #[tokio::test]
    async fn mail_send_reports_failures() {
        let mail = compose_mail(&event(), &recipient("en"), &"Hello".into(), &"Body".into(), "noreply@localhost");

        let outbox = InMemoryMailBackend::new();
        assert!(mail_send(&outbox, &mail).await);
        assert_eq!(outbox.sent(), vec![mail.clone()]);

        assert!(!mail_send(&FailingBackend, &mail).await);

        let mut without_recipient = mail;
        without_recipient.to = "".into();
        assert!(!mail_send(&outbox, &without_recipient).await);
        assert_eq!(outbox.sent().len(), 1);
    }
}
