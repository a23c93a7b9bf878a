use super::{IMailBackend, OutgoingMail};
use crate::config::SmtpConfig;
use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, info};

/// Delivers mails through an SMTP relay
pub struct SmtpMailBackend {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailBackend {
    /// Uses STARTTLS when credentials are configured, a plain connection
    /// to a local relay otherwise.
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let mut builder = match (&config.username, &config.password) {
            (Some(username), Some(password)) => {
                debug!("Using STARTTLS relay {}", config.host);
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
                    .credentials(Credentials::new(username.clone(), password.clone()))
            }
            _ => {
                debug!("Using unauthenticated relay {}", config.host);
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            }
        };
        if let Some(port) = config.port {
            builder = builder.port(port);
        }
        Ok(Self {
            transport: builder.build(),
        })
    }

    fn build_message(mail: &OutgoingMail) -> anyhow::Result<Message> {
        let builder = Message::builder()
            .from(mail.from.parse::<Mailbox>()?)
            .to(mail.to.parse::<Mailbox>()?)
            .subject(&mail.subject);

        let message = match &mail.attachment {
            Some(file) => {
                let content_type = ContentType::parse(&file.content_type)?;
                builder.multipart(
                    MultiPart::mixed()
                        .singlepart(SinglePart::plain(mail.body.clone()))
                        .singlepart(
                            Attachment::new(file.filename.clone())
                                .body(file.content.clone(), content_type),
                        ),
                )?
            }
            None => builder
                .header(ContentType::TEXT_PLAIN)
                .body(mail.body.clone())?,
        };
        Ok(message)
    }
}

#[async_trait::async_trait]
impl IMailBackend for SmtpMailBackend {
    async fn send(&self, mail: &OutgoingMail) -> anyhow::Result<()> {
        let message = Self::build_message(mail)?;
        let response = self.transport.send(message).await?;
        info!("Mail sent to {} (response: {:?})", mail.to, response.code());
        Ok(())
    }
}
