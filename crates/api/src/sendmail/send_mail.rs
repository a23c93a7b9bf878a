use crate::{
    error::MailerError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use event_mailer_api_structs::send_mail::*;
use event_mailer_domain::{
    bulk_recipients, LocalizedText, MailAttachment, MailFilter, MailFormConfig, MailFormError,
    MailLogEntry, ID,
};
use event_mailer_infra::{
    mail::{compose_mail, mail_send, MailFile},
    MailerContext,
};
use std::sync::Arc;
use tracing::info;

pub async fn send_mail_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<MailerContext>,
) -> Result<HttpResponse, MailerError> {
    protect_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = SendMailUseCase {
        event_id: path.event_id.clone(),
        subject: body.subject,
        message: body.message,
        filter: body.filter,
        attachment: body.attachment,
    };

    execute(usecase, &ctx)
        .await
        .map(|entry| HttpResponse::Ok().json(APIResponse::new(entry.sent_count)))
        .map_err(MailerError::from)
}

/// Sends a mail to every order or attendee matching the filter and
/// records it in the mail log
#[derive(Debug)]
pub struct SendMailUseCase {
    pub event_id: ID,
    pub subject: LocalizedText,
    pub message: LocalizedText,
    pub filter: MailFilter,
    pub attachment: Option<MailAttachment>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EventNotFound(ID),
    InvalidForm(MailFormError),
    UnknownProduct(ID),
    UnknownSubEvent(ID),
    NoRecipients,
    StorageError,
}

impl From<UseCaseError> for MailerError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EventNotFound(id) => {
                Self::NotFound(format!("The event with id: {}, was not found.", id))
            }
            UseCaseError::InvalidForm(e) => Self::BadClientData(e.to_string()),
            UseCaseError::UnknownProduct(id) => Self::BadClientData(format!(
                "The product {} does not belong to this event",
                id
            )),
            UseCaseError::UnknownSubEvent(id) => Self::BadClientData(format!(
                "The date {} does not belong to this event",
                id
            )),
            UseCaseError::NoRecipients => {
                Self::BadClientData("There are no orders matching this selection.".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendMailUseCase {
    type Response = MailLogEntry;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &MailerContext) -> Result<Self::Response, Self::Errors> {
        let event = ctx
            .repos
            .events
            .find(&self.event_id)
            .await
            .ok_or_else(|| UseCaseError::EventNotFound(self.event_id.clone()))?;

        MailFormConfig::from_event(&event)
            .validate(&self.filter, &self.subject, &self.message)
            .map_err(UseCaseError::InvalidForm)?;
        let attachment = match &self.attachment {
            Some(attachment) => Some(Arc::new(MailFile {
                content: attachment.decode().map_err(UseCaseError::InvalidForm)?,
                filename: attachment.filename.clone(),
                content_type: attachment.content_type.clone(),
            })),
            None => None,
        };

        let items = ctx.repos.items.find_by_event(&event.id).await;
        if let Some(unknown) = self
            .filter
            .items
            .iter()
            .find(|id| !items.iter().any(|item| item.id == **id))
        {
            return Err(UseCaseError::UnknownProduct(unknown.clone()));
        }

        let subevents = ctx.repos.subevents.find_by_event(&event.id).await;
        if let Some(subevent_id) = &self.filter.subevent {
            if !subevents.iter().any(|s| s.id == *subevent_id) {
                return Err(UseCaseError::UnknownSubEvent(subevent_id.clone()));
            }
        }

        let now = ctx.sys.now();
        let orders = ctx
            .repos
            .orders
            .find_by_event(&event.id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        let recipients = bulk_recipients(&self.filter, &orders, &subevents, now);
        if recipients.is_empty() {
            return Err(UseCaseError::NoRecipients);
        }

        let mut sent_count = 0;
        for recipient in &recipients {
            let mut mail = compose_mail(
                &event,
                recipient,
                &self.subject,
                &self.message,
                &ctx.config.mail_from,
            );
            mail.attachment = attachment.clone();
            if mail_send(ctx.mail_backend.as_ref(), &mail).await {
                sent_count += 1;
            }
        }
        info!(
            "Sent {} of {} mails for event {}",
            sent_count,
            recipients.len(),
            event.id
        );

        let entry = MailLogEntry {
            id: Default::default(),
            event_id: event.id.clone(),
            created: now,
            subject: self.subject.clone(),
            message: self.message.clone(),
            recipients: self.filter.recipients,
            sendto: self.filter.sendto.clone(),
            items: self.filter.items.clone(),
            subevent_id: self.filter.subevent.clone(),
            sent_count,
        };
        ctx.repos
            .mail_log
            .insert(&entry)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(entry)
    }
}
