use crate::{
    error::MailerError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use event_mailer_api_structs::get_mail_history::*;
use event_mailer_domain::{MailLogEntry, ID};
use event_mailer_infra::MailerContext;

pub async fn get_mail_history_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<MailerContext>,
) -> Result<HttpResponse, MailerError> {
    protect_route(&http_req, &ctx)?;

    let usecase = GetMailHistoryUseCase {
        event_id: path.event_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|entries| HttpResponse::Ok().json(APIResponse::new(entries)))
        .map_err(MailerError::from)
}

#[derive(Debug)]
pub struct GetMailHistoryUseCase {
    pub event_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EventNotFound(ID),
}

impl From<UseCaseError> for MailerError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EventNotFound(id) => {
                Self::NotFound(format!("The event with id: {}, was not found.", id))
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetMailHistoryUseCase {
    type Response = Vec<MailLogEntry>;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &MailerContext) -> Result<Self::Response, Self::Errors> {
        if ctx.repos.events.find(&self.event_id).await.is_none() {
            return Err(UseCaseError::EventNotFound(self.event_id.clone()));
        }

        Ok(ctx.repos.mail_log.find_by_event(&self.event_id).await)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sendmail::send_mail::SendMailUseCase;
    use crate::shared::test_factory::{add_order, position, setup, utc};
    use event_mailer_domain::{MailFilter, OrderStatus, OrderStatusFilter, Recipients};

    #[actix_web::main]
    #[test]
    async fn lists_sent_mails_newest_first() {
        let test = setup(false, utc(2024, 5, 10, 12, 0)).await;
        add_order(
            &test.ctx,
            &test.event,
            "paid@example.org",
            OrderStatus::Paid,
            vec![position(&test.item, None, None)],
        )
        .await;

        for (subject, hour) in &[("First", 9), ("Second", 10)] {
            let ctx = test
                .ctx
                .clone()
                .with_sys(std::sync::Arc::new(event_mailer_infra::StaticTimeSys(
                    utc(2024, 5, 10, *hour, 0).timestamp_millis(),
                )));
            let mut usecase = SendMailUseCase {
                event_id: test.event.id.clone(),
                subject: (*subject).into(),
                message: "Hello".into(),
                filter: MailFilter {
                    recipients: Recipients::Orders,
                    sendto: vec![OrderStatusFilter::Paid],
                    items: vec![test.item.id.clone()],
                    filter_checkins: false,
                    checkin_lists: Vec::new(),
                    not_checked_in: false,
                    subevent: None,
                    subevents_from: None,
                    subevents_to: None,
                },
                attachment: None,
            };
            usecase.execute(&ctx).await.unwrap();
        }

        let mut usecase = GetMailHistoryUseCase {
            event_id: test.event.id.clone(),
        };
        let entries = usecase.execute(&test.ctx).await.unwrap();
        let subjects = entries
            .iter()
            .map(|e| e.subject.localize("en").to_string())
            .collect::<Vec<_>>();
        assert_eq!(subjects, vec!["Second", "First"]);
        assert!(entries.iter().all(|e| e.sent_count == 1));
    }

    #[actix_web::main]
    #[test]
    async fn unknown_event() {
        let test = setup(false, utc(2024, 5, 10, 12, 0)).await;
        let event_id = ID::new();
        let mut usecase = GetMailHistoryUseCase {
            event_id: event_id.clone(),
        };
        assert_eq!(
            usecase.execute(&test.ctx).await.unwrap_err(),
            UseCaseError::EventNotFound(event_id)
        );
    }
}
