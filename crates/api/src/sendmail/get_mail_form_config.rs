use crate::{
    error::MailerError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use event_mailer_api_structs::get_mail_form_config::*;
use event_mailer_domain::{MailFormConfig, ID};
use event_mailer_infra::MailerContext;

pub async fn get_mail_form_config_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<MailerContext>,
) -> Result<HttpResponse, MailerError> {
    protect_route(&http_req, &ctx)?;

    let usecase = GetMailFormConfigUseCase {
        event_id: path.event_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|config| HttpResponse::Ok().json(APIResponse::new(config)))
        .map_err(MailerError::from)
}

#[derive(Debug)]
pub struct GetMailFormConfigUseCase {
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
impl UseCase for GetMailFormConfigUseCase {
    type Response = MailFormConfig;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &MailerContext) -> Result<Self::Response, Self::Errors> {
        let event = ctx
            .repos
            .events
            .find(&self.event_id)
            .await
            .ok_or_else(|| UseCaseError::EventNotFound(self.event_id.clone()))?;

        Ok(MailFormConfig::from_event(&event))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_factory::{setup, utc};
    use event_mailer_domain::{OrderStatusFilter, Recipients};

    #[actix_web::main]
    #[test]
    async fn config_follows_event_settings() {
        let test = setup(true, utc(2024, 5, 1, 0, 0)).await;
        let mut event = test.event.clone();
        event.settings.attendee_emails_asked = false;
        event.settings.payment_term_expire_automatically = false;
        test.ctx.repos.events.save(&event).await.unwrap();

        let mut usecase = GetMailFormConfigUseCase {
            event_id: event.id.clone(),
        };
        let config = usecase.execute(&test.ctx).await.unwrap();
        assert_eq!(config.recipients, vec![Recipients::Orders]);
        assert!(config.status_choices.contains(&OrderStatusFilter::Overdue));
        assert!(config.subevent_filters);
        assert_eq!(
            config.default_statuses,
            vec![OrderStatusFilter::Paid, OrderStatusFilter::PendingPayment]
        );
    }

    #[actix_web::main]
    #[test]
    async fn unknown_event() {
        let test = setup(false, utc(2024, 5, 1, 0, 0)).await;
        let event_id = ID::new();
        let mut usecase = GetMailFormConfigUseCase {
            event_id: event_id.clone(),
        };
        assert_eq!(
            usecase.execute(&test.ctx).await.unwrap_err(),
            UseCaseError::EventNotFound(event_id)
        );
    }
}
