use super::subscribers::CreateScheduledMailsOnRuleCreated;
use crate::{
    error::MailerError,
    shared::{
        auth::protect_route,
        usecase::{execute, Subscriber, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use event_mailer_api_structs::create_rule::*;
use event_mailer_domain::{Rule, RuleError, RuleInput, ID};
use event_mailer_infra::MailerContext;

pub async fn create_rule_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<MailerContext>,
) -> Result<HttpResponse, MailerError> {
    protect_route(&http_req, &ctx)?;

    let usecase = CreateRuleUseCase {
        event_id: path.event_id.clone(),
        input: body.0.into(),
    };

    execute(usecase, &ctx)
        .await
        .map(|rule| HttpResponse::Created().json(APIResponse::new(rule)))
        .map_err(MailerError::from)
}

#[derive(Debug)]
pub struct CreateRuleUseCase {
    pub event_id: ID,
    pub input: RuleInput,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EventNotFound(ID),
    InvalidRule(RuleError),
    StorageError,
}

impl From<UseCaseError> for MailerError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EventNotFound(id) => {
                Self::NotFound(format!("The event with id: {}, was not found.", id))
            }
            UseCaseError::InvalidRule(e) => Self::BadClientData(e.to_string()),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateRuleUseCase {
    type Response = Rule;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &MailerContext) -> Result<Self::Response, Self::Errors> {
        let event = ctx
            .repos
            .events
            .find(&self.event_id)
            .await
            .ok_or_else(|| UseCaseError::EventNotFound(self.event_id.clone()))?;

        let rule =
            Rule::new(event.id.clone(), self.input.clone()).map_err(UseCaseError::InvalidRule)?;
        let items = ctx.repos.items.find_by_event(&event.id).await;
        let subevents = ctx.repos.subevents.find_by_event(&event.id).await;
        rule.validate_for_event(&event, &items, &subevents)
            .map_err(UseCaseError::InvalidRule)?;

        ctx.repos
            .rules
            .insert(&rule)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(rule)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(CreateScheduledMailsOnRuleCreated)]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_factory::{add_subevent, relative_schedule, rule_input, setup, utc};

    #[actix_web::main]
    #[test]
    async fn creates_rule_with_a_scheduled_mail_per_date() {
        let test = setup(true, utc(2024, 5, 1, 0, 0)).await;
        add_subevent(&test.ctx, &test.event, utc(2024, 6, 1, 18, 0), None).await;
        add_subevent(&test.ctx, &test.event, utc(2024, 6, 8, 18, 0), None).await;

        let usecase = CreateRuleUseCase {
            event_id: test.event.id.clone(),
            input: rule_input(relative_schedule(2, 9, false)),
        };
        let rule = execute(usecase, &test.ctx).await.unwrap();

        assert_eq!(test.ctx.repos.rules.find(&rule.id).await, Some(rule.clone()));
        let mails = test.ctx.repos.scheduled_mails.find_by_rule(&rule.id).await;
        assert_eq!(mails.len(), 2);
        assert!(mails.iter().all(|m| !m.sent && m.subevent_id.is_some()));
    }

    #[actix_web::main]
    #[test]
    async fn rejects_products_of_other_events() {
        let test = setup(false, utc(2024, 5, 1, 0, 0)).await;
        let foreign_product = ID::new();
        let mut input = rule_input(relative_schedule(2, 9, false));
        input.all_products = false;
        input.limit_products = vec![test.item.id.clone(), foreign_product.clone()];

        let mut usecase = CreateRuleUseCase {
            event_id: test.event.id.clone(),
            input,
        };
        assert_eq!(
            usecase.execute(&test.ctx).await.unwrap_err(),
            UseCaseError::InvalidRule(RuleError::UnknownProduct(foreign_product))
        );
        assert!(test
            .ctx
            .repos
            .rules
            .find_by_event(&test.event.id)
            .await
            .is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn rejects_end_anchor_without_end_date() {
        let test = setup(false, utc(2024, 5, 1, 0, 0)).await;
        let mut schedule = relative_schedule(1, 10, true);
        schedule.offset_to_event_end = Some(true);

        let mut usecase = CreateRuleUseCase {
            event_id: test.event.id.clone(),
            input: rule_input(schedule),
        };
        assert_eq!(
            usecase.execute(&test.ctx).await.unwrap_err(),
            UseCaseError::InvalidRule(RuleError::MissingAnchor)
        );
    }

    #[actix_web::main]
    #[test]
    async fn rejects_invalid_schedule() {
        let test = setup(false, utc(2024, 5, 1, 0, 0)).await;
        let mut schedule = relative_schedule(1, 10, true);
        schedule.send_date = Some(utc(2024, 5, 20, 0, 0));

        let mut usecase = CreateRuleUseCase {
            event_id: test.event.id.clone(),
            input: rule_input(schedule),
        };
        assert!(matches!(
            usecase.execute(&test.ctx).await,
            Err(UseCaseError::InvalidRule(RuleError::InvalidSchedule(_)))
        ));
    }
}
