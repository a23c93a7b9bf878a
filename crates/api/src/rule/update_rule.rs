use super::subscribers::SyncScheduledMailsOnRuleUpdated;
use crate::{
    error::MailerError,
    shared::{
        auth::protect_route,
        usecase::{execute, Subscriber, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use event_mailer_api_structs::update_rule::*;
use event_mailer_domain::{Rule, RuleError, RuleInput, ID};
use event_mailer_infra::MailerContext;

pub async fn update_rule_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<MailerContext>,
) -> Result<HttpResponse, MailerError> {
    protect_route(&http_req, &ctx)?;

    let path = path.into_inner();
    let usecase = UpdateRuleUseCase {
        event_id: path.event_id,
        rule_id: path.rule_id,
        input: body.0.into(),
    };

    execute(usecase, &ctx)
        .await
        .map(|rule| HttpResponse::Ok().json(APIResponse::new(rule)))
        .map_err(MailerError::from)
}

/// Replaces the content of a `Rule`. Scheduled mails that were already sent
/// are not sent again, even when the schedule changes.
#[derive(Debug)]
pub struct UpdateRuleUseCase {
    pub event_id: ID,
    pub rule_id: ID,
    pub input: RuleInput,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    RuleNotFound(ID),
    InvalidRule(RuleError),
    StorageError,
}

impl From<UseCaseError> for MailerError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::RuleNotFound(id) => {
                Self::NotFound(format!("The rule with id: {}, was not found.", id))
            }
            UseCaseError::InvalidRule(e) => Self::BadClientData(e.to_string()),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateRuleUseCase {
    type Response = Rule;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &MailerContext) -> Result<Self::Response, Self::Errors> {
        let mut rule = match ctx.repos.rules.find(&self.rule_id).await {
            Some(rule) if rule.event_id == self.event_id => rule,
            _ => return Err(UseCaseError::RuleNotFound(self.rule_id.clone())),
        };
        let event = ctx
            .repos
            .events
            .find(&rule.event_id)
            .await
            .ok_or_else(|| UseCaseError::RuleNotFound(self.rule_id.clone()))?;

        rule.update(self.input.clone())
            .map_err(UseCaseError::InvalidRule)?;
        let items = ctx.repos.items.find_by_event(&event.id).await;
        let subevents = ctx.repos.subevents.find_by_event(&event.id).await;
        rule.validate_for_event(&event, &items, &subevents)
            .map_err(UseCaseError::InvalidRule)?;

        ctx.repos
            .rules
            .save(&rule)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(rule)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SyncScheduledMailsOnRuleUpdated)]
    }
}
