use crate::{
    error::MailerError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use event_mailer_api_structs::get_rule::*;
use event_mailer_domain::{Rule, ID};
use event_mailer_infra::MailerContext;

pub async fn get_rule_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<MailerContext>,
) -> Result<HttpResponse, MailerError> {
    protect_route(&http_req, &ctx)?;

    let path = path.into_inner();
    let usecase = GetRuleUseCase {
        event_id: path.event_id,
        rule_id: path.rule_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|rule| HttpResponse::Ok().json(APIResponse::new(rule)))
        .map_err(MailerError::from)
}

#[derive(Debug)]
pub struct GetRuleUseCase {
    pub event_id: ID,
    pub rule_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for MailerError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => {
                Self::NotFound(format!("The rule with id: {}, was not found.", id))
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRuleUseCase {
    type Response = Rule;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &MailerContext) -> Result<Self::Response, Self::Errors> {
        match ctx.repos.rules.find(&self.rule_id).await {
            Some(rule) if rule.event_id == self.event_id => Ok(rule),
            _ => Err(UseCaseError::NotFound(self.rule_id.clone())),
        }
    }
}
