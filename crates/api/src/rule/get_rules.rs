use crate::{
    error::MailerError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use event_mailer_api_structs::get_rules::*;
use event_mailer_domain::{Rule, ID};
use event_mailer_infra::MailerContext;

pub async fn get_rules_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<MailerContext>,
) -> Result<HttpResponse, MailerError> {
    protect_route(&http_req, &ctx)?;

    let usecase = GetRulesUseCase {
        event_id: path.event_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|rules| HttpResponse::Ok().json(APIResponse::new(rules)))
        .map_err(MailerError::from)
}

#[derive(Debug)]
pub struct GetRulesUseCase {
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
impl UseCase for GetRulesUseCase {
    type Response = Vec<Rule>;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &MailerContext) -> Result<Self::Response, Self::Errors> {
        if ctx.repos.events.find(&self.event_id).await.is_none() {
            return Err(UseCaseError::EventNotFound(self.event_id.clone()));
        }
        Ok(ctx.repos.rules.find_by_event(&self.event_id).await)
    }
}
