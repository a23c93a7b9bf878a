use crate::{
    error::MailerError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use event_mailer_api_structs::delete_rule::*;
use event_mailer_domain::{Rule, ID};
use event_mailer_infra::MailerContext;
use tracing::info;

pub async fn delete_rule_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<MailerContext>,
) -> Result<HttpResponse, MailerError> {
    protect_route(&http_req, &ctx)?;

    let path = path.into_inner();
    let usecase = DeleteRuleUseCase {
        event_id: path.event_id,
        rule_id: path.rule_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|rule| HttpResponse::Ok().json(APIResponse::new(rule)))
        .map_err(MailerError::from)
}

/// Deletes a `Rule` together with its scheduled mails
#[derive(Debug)]
pub struct DeleteRuleUseCase {
    pub event_id: ID,
    pub rule_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for MailerError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => {
                Self::NotFound(format!("The rule with id: {}, was not found.", id))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteRuleUseCase {
    type Response = Rule;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &MailerContext) -> Result<Self::Response, Self::Errors> {
        match ctx.repos.rules.find(&self.rule_id).await {
            Some(rule) if rule.event_id == self.event_id => (),
            _ => return Err(UseCaseError::NotFound(self.rule_id.clone())),
        };

        let res = ctx
            .repos
            .scheduled_mails
            .delete_by_rule(&self.rule_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        info!(
            "Deleted {} scheduled mails of rule {}",
            res.deleted_count, self.rule_id
        );

        ctx.repos
            .rules
            .delete(&self.rule_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.rule_id.clone()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_factory::{relative_schedule, rule_input, setup, utc};
    use event_mailer_domain::ScheduledMail;

    #[actix_web::main]
    #[test]
    async fn deletes_rule_and_scheduled_mails() {
        let test = setup(false, utc(2024, 5, 1, 0, 0)).await;
        let rule = Rule::new(test.event.id.clone(), rule_input(relative_schedule(2, 9, false)))
            .unwrap();
        test.ctx.repos.rules.insert(&rule).await.unwrap();
        test.ctx
            .repos
            .scheduled_mails
            .bulk_insert(&[ScheduledMail::new(&rule, None)])
            .await
            .unwrap();

        let mut usecase = DeleteRuleUseCase {
            event_id: test.event.id.clone(),
            rule_id: rule.id.clone(),
        };
        assert_eq!(usecase.execute(&test.ctx).await.unwrap(), rule);
        assert!(test.ctx.repos.rules.find(&rule.id).await.is_none());
        assert!(test
            .ctx
            .repos
            .scheduled_mails
            .find_by_rule(&rule.id)
            .await
            .is_empty());

        assert_eq!(
            usecase.execute(&test.ctx).await.unwrap_err(),
            UseCaseError::NotFound(rule.id)
        );
    }
}
