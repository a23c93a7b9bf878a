use super::resolve_send_time;
use crate::{
    error::MailerError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use event_mailer_api_structs::{dtos::ScheduledMailDTO, get_scheduled_mails::*};
use event_mailer_domain::{ScheduledMail, ID};
use event_mailer_infra::MailerContext;

pub async fn get_scheduled_mails_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<MailerContext>,
) -> Result<HttpResponse, MailerError> {
    protect_route(&http_req, &ctx)?;

    let path = path.into_inner();
    let usecase = GetScheduledMailsUseCase {
        event_id: path.event_id,
        rule_id: path.rule_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|mails| {
            let mails = mails
                .into_iter()
                .map(|(mail, send_at)| ScheduledMailDTO::new(mail, send_at))
                .collect();
            HttpResponse::Ok().json(APIResponse::new(mails))
        })
        .map_err(MailerError::from)
}

/// The scheduled mails of a `Rule` together with the time they are due
#[derive(Debug)]
pub struct GetScheduledMailsUseCase {
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
impl UseCase for GetScheduledMailsUseCase {
    type Response = Vec<(ScheduledMail, Option<DateTime<Utc>>)>;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &MailerContext) -> Result<Self::Response, Self::Errors> {
        let rule = match ctx.repos.rules.find(&self.rule_id).await {
            Some(rule) if rule.event_id == self.event_id => rule,
            _ => return Err(UseCaseError::NotFound(self.rule_id.clone())),
        };
        let event = ctx
            .repos
            .events
            .find(&rule.event_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.rule_id.clone()))?;
        let subevents = ctx.repos.subevents.find_by_event(&event.id).await;

        let mails = ctx
            .repos
            .scheduled_mails
            .find_by_rule(&rule.id)
            .await
            .into_iter()
            .map(|mail| {
                let send_at = resolve_send_time(&rule, &mail, &event, &subevents);
                (mail, send_at)
            })
            .collect();

        Ok(mails)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_factory::{add_subevent, relative_schedule, rule_input, setup, utc};
    use event_mailer_domain::Rule;

    #[actix_web::main]
    #[test]
    async fn resolves_send_time_per_subevent() {
        let test = setup(true, utc(2024, 5, 1, 0, 0)).await;
        let day1 = add_subevent(&test.ctx, &test.event, utc(2024, 6, 1, 18, 0), None).await;
        let day2 = add_subevent(&test.ctx, &test.event, utc(2024, 6, 8, 18, 0), None).await;
        let rule = Rule::new(test.event.id.clone(), rule_input(relative_schedule(2, 9, false)))
            .unwrap();
        test.ctx.repos.rules.insert(&rule).await.unwrap();
        test.ctx
            .repos
            .scheduled_mails
            .bulk_insert(&[
                ScheduledMail::new(&rule, Some(day1.id.clone())),
                ScheduledMail::new(&rule, Some(day2.id.clone())),
                ScheduledMail::new(&rule, Some(ID::new())),
            ])
            .await
            .unwrap();

        let mut usecase = GetScheduledMailsUseCase {
            event_id: test.event.id.clone(),
            rule_id: rule.id.clone(),
        };
        let mails = usecase.execute(&test.ctx).await.unwrap();
        assert_eq!(mails.len(), 3);
        let send_at = |subevent_id: &ID| {
            mails
                .iter()
                .find(|(mail, _)| mail.subevent_id.as_ref() == Some(subevent_id))
                .and_then(|(_, send_at)| *send_at)
        };
        assert_eq!(send_at(&day1.id), Some(utc(2024, 5, 30, 9, 0)));
        assert_eq!(send_at(&day2.id), Some(utc(2024, 6, 6, 9, 0)));
        assert_eq!(mails.iter().filter(|(_, send_at)| send_at.is_none()).count(), 1);
    }
}
