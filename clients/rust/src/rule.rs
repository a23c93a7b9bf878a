use crate::{APIResponse, BaseClient, ID};
use event_mailer_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct RuleClient {
    base: Arc<BaseClient>,
}

pub struct CreateRuleInput {
    pub event_id: ID,
    pub rule: RuleRequestBody,
}

pub struct UpdateRuleInput {
    pub event_id: ID,
    pub rule_id: ID,
    pub rule: RuleRequestBody,
}

impl RuleClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    fn path(event_id: &ID) -> String {
        format!("events/{}/sendmail/rules", event_id)
    }

    pub async fn create(&self, input: CreateRuleInput) -> APIResponse<create_rule::APIResponse> {
        self.base
            .post(input.rule, Self::path(&input.event_id), StatusCode::CREATED)
            .await
    }

    pub async fn update(&self, input: UpdateRuleInput) -> APIResponse<update_rule::APIResponse> {
        self.base
            .put(
                input.rule,
                format!("{}/{}", Self::path(&input.event_id), input.rule_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn get(&self, event_id: ID, rule_id: ID) -> APIResponse<get_rule::APIResponse> {
        self.base
            .get(
                format!("{}/{}", Self::path(&event_id), rule_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn get_by_event(&self, event_id: ID) -> APIResponse<get_rules::APIResponse> {
        self.base.get(Self::path(&event_id), StatusCode::OK).await
    }

    pub async fn delete(&self, event_id: ID, rule_id: ID) -> APIResponse<delete_rule::APIResponse> {
        self.base
            .delete(
                format!("{}/{}", Self::path(&event_id), rule_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn get_scheduled_mails(
        &self,
        event_id: ID,
        rule_id: ID,
    ) -> APIResponse<get_scheduled_mails::APIResponse> {
        self.base
            .get(
                format!("{}/{}/scheduled", Self::path(&event_id), rule_id),
                StatusCode::OK,
            )
            .await
    }
}
