use crate::dtos::{RuleDTO, ScheduledMailDTO};
use event_mailer_domain::{LocalizedText, Rule, RuleInput, ScheduleFields, SendTo, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleResponse {
    pub rule: RuleDTO,
}

impl RuleResponse {
    pub fn new(rule: Rule) -> Self {
        Self {
            rule: RuleDTO::new(rule),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RulePathParams {
    pub event_id: ID,
    pub rule_id: ID,
}

fn default_true() -> bool {
    true
}

fn default_send_to() -> SendTo {
    SendTo::Customers
}

/// Body of the create and update rule requests
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RuleRequestBody {
    pub subject: LocalizedText,
    pub template: LocalizedText,
    #[serde(default = "default_true")]
    pub all_products: bool,
    #[serde(default)]
    pub limit_products: Vec<ID>,
    #[serde(default)]
    pub include_pending: bool,
    #[serde(flatten)]
    pub schedule: ScheduleFields,
    #[serde(default = "default_send_to")]
    pub send_to: SendTo,
}

impl From<RuleRequestBody> for RuleInput {
    fn from(body: RuleRequestBody) -> Self {
        Self {
            subject: body.subject,
            template: body.template,
            all_products: body.all_products,
            limit_products: body.limit_products,
            include_pending: body.include_pending,
            schedule: body.schedule,
            send_to: body.send_to,
        }
    }
}

pub mod create_rule {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    pub type RequestBody = RuleRequestBody;

    pub type APIResponse = RuleResponse;
}

pub mod update_rule {
    use super::*;

    pub type PathParams = RulePathParams;

    pub type RequestBody = RuleRequestBody;

    pub type APIResponse = RuleResponse;
}

pub mod get_rule {
    use super::*;

    pub type PathParams = RulePathParams;

    pub type APIResponse = RuleResponse;
}

pub mod delete_rule {
    use super::*;

    pub type PathParams = RulePathParams;

    pub type APIResponse = RuleResponse;
}

pub mod get_rules {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize)]
    pub struct APIResponse {
        pub rules: Vec<RuleDTO>,
    }

    impl APIResponse {
        pub fn new(rules: Vec<Rule>) -> Self {
            Self {
                rules: rules.into_iter().map(RuleDTO::new).collect(),
            }
        }
    }
}

pub mod get_scheduled_mails {
    use super::*;

    pub type PathParams = RulePathParams;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub scheduled_mails: Vec<ScheduledMailDTO>,
    }

    impl APIResponse {
        pub fn new(scheduled_mails: Vec<ScheduledMailDTO>) -> Self {
            Self { scheduled_mails }
        }
    }
}
