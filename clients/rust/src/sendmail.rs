use crate::{APIResponse, BaseClient, ID};
use event_mailer_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct SendmailClient {
    base: Arc<BaseClient>,
}

pub struct SendMailInput {
    pub event_id: ID,
    pub mail: send_mail::RequestBody,
}

impl SendmailClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// The options available when composing a mail for the event
    pub async fn get_config(
        &self,
        event_id: ID,
    ) -> APIResponse<get_mail_form_config::APIResponse> {
        self.base
            .get(format!("events/{}/sendmail/config", event_id), StatusCode::OK)
            .await
    }

    pub async fn send(&self, input: SendMailInput) -> APIResponse<send_mail::APIResponse> {
        self.base
            .post(
                input.mail,
                format!("events/{}/sendmail", input.event_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn get_history(&self, event_id: ID) -> APIResponse<get_mail_history::APIResponse> {
        self.base
            .get(
                format!("events/{}/sendmail/history", event_id),
                StatusCode::OK,
            )
            .await
    }
}
