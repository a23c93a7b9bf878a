mod inmemory;
mod postgres;

pub use inmemory::InMemoryRuleRepo;
pub use postgres::PostgresRuleRepo;

use event_mailer_domain::{Rule, ID};

#[async_trait::async_trait]
pub trait IRuleRepo: Send + Sync {
    async fn insert(&self, rule: &Rule) -> anyhow::Result<()>;
    async fn save(&self, rule: &Rule) -> anyhow::Result<()>;
    async fn find(&self, rule_id: &ID) -> Option<Rule>;
    async fn find_by_event(&self, event_id: &ID) -> Vec<Rule>;
    async fn delete(&self, rule_id: &ID) -> Option<Rule>;
}

#[cfg(test)]
mod tests {
    use crate::create_test_contexts;
    use chrono::NaiveTime;
    use event_mailer_domain::{Rule, RuleInput, ScheduleFields, SendTo, ID};

    fn generate_input() -> RuleInput {
        RuleInput {
            subject: "Reminder for {event}".into(),
            template: "See you soon, {position_or_address}".into(),
            all_products: false,
            limit_products: vec![ID::new(), ID::new()],
            include_pending: true,
            schedule: ScheduleFields {
                date_is_absolute: false,
                send_date: None,
                send_offset_days: Some(2),
                send_offset_time: NaiveTime::from_hms_opt(9, 0, 0),
                offset_is_after: Some(false),
                offset_to_event_end: Some(false),
            },
            send_to: SendTo::Attendees,
        }
    }

    #[tokio::test]
    async fn crud() {
        for ctx in create_test_contexts().await {
            let event_id = ID::new();
            let mut rule = Rule::new(event_id.clone(), generate_input()).unwrap();

            // Insert
            assert!(ctx.repos.rules.insert(&rule).await.is_ok());

            // Find
            assert_eq!(ctx.repos.rules.find(&rule.id).await, Some(rule.clone()));
            assert_eq!(
                ctx.repos.rules.find_by_event(&event_id).await,
                vec![rule.clone()]
            );
            assert!(ctx.repos.rules.find_by_event(&ID::new()).await.is_empty());

            // Save
            let mut input = generate_input();
            input.all_products = true;
            input.schedule = rule.schedule.to_fields();
            input.schedule.offset_is_after = Some(true);
            rule.update(input).unwrap();
            assert!(ctx.repos.rules.save(&rule).await.is_ok());
            let found = ctx.repos.rules.find(&rule.id).await.unwrap();
            assert!(found.all_products);
            assert!(found.limit_products.is_empty());
            assert_eq!(found.schedule, rule.schedule);

            // Delete
            assert_eq!(ctx.repos.rules.delete(&rule.id).await, Some(rule.clone()));
            assert!(ctx.repos.rules.find(&rule.id).await.is_none());
            assert!(ctx.repos.rules.delete(&rule.id).await.is_none());
        }
    }
}
