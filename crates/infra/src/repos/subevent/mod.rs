mod inmemory;
mod postgres;

pub use inmemory::InMemorySubEventRepo;
pub use postgres::PostgresSubEventRepo;

use event_mailer_domain::{SubEvent, ID};

#[async_trait::async_trait]
pub trait ISubEventRepo: Send + Sync {
    async fn insert(&self, subevent: &SubEvent) -> anyhow::Result<()>;
    async fn find(&self, subevent_id: &ID) -> Option<SubEvent>;
    /// Ordered by start date
    async fn find_by_event(&self, event_id: &ID) -> Vec<SubEvent>;
}

#[cfg(test)]
mod tests {
    use crate::create_test_contexts;
    use chrono::{Duration, TimeZone, Utc};
    use event_mailer_domain::{SubEvent, ID};

    #[tokio::test]
    async fn find_by_event_in_date_order() {
        for ctx in create_test_contexts().await {
            let event_id = ID::new();
            let first = SubEvent {
                id: Default::default(),
                event_id: event_id.clone(),
                name: "Day 1".into(),
                date_from: Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap(),
                date_to: Some(Utc.with_ymd_and_hms(2024, 6, 1, 22, 0, 0).unwrap()),
            };
            let second = SubEvent {
                id: Default::default(),
                name: "Day 2".into(),
                date_from: first.date_from + Duration::days(1),
                date_to: None,
                ..first.clone()
            };
            assert!(ctx.repos.subevents.insert(&second).await.is_ok());
            assert!(ctx.repos.subevents.insert(&first).await.is_ok());

            let found = ctx.repos.subevents.find_by_event(&event_id).await;
            assert_eq!(found, vec![first.clone(), second]);
            assert_eq!(ctx.repos.subevents.find(&first.id).await, Some(first));
            assert!(ctx.repos.subevents.find_by_event(&ID::new()).await.is_empty());
        }
    }
}
