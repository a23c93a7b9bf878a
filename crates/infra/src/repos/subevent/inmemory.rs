use super::ISubEventRepo;
use crate::repos::shared::inmemory_repo::*;
use event_mailer_domain::{SubEvent, ID};

pub struct InMemorySubEventRepo {
    subevents: std::sync::Mutex<Vec<SubEvent>>,
}

impl InMemorySubEventRepo {
    pub fn new() -> Self {
        Self {
            subevents: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl ISubEventRepo for InMemorySubEventRepo {
    async fn insert(&self, subevent: &SubEvent) -> anyhow::Result<()> {
        insert(subevent, &self.subevents);
        Ok(())
    }

    async fn find(&self, subevent_id: &ID) -> Option<SubEvent> {
        find(subevent_id, &self.subevents)
    }

    async fn find_by_event(&self, event_id: &ID) -> Vec<SubEvent> {
        let mut subevents = find_by(&self.subevents, |s| s.event_id == *event_id);
        subevents.sort_by_key(|s| s.date_from);
        subevents
    }
}
