use super::IRuleRepo;
use crate::repos::shared::inmemory_repo::*;
use event_mailer_domain::{Rule, ID};

pub struct InMemoryRuleRepo {
    rules: std::sync::Mutex<Vec<Rule>>,
}

impl InMemoryRuleRepo {
    pub fn new() -> Self {
        Self {
            rules: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IRuleRepo for InMemoryRuleRepo {
    async fn insert(&self, rule: &Rule) -> anyhow::Result<()> {
        insert(rule, &self.rules);
        Ok(())
    }

    async fn save(&self, rule: &Rule) -> anyhow::Result<()> {
        save(rule, &self.rules);
        Ok(())
    }

    async fn find(&self, rule_id: &ID) -> Option<Rule> {
        find(rule_id, &self.rules)
    }

    async fn find_by_event(&self, event_id: &ID) -> Vec<Rule> {
        find_by(&self.rules, |rule| rule.event_id == *event_id)
    }

    async fn delete(&self, rule_id: &ID) -> Option<Rule> {
        delete(rule_id, &self.rules)
    }
}
