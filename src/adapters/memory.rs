use crate::adapters::state::StoreState;
use crate::domain::model::{Lead, NewLead, ProbabilityConfig};
use crate::domain::ports::{ConfigStore, DocumentMutation, LeadStore};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

/// 行程內儲存，關閉後資料即消失。適合測試與 `--memory` 模式。
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn get_document(&self, key: &str) -> Result<Option<ProbabilityConfig>> {
        Ok(self.state.read().await.document(key))
    }

    async fn modify_document(
        &self,
        key: &str,
        mutation: DocumentMutation,
    ) -> Result<ProbabilityConfig> {
        // 寫鎖涵蓋整個 read-modify-write
        let mut state = self.state.write().await;
        state.apply(key, mutation)
    }
}

#[async_trait]
impl LeadStore for MemoryStore {
    async fn insert_lead(&self, lead: NewLead) -> Result<Lead> {
        let mut state = self.state.write().await;
        Ok(state.append_lead(lead, Utc::now()))
    }

    async fn list_leads(&self) -> Result<Vec<Lead>> {
        Ok(self.state.read().await.leads.clone())
    }
}
