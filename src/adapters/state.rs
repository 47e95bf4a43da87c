use crate::domain::model::{Lead, LeadId, NewLead, ProbabilityConfig};
use crate::domain::ports::DocumentMutation;
use crate::utils::error::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 儲存層的完整內容：以鍵索引的文件表，以及只能追加的 lead 表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    #[serde(default)]
    pub documents: BTreeMap<String, ProbabilityConfig>,
    #[serde(default)]
    pub leads: Vec<Lead>,
}

impl StoreState {
    pub fn document(&self, key: &str) -> Option<ProbabilityConfig> {
        self.documents.get(key).copied()
    }

    /// mutation 失敗時 state 保持不變
    pub fn apply(&mut self, key: &str, mutation: DocumentMutation) -> Result<ProbabilityConfig> {
        let next = mutation(self.document(key))?;
        self.documents.insert(key.to_string(), next);
        Ok(next)
    }

    pub fn append_lead(&mut self, lead: NewLead, now: DateTime<Utc>) -> Lead {
        let (id, created_at) = match self.leads.last() {
            Some(last) => {
                // 時鐘沒有前進時仍要保證建立時間嚴格遞增
                let created_at = if now > last.created_at {
                    now
                } else {
                    last.created_at + Duration::microseconds(1)
                };
                (LeadId(last.id.0 + 1), created_at)
            }
            None => (LeadId(1), now),
        };

        let stored = Lead {
            id,
            email: lead.email,
            is_winner: lead.is_winner,
            prize: lead.prize,
            created_at,
        };
        self.leads.push(stored.clone());
        stored
    }
}
