use crate::domain::model::{Lead, NewLead, ProbabilityConfig};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 作用在現有文件 (或不存在) 上的修改，回傳新的完整文件。
/// 回傳錯誤時儲存層不得寫入任何東西。
pub type DocumentMutation =
    Box<dyn FnOnce(Option<ProbabilityConfig>) -> Result<ProbabilityConfig> + Send>;

#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get_document(&self, key: &str) -> Result<Option<ProbabilityConfig>>;

    /// 單一文件的 read-modify-write，必須以原子方式完成
    async fn modify_document(
        &self,
        key: &str,
        mutation: DocumentMutation,
    ) -> Result<ProbabilityConfig>;
}

#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn insert_lead(&self, lead: NewLead) -> Result<Lead>;
    async fn list_leads(&self) -> Result<Vec<Lead>>;
}
