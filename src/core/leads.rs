use crate::domain::model::{Lead, LeadId, NewLead};
use crate::domain::ports::LeadStore;
use crate::utils::error::Result;

pub struct LeadService<S: LeadStore> {
    store: S,
}

impl<S: LeadStore> LeadService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 新增一筆 lead。`prize` 會被接受但一律存成 `None`，
    /// 獎項要在之後的抽獎步驟才指定。
    pub async fn create(
        &self,
        email: &str,
        is_winner: bool,
        prize: Option<&str>,
    ) -> Result<LeadId> {
        if let Some(discarded) = prize {
            tracing::debug!("Discarding caller-supplied prize '{}' for new lead", discarded);
        }

        let lead = self
            .store
            .insert_lead(NewLead {
                email: email.to_string(),
                is_winner,
                prize: None,
            })
            .await?;

        tracing::info!("📝 Lead {} recorded (winner: {})", lead.id, lead.is_winner);
        Ok(lead.id)
    }

    /// 依寫入順序回傳所有 lead
    pub async fn list_all(&self) -> Result<Vec<Lead>> {
        let leads = self.store.list_leads().await?;
        tracing::debug!("Listed {} leads", leads.len());
        Ok(leads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;

    #[tokio::test]
    async fn test_create_discards_prize() {
        let service = LeadService::new(MemoryStore::new());

        let id = service.create("a@b.com", true, Some("grua")).await.unwrap();
        let leads = service.list_all().await.unwrap();

        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].id, id);
        assert_eq!(leads[0].email, "a@b.com");
        assert!(leads[0].is_winner);
        assert_eq!(leads[0].prize, None);
    }

    #[tokio::test]
    async fn test_list_all_on_empty_store() {
        let service = LeadService::new(MemoryStore::new());
        assert!(service.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_all_keeps_insertion_order() {
        let service = LeadService::new(MemoryStore::new());
        for email in ["first@x.com", "second@x.com", "third@x.com"] {
            service.create(email, false, None).await.unwrap();
        }

        let leads = service.list_all().await.unwrap();
        let emails: Vec<&str> = leads.iter().map(|l| l.email.as_str()).collect();
        assert_eq!(emails, vec!["first@x.com", "second@x.com", "third@x.com"]);
        assert!(leads.windows(2).all(|w| w[0].created_at < w[1].created_at));
    }

    #[tokio::test]
    async fn test_email_is_stored_verbatim() {
        let service = LeadService::new(MemoryStore::new());
        service.create("  not-an-email ", false, None).await.unwrap();

        let leads = service.list_all().await.unwrap();
        assert_eq!(leads[0].email, "  not-an-email ");
    }
}
