use crate::domain::model::{
    PrizeKey, ProbabilityConfig, ProbabilityUpdate, PROBABILITY_DOCUMENT_KEY,
};
use crate::domain::ports::ConfigStore;
use crate::utils::error::Result;
use crate::utils::validation::{validate_each_probability, validate_probability, validate_total};
use serde::{Deserialize, Serialize};

/// 哪些寫入路徑需要檢查總和不超過 1
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum SumPolicy {
    /// 只有整體覆寫檢查總和；單欄位更新只檢查範圍
    #[default]
    FullReplaceOnly,
    /// 單欄位更新合併後也檢查總和
    AllWrites,
}

/// 管理單例機率設定的服務
pub struct ProbabilityService<S: ConfigStore> {
    store: S,
    policy: SumPolicy,
}

impl<S: ConfigStore> ProbabilityService<S> {
    pub fn new(store: S) -> Self {
        Self::with_policy(store, SumPolicy::default())
    }

    pub fn with_policy(store: S, policy: SumPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> SumPolicy {
        self.policy
    }

    /// 目前的文件；從未寫入過時回傳 `None`，不會自行補上預設值
    pub async fn get(&self) -> Result<Option<ProbabilityConfig>> {
        let document = self.store.get_document(PROBABILITY_DOCUMENT_KEY).await?;
        tracing::debug!("Loaded probability document: {:?}", document);
        Ok(document)
    }

    pub async fn apply(&self, update: ProbabilityUpdate) -> Result<ProbabilityConfig> {
        match update {
            ProbabilityUpdate::One { prize, value } => self.set_one(prize, value).await,
            ProbabilityUpdate::All(config) => self.set_all(config).await,
        }
    }

    /// 部分更新：只替換 `prize`，文件不存在時以預設表為基礎建立
    pub async fn set_one(&self, prize: PrizeKey, value: f64) -> Result<ProbabilityConfig> {
        if let Err(e) = validate_probability(prize, value) {
            tracing::warn!("⚠️ Rejected update for {}: {}", prize, e);
            return Err(e);
        }

        let enforce_total = self.policy == SumPolicy::AllWrites;
        let result = self
            .store
            .modify_document(
                PROBABILITY_DOCUMENT_KEY,
                Box::new(move |current| {
                    let merged = ProbabilityConfig::or_default(current).with(prize, value);
                    if enforce_total {
                        validate_total(&merged)?;
                    }
                    Ok(merged)
                }),
            )
            .await;

        match &result {
            Ok(document) => tracing::info!(
                "✅ Probability for {} set to {:.4} (total {:.1}%)",
                prize,
                value,
                document.total() * 100.0
            ),
            Err(e) => tracing::warn!("⚠️ Rejected update for {}: {}", prize, e),
        }
        result
    }

    /// 整體覆寫：五個值都必須在範圍內，且總和不得超過 1
    pub async fn set_all(&self, values: ProbabilityConfig) -> Result<ProbabilityConfig> {
        if let Err(e) = validate_each_probability(&values).and_then(|_| validate_total(&values)) {
            tracing::warn!("⚠️ Rejected full probability update: {}", e);
            return Err(e);
        }

        let document = self
            .store
            .modify_document(PROBABILITY_DOCUMENT_KEY, Box::new(move |_| Ok(values)))
            .await?;

        tracing::info!(
            "✅ All probabilities replaced (total {:.1}%, no-win {:.1}%)",
            document.total() * 100.0,
            document.no_win() * 100.0
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use crate::utils::error::AppError;

    fn valid_config() -> ProbabilityConfig {
        ProbabilityConfig {
            sos: 0.1,
            grua: 0.1,
            moto: 0.2,
            moura: 0.3,
            lusqtoff: 0.05,
        }
    }

    #[tokio::test]
    async fn test_get_on_empty_store_is_absent() {
        let service = ProbabilityService::new(MemoryStore::new());
        assert!(service.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_one_on_empty_store_starts_from_defaults() {
        let service = ProbabilityService::new(MemoryStore::new());

        service.set_one(PrizeKey::Moto, 0.5).await.unwrap();

        let stored = service.get().await.unwrap().unwrap();
        assert_eq!(
            stored,
            ProbabilityConfig {
                sos: 0.05,
                grua: 0.10,
                moto: 0.5,
                moura: 0.20,
                lusqtoff: 0.25,
            }
        );
    }

    #[tokio::test]
    async fn test_set_one_patches_existing_document_only() {
        let service = ProbabilityService::new(MemoryStore::new());
        service.set_all(valid_config()).await.unwrap();

        service.set_one(PrizeKey::Sos, 0.0).await.unwrap();

        let stored = service.get().await.unwrap().unwrap();
        assert_eq!(stored, valid_config().with(PrizeKey::Sos, 0.0));
    }

    #[tokio::test]
    async fn test_set_one_rejects_out_of_range_without_writing() {
        let service = ProbabilityService::new(MemoryStore::new());

        for value in [-0.1, 1.1, f64::NAN] {
            let result = service.set_one(PrizeKey::Grua, value).await;
            assert!(matches!(result, Err(AppError::OutOfRange { .. })));
        }
        assert!(service.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_one_can_exceed_total_under_default_policy() {
        let service = ProbabilityService::new(MemoryStore::new());

        service.set_one(PrizeKey::Sos, 1.0).await.unwrap();

        let stored = service.get().await.unwrap().unwrap();
        assert!(stored.total() > 1.0);
    }

    #[tokio::test]
    async fn test_set_one_checks_total_under_all_writes_policy() {
        let service = ProbabilityService::with_policy(MemoryStore::new(), SumPolicy::AllWrites);
        service.set_all(valid_config()).await.unwrap();

        let result = service.set_one(PrizeKey::Moura, 0.9).await;
        assert!(matches!(result, Err(AppError::SumExceeded { .. })));
        assert_eq!(service.get().await.unwrap(), Some(valid_config()));

        service.set_one(PrizeKey::Moura, 0.4).await.unwrap();
        assert_eq!(service.get().await.unwrap().unwrap().moura, 0.4);
    }

    #[tokio::test]
    async fn test_set_all_rejects_total_above_one() {
        let service = ProbabilityService::new(MemoryStore::new());
        let too_much = ProbabilityConfig {
            sos: 0.25,
            grua: 0.2,
            moto: 0.2,
            moura: 0.2,
            lusqtoff: 0.2,
        };

        match service.set_all(too_much).await {
            Err(AppError::SumExceeded { percent }) => assert!((percent - 105.0).abs() < 1e-6),
            other => panic!("expected SumExceeded, got {:?}", other),
        }
        assert!(service.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_all_rejects_out_of_range_before_checking_total() {
        let service = ProbabilityService::new(MemoryStore::new());
        service.set_all(valid_config()).await.unwrap();

        let result = service
            .set_all(valid_config().with(PrizeKey::Lusqtoff, -0.05))
            .await;

        assert!(matches!(
            result,
            Err(AppError::OutOfRange {
                prize: PrizeKey::Lusqtoff,
                ..
            })
        ));
        assert_eq!(service.get().await.unwrap(), Some(valid_config()));
    }

    #[tokio::test]
    async fn test_apply_dispatches_both_update_shapes() {
        let service = ProbabilityService::new(MemoryStore::new());

        service
            .apply(ProbabilityUpdate::All(valid_config()))
            .await
            .unwrap();
        let document = service
            .apply(ProbabilityUpdate::One {
                prize: PrizeKey::Grua,
                value: 0.15,
            })
            .await
            .unwrap();

        assert_eq!(document, valid_config().with(PrizeKey::Grua, 0.15));
    }
}
