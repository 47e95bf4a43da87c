use crate::core::leads::LeadService;
use crate::core::probability::{ProbabilityService, SumPolicy};
use crate::domain::model::{Lead, LeadId, PrizeKey, ProbabilityConfig, ProbabilityUpdate};
use crate::domain::ports::{ConfigStore, LeadStore};
use crate::utils::error::Result;

/// 對外提供的操作：lead 的新增與列出，以及機率設定的讀取與更新
pub struct ContestEngine<S: ConfigStore + LeadStore + Clone> {
    probabilities: ProbabilityService<S>,
    leads: LeadService<S>,
}

impl<S: ConfigStore + LeadStore + Clone> ContestEngine<S> {
    pub fn new(store: S) -> Self {
        Self::with_policy(store, SumPolicy::default())
    }

    pub fn with_policy(store: S, policy: SumPolicy) -> Self {
        Self {
            probabilities: ProbabilityService::with_policy(store.clone(), policy),
            leads: LeadService::new(store),
        }
    }

    pub async fn create_lead(
        &self,
        email: &str,
        is_winner: bool,
        prize: Option<&str>,
    ) -> Result<LeadId> {
        self.leads.create(email, is_winner, prize).await
    }

    pub async fn list_leads(&self) -> Result<Vec<Lead>> {
        self.leads.list_all().await
    }

    pub async fn get_probability_config(&self) -> Result<Option<ProbabilityConfig>> {
        self.probabilities.get().await
    }

    pub async fn set_probability(&self, prize: PrizeKey, value: f64) -> Result<ProbabilityConfig> {
        self.probabilities
            .apply(ProbabilityUpdate::One { prize, value })
            .await
    }

    pub async fn set_all_probabilities(
        &self,
        sos: f64,
        grua: f64,
        moto: f64,
        moura: f64,
        lusqtoff: f64,
    ) -> Result<ProbabilityConfig> {
        self.probabilities
            .apply(ProbabilityUpdate::All(ProbabilityConfig {
                sos,
                grua,
                moto,
                moura,
                lusqtoff,
            }))
            .await
    }

    pub fn probabilities(&self) -> &ProbabilityService<S> {
        &self.probabilities
    }
}
