pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{JsonFileStore, MemoryStore};
pub use crate::config::{AppConfig, StorageBackend};
pub use crate::core::{
    engine::ContestEngine,
    leads::LeadService,
    probability::{ProbabilityService, SumPolicy},
};
pub use crate::domain::model::{Lead, LeadId, PrizeKey, ProbabilityConfig, ProbabilityUpdate};
pub use crate::utils::error::{AppError, Result};
