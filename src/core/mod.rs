pub mod engine;
pub mod export;
pub mod leads;
pub mod probability;

pub use crate::domain::model::{
    Lead, LeadId, NewLead, PrizeKey, ProbabilityConfig, ProbabilityUpdate,
};
pub use crate::domain::ports::{ConfigStore, DocumentMutation, LeadStore};
pub use crate::utils::error::Result;
