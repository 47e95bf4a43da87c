use crate::config::toml_config::{AppConfig, StorageBackend, DEFAULT_CONFIG_FILE};
use crate::core::export::ExportFormat;
use crate::core::probability::SumPolicy;
use crate::domain::model::PrizeKey;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "prize-leads")]
#[command(about = "Contest leads and prize probability configuration")]
pub struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Override the data file location
    #[arg(long)]
    pub data_path: Option<String>,

    /// Keep everything in memory for this run
    #[arg(long)]
    pub memory: bool,

    /// Override which writes check that the total stays at or below 100%
    #[arg(long, value_enum)]
    pub sum_policy: Option<SumPolicy>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record and inspect leads
    Lead {
        #[command(subcommand)]
        action: LeadCommand,
    },
    /// Inspect and update prize probabilities
    Prob {
        #[command(subcommand)]
        action: ProbCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum LeadCommand {
    /// Record a new lead
    Add {
        email: String,
        #[arg(long)]
        winner: bool,
        /// Accepted for compatibility; leads are always stored without a prize
        #[arg(long)]
        prize: Option<String>,
    },
    /// List every lead in insertion order
    List,
    /// Export all leads as a spreadsheet
    Export {
        path: String,
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProbCommand {
    /// Show the current probabilities (defaults when none are stored)
    Show,
    /// Update a single prize, e.g. `set moto 0.15` or `set moto 15%`
    Set {
        prize: PrizeKey,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Replace all five probabilities at once
    SetAll {
        #[arg(allow_hyphen_values = true)]
        sos: String,
        #[arg(allow_hyphen_values = true)]
        grua: String,
        #[arg(allow_hyphen_values = true)]
        moto: String,
        #[arg(allow_hyphen_values = true)]
        moura: String,
        #[arg(allow_hyphen_values = true)]
        lusqtoff: String,
    },
}

impl Cli {
    /// 命令列參數覆蓋 TOML 設定
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(path) = &self.data_path {
            config.storage.path = path.clone();
            config.storage.backend = StorageBackend::File;
            tracing::info!("🔧 Data path overridden to: {}", path);
        }
        if self.memory {
            config.storage.backend = StorageBackend::Memory;
            tracing::info!("🔧 Using in-memory storage");
        }
        if let Some(policy) = self.sum_policy {
            config.probabilities.sum_policy = policy;
            tracing::info!("🔧 Sum policy overridden to: {:?}", policy);
        }
    }
}
