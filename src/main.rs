use anyhow::Context;
use clap::Parser;
use prize_leads::config::cli::{Cli, Command, LeadCommand, ProbCommand};
use prize_leads::core::export::{export_leads, format_timestamp, render_probability_table};
use prize_leads::core::{ConfigStore, LeadStore};
use prize_leads::utils::error::ErrorSeverity;
use prize_leads::utils::logger;
use prize_leads::utils::validation::{parse_percent, Validate};
use prize_leads::{AppConfig, AppError, ContestEngine, JsonFileStore, MemoryStore, StorageBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config file '{}'", cli.config))?;

    // 初始化日誌
    logger::init_logger(cli.verbose, config.logging.format);
    tracing::debug!("CLI args: {:?}", cli);

    cli.apply_overrides(&mut config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let policy = config.sum_policy();
    let result = match config.storage.backend {
        StorageBackend::Memory => {
            let store = MemoryStore::new();
            execute(ContestEngine::with_policy(store, policy), cli.command).await
        }
        StorageBackend::File => {
            let store = match JsonFileStore::open(&config.storage.path).await {
                Ok(store) => store,
                Err(e) => {
                    tracing::error!("❌ Failed to open data file '{}'", config.storage.path);
                    report_failure(&e)
                }
            };
            execute(ContestEngine::with_policy(store, policy), cli.command).await
        }
    };

    if let Err(e) = result {
        report_failure(&e);
    }

    Ok(())
}

async fn execute<S>(engine: ContestEngine<S>, command: Command) -> Result<(), AppError>
where
    S: ConfigStore + LeadStore + Clone,
{
    match command {
        Command::Lead { action } => match action {
            LeadCommand::Add {
                email,
                winner,
                prize,
            } => {
                let id = engine.create_lead(&email, winner, prize.as_deref()).await?;
                println!("✅ Lead {} recorded", id);
            }
            LeadCommand::List => {
                let leads = engine.list_leads().await?;
                if leads.is_empty() {
                    println!("No hay leads registrados");
                }
                for lead in &leads {
                    println!(
                        "{:>4}  {:<32} {:<3} {:<10} {}",
                        lead.id,
                        lead.email,
                        if lead.is_winner { "Sí" } else { "No" },
                        lead.prize.as_deref().unwrap_or("-"),
                        format_timestamp(&lead.created_at)
                    );
                }
                println!("Total de leads: {}", leads.len());
            }
            LeadCommand::Export { path, format } => {
                let leads = engine.list_leads().await?;
                let written = export_leads(&leads, &path, format).await?;
                println!("📁 {} leads exported to {}", written, path);
            }
        },
        Command::Prob { action } => match action {
            ProbCommand::Show => {
                let stored = engine.get_probability_config().await?;
                println!("{}", render_probability_table(stored));
            }
            ProbCommand::Set { prize, value } => {
                let value = parse_percent(prize.as_str(), &value)?;
                let document = engine.set_probability(prize, value).await?;
                println!("{}", render_probability_table(Some(document)));
            }
            ProbCommand::SetAll {
                sos,
                grua,
                moto,
                moura,
                lusqtoff,
            } => {
                let document = engine
                    .set_all_probabilities(
                        parse_percent("sos", &sos)?,
                        parse_percent("grua", &grua)?,
                        parse_percent("moto", &moto)?,
                        parse_percent("moura", &moura)?,
                        parse_percent("lusqtoff", &lusqtoff)?,
                    )
                    .await?;
                println!("{}", render_probability_table(Some(document)));
            }
        },
    }

    Ok(())
}

fn report_failure(e: &AppError) -> ! {
    tracing::error!(
        "❌ Operation failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    std::process::exit(exit_code(e.severity()));
}

/// 根據錯誤嚴重程度決定退出碼
fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
