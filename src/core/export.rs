use crate::domain::model::{Lead, ProbabilityConfig};
use crate::utils::error::Result;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

const LEAD_HEADERS: [&str; 4] = ["Email", "Ganador", "Premio", "Fecha de Creación"];
const TIMESTAMP_FORMAT: &str = "%d/%m/%y %H:%M";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Tsv,
}

impl ExportFormat {
    fn delimiter(&self) -> u8 {
        match self {
            ExportFormat::Csv => b',',
            ExportFormat::Tsv => b'\t',
        }
    }
}

/// 以執行環境的本地時區顯示建立時間
pub fn format_timestamp(created_at: &DateTime<Utc>) -> String {
    created_at
        .with_timezone(&Local)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

/// 試算表匯出用的一列
fn lead_row(lead: &Lead) -> [String; 4] {
    [
        lead.email.clone(),
        if lead.is_winner { "Sí" } else { "No" }.to_string(),
        lead.prize.clone().unwrap_or_else(|| "-".to_string()),
        format_timestamp(&lead.created_at),
    ]
}

pub fn render_leads(leads: &[Lead], format: ExportFormat) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(format.delimiter())
        .from_writer(Vec::new());

    writer.write_record(LEAD_HEADERS)?;
    for lead in leads {
        writer.write_record(lead_row(lead))?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// 將 lead 寫入檔案，回傳寫入的資料列數 (不含標題)
pub async fn export_leads<P: AsRef<Path>>(
    leads: &[Lead],
    path: P,
    format: ExportFormat,
) -> Result<usize> {
    let path = path.as_ref();
    let content = render_leads(leads, format)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, content).await?;

    tracing::info!("📁 Exported {} leads to {}", leads.len(), path.display());
    Ok(leads.len())
}

/// 機率表：每個獎項一列，加上未中獎與總計。沒有文件時顯示預設值。
pub fn render_probability_table(stored: Option<ProbabilityConfig>) -> String {
    let config = ProbabilityConfig::or_default(stored);
    let mut lines = Vec::new();

    if stored.is_none() {
        lines.push("(sin configuración guardada, mostrando valores por defecto)".to_string());
    }

    for (prize, value) in config.entries() {
        lines.push(format!("{:<12}{:>6.0}%", prize.label(), value * 100.0));
    }
    lines.push(format!("{:<12}{:>6.0}%", "Sin premio", config.no_win() * 100.0));
    lines.push(format!("{:<12}{:>6.0}%", "Total", config.total() * 100.0));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::LeadId;
    use chrono::TimeZone;

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 7, 14, 5, 0).unwrap()
    }

    fn lead(id: u64, email: &str, is_winner: bool, prize: Option<&str>) -> Lead {
        Lead {
            id: LeadId(id),
            email: email.to_string(),
            is_winner,
            prize: prize.map(str::to_string),
            created_at: created_at(),
        }
    }

    #[test]
    fn test_render_empty_leads_has_only_header() {
        let csv = render_leads(&[], ExportFormat::Csv).unwrap();
        assert_eq!(csv, "Email,Ganador,Premio,Fecha de Creación\n");
    }

    #[test]
    fn test_render_leads_csv() {
        let leads = vec![
            lead(1, "a@b.com", true, None),
            lead(2, "c@d.com", false, Some("moto")),
        ];

        let csv = render_leads(&leads, ExportFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        let shown = format_timestamp(&created_at());
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], format!("a@b.com,Sí,-,{}", shown));
        assert_eq!(lines[2], format!("c@d.com,No,moto,{}", shown));
    }

    #[test]
    fn test_render_leads_tsv() {
        let tsv = render_leads(&[lead(1, "a@b.com", false, None)], ExportFormat::Tsv).unwrap();
        assert!(tsv.starts_with("Email\tGanador\tPremio\tFecha de Creación\n"));
        let shown = format_timestamp(&created_at());
        assert!(tsv.contains(&format!("a@b.com\tNo\t-\t{}", shown)));
    }

    #[test]
    fn test_format_timestamp_uses_local_time() {
        let local = Local.with_ymd_and_hms(2025, 3, 7, 14, 5, 0).unwrap();
        assert_eq!(
            format_timestamp(&local.with_timezone(&Utc)),
            "07/03/25 14:05"
        );
    }

    #[test]
    fn test_render_probability_table_defaults() {
        let table = render_probability_table(None);

        assert!(table.contains("valores por defecto"));
        assert!(table.contains("Grúa"));
        assert!(table.lines().any(|l| l.starts_with("Sin premio") && l.ends_with("25%")));
        assert!(table.lines().any(|l| l.starts_with("Total") && l.ends_with("75%")));
    }

    #[tokio::test]
    async fn test_export_leads_writes_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("leads.csv");

        let written = export_leads(&[lead(1, "a@b.com", true, None)], &path, ExportFormat::Csv)
            .await
            .unwrap();

        assert_eq!(written, 1);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("a@b.com"));
    }
}
