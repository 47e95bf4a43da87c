use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::AppError;

/// 機率設定文件在儲存層中的固定鍵
pub const PROBABILITY_DOCUMENT_KEY: &str = "probabilities";

/// 五個獎項的識別碼
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrizeKey {
    Sos,
    Grua,
    Moto,
    Moura,
    Lusqtoff,
}

impl PrizeKey {
    pub const ALL: [PrizeKey; 5] = [
        PrizeKey::Sos,
        PrizeKey::Grua,
        PrizeKey::Moto,
        PrizeKey::Moura,
        PrizeKey::Lusqtoff,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrizeKey::Sos => "sos",
            PrizeKey::Grua => "grua",
            PrizeKey::Moto => "moto",
            PrizeKey::Moura => "moura",
            PrizeKey::Lusqtoff => "lusqtoff",
        }
    }

    /// 顯示用名稱
    pub fn label(&self) -> &'static str {
        match self {
            PrizeKey::Sos => "SOS",
            PrizeKey::Grua => "Grúa",
            PrizeKey::Moto => "Moto",
            PrizeKey::Moura => "Moura",
            PrizeKey::Lusqtoff => "Lüsqtoff",
        }
    }
}

impl fmt::Display for PrizeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrizeKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        PrizeKey::ALL
            .into_iter()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| AppError::InvalidPrizeKey {
                value: s.to_string(),
            })
    }
}

/// 單例機率設定。剩餘的 `1 - total()` 為未中獎機率。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityConfig {
    pub sos: f64,
    pub grua: f64,
    pub moto: f64,
    pub moura: f64,
    pub lusqtoff: f64,
}

impl ProbabilityConfig {
    /// 尚無文件時使用的預設值 (總和 0.75)
    pub const DEFAULT: ProbabilityConfig = ProbabilityConfig {
        sos: 0.05,
        grua: 0.10,
        moto: 0.15,
        moura: 0.20,
        lusqtoff: 0.25,
    };

    /// 顯示用：沒有文件時以預設值代替
    pub fn or_default(stored: Option<ProbabilityConfig>) -> ProbabilityConfig {
        stored.unwrap_or(Self::DEFAULT)
    }

    pub fn get(&self, prize: PrizeKey) -> f64 {
        match prize {
            PrizeKey::Sos => self.sos,
            PrizeKey::Grua => self.grua,
            PrizeKey::Moto => self.moto,
            PrizeKey::Moura => self.moura,
            PrizeKey::Lusqtoff => self.lusqtoff,
        }
    }

    /// 只替換單一欄位，其他四個欄位不變
    pub fn with(mut self, prize: PrizeKey, value: f64) -> ProbabilityConfig {
        let slot = match prize {
            PrizeKey::Sos => &mut self.sos,
            PrizeKey::Grua => &mut self.grua,
            PrizeKey::Moto => &mut self.moto,
            PrizeKey::Moura => &mut self.moura,
            PrizeKey::Lusqtoff => &mut self.lusqtoff,
        };
        *slot = value;
        self
    }

    pub fn entries(&self) -> [(PrizeKey, f64); 5] {
        PrizeKey::ALL.map(|prize| (prize, self.get(prize)))
    }

    pub fn total(&self) -> f64 {
        PrizeKey::ALL.iter().map(|prize| self.get(*prize)).sum()
    }

    pub fn no_win(&self) -> f64 {
        (1.0 - self.total()).max(0.0)
    }
}

impl Default for ProbabilityConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// 兩種寫入方式：單一欄位的部分更新，或五個欄位的整體覆寫
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbabilityUpdate {
    One { prize: PrizeKey, value: f64 },
    All(ProbabilityConfig),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId(pub u64);

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 尚未寫入的 lead，id 與建立時間由儲存層指定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLead {
    pub email: String,
    pub is_winner: bool,
    pub prize: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub email: String,
    pub is_winner: bool,
    pub prize: Option<String>,
    pub created_at: DateTime<Utc>,
}
