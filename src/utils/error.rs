use crate::domain::model::PrizeKey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Probability for {prize} must be between 0 and 1, got {value}")]
    OutOfRange { prize: PrizeKey, value: f64 },

    #[error("La suma de probabilidades ({percent:.1}%) no puede superar 100%")]
    SumExceeded { percent: f64 },

    #[error("Unknown prize key: {value}")]
    InvalidPrizeKey { value: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::OutOfRange { .. }
            | AppError::SumExceeded { .. }
            | AppError::InvalidPrizeKey { .. }
            | AppError::ValidationError { .. } => ErrorCategory::Validation,
            AppError::ConfigError { .. }
            | AppError::ConfigValidationError { .. }
            | AppError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            AppError::IoError(_)
            | AppError::SerializationError(_)
            | AppError::CsvError(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 被拒絕的單一操作，狀態不變
            ErrorCategory::Validation => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::OutOfRange { prize, value } => format!(
                "La probabilidad de {} ({:.1}%) debe estar entre 0% y 100%",
                prize.label(),
                value * 100.0
            ),
            AppError::SumExceeded { .. } => self.to_string(),
            AppError::InvalidPrizeKey { value } => format!("Premio desconocido: {}", value),
            AppError::ValidationError { message } => message.clone(),
            AppError::ConfigError { .. }
            | AppError::ConfigValidationError { .. }
            | AppError::InvalidConfigValueError { .. } => {
                format!("Configuration problem: {}", self)
            }
            _ => format!("Error al guardar: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AppError::OutOfRange { .. } => "Use a value between 0 and 1 (or 0% to 100%)",
            AppError::SumExceeded { .. } => {
                "Lower one or more prize probabilities so the total stays at or below 100%"
            }
            AppError::InvalidPrizeKey { .. } => {
                "Valid prizes are: sos, grua, moto, moura, lusqtoff"
            }
            AppError::ValidationError { .. } => "Check the command arguments and try again",
            AppError::ConfigError { .. }
            | AppError::ConfigValidationError { .. }
            | AppError::InvalidConfigValueError { .. } => {
                "Check the TOML configuration file and command line overrides"
            }
            AppError::IoError(_) => "Check that the data path exists and is writable",
            AppError::SerializationError(_) => {
                "The data file may be corrupted; restore it from a backup"
            }
            AppError::CsvError(_) => "Check the export destination and try again",
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
