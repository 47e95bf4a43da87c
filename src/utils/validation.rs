use crate::domain::model::{PrizeKey, ProbabilityConfig};
use crate::utils::error::{AppError, Result};

/// 只吸收浮點捨入誤差 (幾個 ULP)，例如 0.1 + 0.2 + 0.3 + 0.4
pub const SUM_TOLERANCE: f64 = 4.0 * f64::EPSILON;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 單一機率必須落在 [0, 1]，NaN 視為超出範圍
pub fn validate_probability(prize: PrizeKey, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(AppError::OutOfRange { prize, value });
    }
    Ok(())
}

pub fn validate_each_probability(config: &ProbabilityConfig) -> Result<()> {
    for (prize, value) in config.entries() {
        validate_probability(prize, value)?;
    }
    Ok(())
}

/// 五個機率的總和不得超過 1
pub fn validate_total(config: &ProbabilityConfig) -> Result<()> {
    let total = config.total();
    if total > 1.0 + SUM_TOLERANCE {
        return Err(AppError::SumExceeded {
            percent: total * 100.0,
        });
    }
    Ok(())
}

/// 解析使用者輸入：`0.15` 為比例，`15%` 為百分比
pub fn parse_percent(field_name: &str, input: &str) -> Result<f64> {
    let trimmed = input.trim();
    let (number, is_percent) = match trimmed.strip_suffix('%') {
        Some(rest) => (rest.trim(), true),
        None => (trimmed, false),
    };

    let parsed: f64 = number.parse().map_err(|_| AppError::ValidationError {
        message: format!("{} must be a number, got '{}'", field_name, input),
    })?;

    Ok(if is_percent { parsed / 100.0 } else { parsed })
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_probability_bounds() {
        assert!(validate_probability(PrizeKey::Sos, 0.0).is_ok());
        assert!(validate_probability(PrizeKey::Sos, 1.0).is_ok());
        assert!(validate_probability(PrizeKey::Sos, -0.01).is_err());
        assert!(validate_probability(PrizeKey::Sos, 1.01).is_err());
        assert!(validate_probability(PrizeKey::Sos, f64::NAN).is_err());
    }

    #[test]
    fn test_validate_total() {
        let exactly_one = ProbabilityConfig {
            sos: 0.2,
            grua: 0.2,
            moto: 0.2,
            moura: 0.2,
            lusqtoff: 0.2,
        };
        assert!(validate_total(&exactly_one).is_ok());

        let over = exactly_one.with(PrizeKey::Sos, 0.25);
        match validate_total(&over) {
            Err(AppError::SumExceeded { percent }) => assert!((percent - 105.0).abs() < 1e-6),
            other => panic!("expected SumExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_total_rejects_small_real_overshoot() {
        let config = ProbabilityConfig {
            sos: 0.2,
            grua: 0.2,
            moto: 0.2,
            moura: 0.2,
            lusqtoff: 0.2 + 1e-10,
        };
        assert!(matches!(
            validate_total(&config),
            Err(AppError::SumExceeded { .. })
        ));

        // 捨入誤差仍然接受
        let rounding = ProbabilityConfig {
            sos: 0.1,
            grua: 0.2,
            moto: 0.3,
            moura: 0.4,
            lusqtoff: 0.0,
        };
        assert!(validate_total(&rounding).is_ok());
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("value", "0.15").unwrap(), 0.15);
        assert_eq!(parse_percent("value", "15%").unwrap(), 0.15);
        assert_eq!(parse_percent("value", " 50 % ").unwrap(), 0.5);
        assert!(parse_percent("value", "abc").is_err());
    }
}
