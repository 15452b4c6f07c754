use crate::utils::error::{ChurnError, Result};
use std::fmt::Display;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ChurnError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ChurnError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| ChurnError::MissingConfig {
        field: field_name.to_string(),
    })
}

/// 包含邊界的範圍檢查，不在範圍內時回傳原因
pub fn range_violation<T: PartialOrd + Display + Copy>(value: T, min: T, max: T) -> Option<String> {
    if value < min || value > max {
        Some(format!("Value {} must be between {} and {}", value, min, max))
    } else {
        None
    }
}

pub fn validate_range<T: PartialOrd + Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    match range_violation(value, min, max) {
        Some(reason) => Err(ChurnError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

pub fn validate_probability(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(ChurnError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a finite number".to_string(),
        });
    }
    validate_range(field_name, value, 0.0, 1.0)
}
