use crate::domain::model::{
    fields, AddonStatus, Categorical, Contract, CustomerRecord, InternetService, YesNo,
    MONTHLY_CHARGES_MAX, MONTHLY_CHARGES_MIN, TENURE_MAX, TENURE_MIN,
};
use crate::utils::error::{ChurnError, Result, ValidationFailure};
use crate::utils::validation::range_violation;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Turns raw field values into a [`CustomerRecord`], or names every field
/// that is missing, unknown, mistyped or outside its domain.
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_fields(&self, raw: &HashMap<String, Value>) -> Result<CustomerRecord> {
        let mut failure = ValidationFailure::default();

        // 未知欄位
        let mut unknown: Vec<&String> = raw
            .keys()
            .filter(|key| !fields::ALL.contains(&key.as_str()))
            .collect();
        unknown.sort();
        for key in unknown {
            failure.push(key.as_str(), "Unknown field");
        }

        let dependents = categorical::<YesNo>(raw, fields::DEPENDENTS, &mut failure);
        let tenure = tenure(raw, &mut failure);
        let online_security = categorical::<AddonStatus>(raw, fields::ONLINE_SECURITY, &mut failure);
        let online_backup = categorical::<AddonStatus>(raw, fields::ONLINE_BACKUP, &mut failure);
        let internet_service =
            categorical::<InternetService>(raw, fields::INTERNET_SERVICE, &mut failure);
        let device_protection =
            categorical::<AddonStatus>(raw, fields::DEVICE_PROTECTION, &mut failure);
        let tech_support = categorical::<AddonStatus>(raw, fields::TECH_SUPPORT, &mut failure);
        let contract = categorical::<Contract>(raw, fields::CONTRACT, &mut failure);
        let paperless_billing = categorical::<YesNo>(raw, fields::PAPERLESS_BILLING, &mut failure);
        let monthly_charges = monthly_charges(raw, &mut failure);

        match (
            dependents,
            tenure,
            online_security,
            online_backup,
            internet_service,
            device_protection,
            tech_support,
            contract,
            paperless_billing,
            monthly_charges,
        ) {
            (
                Some(dependents),
                Some(tenure),
                Some(online_security),
                Some(online_backup),
                Some(internet_service),
                Some(device_protection),
                Some(tech_support),
                Some(contract),
                Some(paperless_billing),
                Some(monthly_charges),
            ) if failure.is_empty() => Ok(CustomerRecord {
                dependents,
                tenure,
                online_security,
                online_backup,
                internet_service,
                device_protection,
                tech_support,
                contract,
                paperless_billing,
                monthly_charges,
            }),
            _ => Err(ChurnError::Validation(failure)),
        }
    }

    pub fn validate_object(&self, object: &Map<String, Value>) -> Result<CustomerRecord> {
        let raw: HashMap<String, Value> = object
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        self.validate_fields(&raw)
    }

    /// Parses a JSON document that must be a single object of field values.
    pub fn validate_json(&self, json: &str) -> Result<CustomerRecord> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(object) => self.validate_object(&object),
            other => {
                let mut failure = ValidationFailure::default();
                failure.push(
                    "record",
                    format!("Expected a JSON object of field values, got {}", json_type(&other)),
                );
                Err(ChurnError::Validation(failure))
            }
        }
    }
}

fn required<'a>(
    raw: &'a HashMap<String, Value>,
    field: &str,
    failure: &mut ValidationFailure,
) -> Option<&'a Value> {
    match raw.get(field) {
        Some(Value::Null) | None => {
            failure.push(field, "Missing required field");
            None
        }
        Some(value) => Some(value),
    }
}

fn categorical<T: Categorical>(
    raw: &HashMap<String, Value>,
    field: &str,
    failure: &mut ValidationFailure,
) -> Option<T> {
    let value = required(raw, field, failure)?;
    let Some(text) = value.as_str() else {
        failure.push(field, format!("Expected text, got {}", json_type(value)));
        return None;
    };

    let parsed = T::parse(text);
    if parsed.is_none() {
        failure.push(
            field,
            format!(
                "Unknown value '{}'. Allowed values: {}",
                text,
                T::allowed().join(", ")
            ),
        );
    }
    parsed
}

fn tenure(raw: &HashMap<String, Value>, failure: &mut ValidationFailure) -> Option<u8> {
    let value = required(raw, fields::TENURE, failure)?;
    let whole = match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        _ => None,
    };

    let Some(months) = whole else {
        failure.push(
            fields::TENURE,
            format!("Expected a whole number of months, got {}", value),
        );
        return None;
    };

    if let Some(reason) = range_violation(months, i64::from(TENURE_MIN), i64::from(TENURE_MAX)) {
        failure.push(fields::TENURE, reason);
        return None;
    }
    u8::try_from(months).ok()
}

fn monthly_charges(raw: &HashMap<String, Value>, failure: &mut ValidationFailure) -> Option<f64> {
    let value = required(raw, fields::MONTHLY_CHARGES, failure)?;
    let Some(charges) = value.as_f64().filter(|f| f.is_finite()) else {
        failure.push(
            fields::MONTHLY_CHARGES,
            format!("Expected a number, got {}", value),
        );
        return None;
    };

    if let Some(reason) = range_violation(charges, MONTHLY_CHARGES_MIN, MONTHLY_CHARGES_MAX) {
        failure.push(fields::MONTHLY_CHARGES, reason);
        return None;
    }
    Some(charges)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "text",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
