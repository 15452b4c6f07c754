use crate::utils::error::{Result, ValidationFailure};
use crate::utils::validation::{range_violation, Validate};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const TENURE_MIN: u8 = 0;
pub const TENURE_MAX: u8 = 72;
pub const MONTHLY_CHARGES_MIN: f64 = 18.0;
pub const MONTHLY_CHARGES_MAX: f64 = 120.0;

/// 模型訓練時使用的欄位名稱，拼寫必須與 artifact 完全一致
pub mod fields {
    pub const DEPENDENTS: &str = "Dependents";
    pub const TENURE: &str = "tenure";
    pub const ONLINE_SECURITY: &str = "OnlineSecurity";
    pub const ONLINE_BACKUP: &str = "OnlineBackup";
    pub const INTERNET_SERVICE: &str = "InternetService";
    pub const DEVICE_PROTECTION: &str = "DeviceProtection";
    pub const TECH_SUPPORT: &str = "TechSupport";
    pub const CONTRACT: &str = "Contract";
    pub const PAPERLESS_BILLING: &str = "PaperlessBilling";
    pub const MONTHLY_CHARGES: &str = "MonthlyCharges";

    pub const ALL: [&str; 10] = [
        DEPENDENTS,
        TENURE,
        ONLINE_SECURITY,
        ONLINE_BACKUP,
        INTERNET_SERVICE,
        DEVICE_PROTECTION,
        TECH_SUPPORT,
        CONTRACT,
        PAPERLESS_BILLING,
        MONTHLY_CHARGES,
    ];
}

/// Closed categorical domain with exact artifact spellings.
pub trait Categorical: Sized + Copy + 'static {
    const VARIANTS: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn parse(value: &str) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|v| v.as_str() == value)
    }

    fn allowed() -> Vec<&'static str> {
        Self::VARIANTS.iter().map(|v| v.as_str()).collect()
    }
}

macro_rules! categorical {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
        pub enum $name {
            $(#[serde(rename = $label)] $variant,)+
        }

        impl Categorical for $name {
            const VARIANTS: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

categorical!(YesNo {
    Yes => "Yes",
    No => "No",
});

categorical!(AddonStatus {
    Yes => "Yes",
    No => "No",
    NoInternetService => "No internet service",
});

categorical!(InternetService {
    Dsl => "DSL",
    FiberOptic => "Fiber optic",
    No => "No",
});

categorical!(Contract {
    MonthToMonth => "Month-to-month",
    OneYear => "One year",
    TwoYear => "Two year",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    #[serde(rename = "Dependents")]
    pub dependents: YesNo,
    pub tenure: u8,
    #[serde(rename = "OnlineSecurity")]
    pub online_security: AddonStatus,
    #[serde(rename = "OnlineBackup")]
    pub online_backup: AddonStatus,
    #[serde(rename = "InternetService")]
    pub internet_service: InternetService,
    #[serde(rename = "DeviceProtection")]
    pub device_protection: AddonStatus,
    #[serde(rename = "TechSupport")]
    pub tech_support: AddonStatus,
    #[serde(rename = "Contract")]
    pub contract: Contract,
    #[serde(rename = "PaperlessBilling")]
    pub paperless_billing: YesNo,
    #[serde(rename = "MonthlyCharges")]
    pub monthly_charges: f64,
}

/// 單列特徵表中的一格
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    Categorical(&'static str),
    Numeric(f64),
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Categorical(value) => f.write_str(value),
            Self::Numeric(value) => write!(f, "{}", value),
        }
    }
}

impl CustomerRecord {
    /// The record as a single-row table keyed by the artifact's field names.
    pub fn feature_row(&self) -> [(&'static str, FeatureValue); 10] {
        use FeatureValue::{Categorical as C, Numeric as N};
        [
            (fields::DEPENDENTS, C(self.dependents.as_str())),
            (fields::TENURE, N(f64::from(self.tenure))),
            (fields::ONLINE_SECURITY, C(self.online_security.as_str())),
            (fields::ONLINE_BACKUP, C(self.online_backup.as_str())),
            (fields::INTERNET_SERVICE, C(self.internet_service.as_str())),
            (fields::DEVICE_PROTECTION, C(self.device_protection.as_str())),
            (fields::TECH_SUPPORT, C(self.tech_support.as_str())),
            (fields::CONTRACT, C(self.contract.as_str())),
            (fields::PAPERLESS_BILLING, C(self.paperless_billing.as_str())),
            (fields::MONTHLY_CHARGES, N(self.monthly_charges)),
        ]
    }

    pub fn feature(&self, name: &str) -> Option<FeatureValue> {
        self.feature_row()
            .into_iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }
}

impl Validate for CustomerRecord {
    fn validate(&self) -> Result<()> {
        let mut failure = ValidationFailure::default();

        if let Some(reason) = range_violation(self.tenure, TENURE_MIN, TENURE_MAX) {
            failure.push(fields::TENURE, reason);
        }

        if !self.monthly_charges.is_finite() {
            failure.push(fields::MONTHLY_CHARGES, "Value must be a finite number");
        } else if let Some(reason) = range_violation(
            self.monthly_charges,
            MONTHLY_CHARGES_MIN,
            MONTHLY_CHARGES_MAX,
        ) {
            failure.push(fields::MONTHLY_CHARGES, reason);
        }

        failure.into_result()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskVerdict {
    AtRisk,
    Loyal,
}

impl RiskVerdict {
    pub fn label(&self) -> &'static str {
        match self {
            Self::AtRisk => "AT RISK OF CHURN",
            Self::Loyal => "LOYAL CUSTOMER",
        }
    }
}

/// Hard label from the classifier's own `predict`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChurnLabel {
    Stay,
    Churn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub probability: f64,
    pub verdict: RiskVerdict,
    pub is_at_risk: bool,
    pub recommendation: String,
    pub predicted_label: ChurnLabel,
    pub threshold: f64,
}

impl PredictionResult {
    /// 百分比，保留兩位小數
    pub fn probability_percent(&self) -> String {
        format!("{:.2}%", self.probability * 100.0)
    }
}
