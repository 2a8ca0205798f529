use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::RiskError;

/// Ordered credit-risk band assigned to a case or a portfolio row.
///
/// The derived ordering is the risk rank: `Low < MediumLow < ... < High`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum RiskCategory {
    #[serde(alias = "low risk")]
    Low,
    #[serde(alias = "medium-low risk")]
    MediumLow,
    #[serde(alias = "medium risk")]
    Medium,
    #[serde(alias = "medium-high risk")]
    MediumHigh,
    #[serde(alias = "high risk")]
    High,
}

impl RiskCategory {
    /// All bands from lowest to highest risk.
    pub const ALL: [Self; 5] = [
        Self::Low,
        Self::MediumLow,
        Self::Medium,
        Self::MediumHigh,
        Self::High,
    ];

    /// Numeric rank, 0 for `Low` through 4 for `High`.
    #[inline]
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Band for a composite creditworthiness score, where higher is safer.
    ///
    /// Bands are checked top-down and the lower bound of each band is inclusive.
    pub fn from_overall_score(score: f64) -> Self {
        if score >= 0.8 {
            Self::Low
        } else if score >= 0.6 {
            Self::MediumLow
        } else if score >= 0.4 {
            Self::Medium
        } else if score >= 0.2 {
            Self::MediumHigh
        } else {
            Self::High
        }
    }

    /// Band for a predicted default probability, where higher is riskier.
    pub fn from_default_probability(probability: f64) -> Self {
        if probability < 0.2 {
            Self::Low
        } else if probability < 0.4 {
            Self::MediumLow
        } else if probability < 0.6 {
            Self::Medium
        } else if probability < 0.8 {
            Self::MediumHigh
        } else {
            Self::High
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::MediumLow => "medium-low",
            Self::Medium => "medium",
            Self::MediumHigh => "medium-high",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} risk", self.as_str())
    }
}

impl FromStr for RiskCategory {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        let key = key.strip_suffix(" risk").unwrap_or(&key);
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == key)
            .ok_or_else(|| RiskError::InvalidInput(format!("unknown risk category '{s}'")))
    }
}

/// Delinquency age bucket of a portfolio row.
///
/// Labels outside the five standard buckets are kept verbatim in `Unlisted`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AgeBucket {
    Days0To30,
    Days31To90,
    Days91To180,
    Days181To360,
    Over360Days,
    Unlisted(String),
}

impl AgeBucket {
    pub const STANDARD: [Self; 5] = [
        Self::Days0To30,
        Self::Days31To90,
        Self::Days91To180,
        Self::Days181To360,
        Self::Over360Days,
    ];

    pub fn label(&self) -> &str {
        match self {
            Self::Days0To30 => "0-30d",
            Self::Days31To90 => "31-90d",
            Self::Days91To180 => "91-180d",
            Self::Days181To360 => "181-360d",
            Self::Over360Days => ">360d",
            Self::Unlisted(label) => label,
        }
    }
}

impl From<&str> for AgeBucket {
    fn from(label: &str) -> Self {
        let key = label.trim().to_ascii_lowercase();
        let key = key
            .trim_end_matches("days")
            .trim_end_matches("dni")
            .trim_end_matches('d')
            .trim();
        match key {
            "0-30" => Self::Days0To30,
            "31-90" => Self::Days31To90,
            "91-180" => Self::Days91To180,
            "181-360" => Self::Days181To360,
            ">360" | "360+" | "over 360" => Self::Over360Days,
            _ => Self::Unlisted(label.to_string()),
        }
    }
}

impl From<String> for AgeBucket {
    fn from(label: String) -> Self {
        Self::from(label.as_str())
    }
}

impl From<AgeBucket> for String {
    fn from(bucket: AgeBucket) -> Self {
        bucket.label().to_string()
    }
}

impl fmt::Display for AgeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Employment contract form read from an employment contract document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContractType {
    Permanent,
    FixedTerm,
    B2b,
    Temporary,
    /// Any contract form without a configured score.
    Other(String),
}

impl From<&str> for ContractType {
    fn from(value: &str) -> Self {
        match value {
            "permanent" => Self::Permanent,
            "fixed_term" => Self::FixedTerm,
            "b2b" => Self::B2b,
            "temporary" => Self::Temporary,
            _ => Self::Other(value.to_string()),
        }
    }
}

/// Independently scored dimension of a borrower assessment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskComponent {
    FinancialStability,
    IncomeReliability,
    EmploymentStability,
    CreditHistory,
    Assets,
}

impl RiskComponent {
    /// Canonical component order used for aggregation and recommendations.
    pub const ALL: [Self; 5] = [
        Self::FinancialStability,
        Self::IncomeReliability,
        Self::EmploymentStability,
        Self::CreditHistory,
        Self::Assets,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FinancialStability => "financial_stability",
            Self::IncomeReliability => "income_reliability",
            Self::EmploymentStability => "employment_stability",
            Self::CreditHistory => "credit_history",
            Self::Assets => "assets",
        }
    }
}
