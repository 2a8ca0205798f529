//! Static configuration tables for scoring, provisioning, and valuation.
//!
//! Every table has a `const DEFAULT` and is read-only after load. [`EngineConfig`] bundles the
//! tables and can be deserialized from JSON with partial overrides; missing tables keep their
//! defaults. Loading always runs [`EngineConfig::validate`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{AgeBucket, ContractType, RiskCategory, RiskComponent, RiskError, RiskResult};

const WEIGHT_SUM_TOLERANCE: f64 = 1.0e-9;

/// Score applied to contract forms missing from [`ContractScores`].
pub const UNKNOWN_CONTRACT_SCORE: f64 = 0.0;
/// Multiplier applied to age buckets missing from [`AgingMultipliers`].
pub const UNLISTED_BUCKET_MULTIPLIER: f64 = 1.0;

/// Component weights of the composite risk score. Must sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskWeights {
    pub financial_stability: f64,
    pub income_reliability: f64,
    pub employment_stability: f64,
    pub credit_history: f64,
    pub assets: f64,
}

impl RiskWeights {
    pub const DEFAULT: Self = Self {
        financial_stability: 0.30,
        income_reliability: 0.25,
        employment_stability: 0.20,
        credit_history: 0.15,
        assets: 0.10,
    };

    pub fn weight(&self, component: RiskComponent) -> f64 {
        match component {
            RiskComponent::FinancialStability => self.financial_stability,
            RiskComponent::IncomeReliability => self.income_reliability,
            RiskComponent::EmploymentStability => self.employment_stability,
            RiskComponent::CreditHistory => self.credit_history,
            RiskComponent::Assets => self.assets,
        }
    }

    pub fn sum(&self) -> f64 {
        RiskComponent::ALL.iter().map(|&c| self.weight(c)).sum()
    }
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Employment stability score per contract form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContractScores {
    pub permanent: f64,
    pub fixed_term: f64,
    pub b2b: f64,
    pub temporary: f64,
}

impl ContractScores {
    pub const DEFAULT: Self = Self {
        permanent: 1.0,
        fixed_term: 0.7,
        b2b: 0.6,
        temporary: 0.4,
    };

    pub fn score(&self, contract: &ContractType) -> f64 {
        match contract {
            ContractType::Permanent => self.permanent,
            ContractType::FixedTerm => self.fixed_term,
            ContractType::B2b => self.b2b,
            ContractType::Temporary => self.temporary,
            ContractType::Other(_) => UNKNOWN_CONTRACT_SCORE,
        }
    }
}

impl Default for ContractScores {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One value per risk band. Used for provision rates and valuation weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryTable {
    pub low: f64,
    pub medium_low: f64,
    pub medium: f64,
    pub medium_high: f64,
    pub high: f64,
}

impl CategoryTable {
    /// Share of exposure reserved per band.
    pub const PROVISION_RATES: Self = Self {
        low: 0.05,
        medium_low: 0.10,
        medium: 0.25,
        medium_high: 0.50,
        high: 0.75,
    };

    /// Share of face value retained per band when pricing a debt.
    pub const VALUATION_WEIGHTS: Self = Self {
        low: 1.0,
        medium_low: 0.8,
        medium: 0.6,
        medium_high: 0.4,
        high: 0.2,
    };

    pub fn get(&self, category: RiskCategory) -> f64 {
        match category {
            RiskCategory::Low => self.low,
            RiskCategory::MediumLow => self.medium_low,
            RiskCategory::Medium => self.medium,
            RiskCategory::MediumHigh => self.medium_high,
            RiskCategory::High => self.high,
        }
    }

    fn validate_unit(&self, table: &str) -> RiskResult<()> {
        for category in RiskCategory::ALL {
            let value = self.get(category);
            if !(0.0..=1.0).contains(&value) {
                return Err(RiskError::Config(format!(
                    "{table}.{} must be in [0, 1], got {value}",
                    category.as_str()
                )));
            }
        }
        Ok(())
    }
}

/// Reserve multiplier per delinquency age bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgingMultipliers {
    pub days_0_30: f64,
    pub days_31_90: f64,
    pub days_91_180: f64,
    pub days_181_360: f64,
    pub over_360: f64,
}

impl AgingMultipliers {
    pub const DEFAULT: Self = Self {
        days_0_30: 1.0,
        days_31_90: 1.2,
        days_91_180: 1.5,
        days_181_360: 2.0,
        over_360: 2.5,
    };

    pub fn multiplier(&self, bucket: &AgeBucket) -> f64 {
        match bucket {
            AgeBucket::Days0To30 => self.days_0_30,
            AgeBucket::Days31To90 => self.days_31_90,
            AgeBucket::Days91To180 => self.days_91_180,
            AgeBucket::Days181To360 => self.days_181_360,
            AgeBucket::Over360Days => self.over_360,
            AgeBucket::Unlisted(_) => UNLISTED_BUCKET_MULTIPLIER,
        }
    }
}

impl Default for AgingMultipliers {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// All static tables used by one process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub risk_weights: RiskWeights,
    pub contract_scores: ContractScores,
    pub provision_rates: CategoryTable,
    pub aging_multipliers: AgingMultipliers,
    pub valuation_weights: CategoryTable,
}

impl EngineConfig {
    pub const DEFAULT: Self = Self {
        risk_weights: RiskWeights::DEFAULT,
        contract_scores: ContractScores::DEFAULT,
        provision_rates: CategoryTable::PROVISION_RATES,
        aging_multipliers: AgingMultipliers::DEFAULT,
        valuation_weights: CategoryTable::VALUATION_WEIGHTS,
    };

    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(json: &str) -> RiskResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        tracing::debug!(?config, "loaded engine configuration");
        Ok(config)
    }

    /// Reads, parses, and validates a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> RiskResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        tracing::info!(path = %path.display(), "reading engine configuration");
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> RiskResult<()> {
        for component in RiskComponent::ALL {
            let w = self.risk_weights.weight(component);
            if !(0.0..=1.0).contains(&w) {
                return Err(RiskError::Config(format!(
                    "risk_weights.{} must be in [0, 1], got {w}",
                    component.as_str()
                )));
            }
        }
        let sum = self.risk_weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(RiskError::Config(format!(
                "risk weights must sum to 1, got {sum}"
            )));
        }

        let c = &self.contract_scores;
        for (name, score) in [
            ("permanent", c.permanent),
            ("fixed_term", c.fixed_term),
            ("b2b", c.b2b),
            ("temporary", c.temporary),
        ] {
            if !(0.0..=1.0).contains(&score) {
                return Err(RiskError::Config(format!(
                    "contract_scores.{name} must be in [0, 1], got {score}"
                )));
            }
        }

        self.provision_rates.validate_unit("provision_rates")?;
        self.valuation_weights.validate_unit("valuation_weights")?;

        for bucket in AgeBucket::STANDARD {
            let m = self.aging_multipliers.multiplier(&bucket);
            if !m.is_finite() || m < 0.0 {
                return Err(RiskError::Config(format!(
                    "aging multiplier for {bucket} must be finite and >= 0, got {m}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        assert_abs_diff_eq!(RiskWeights::DEFAULT.sum(), 1.0, epsilon = 1.0e-9);
        EngineConfig::DEFAULT.validate().unwrap();
    }

    #[test]
    fn every_category_has_a_rate_and_weight() {
        for category in RiskCategory::ALL {
            assert!(CategoryTable::PROVISION_RATES.get(category) > 0.0);
            assert!(CategoryTable::VALUATION_WEIGHTS.get(category) > 0.0);
        }
        assert_abs_diff_eq!(
            CategoryTable::VALUATION_WEIGHTS.get(RiskCategory::Medium),
            0.6
        );
    }

    #[test]
    fn unlisted_lookups_use_named_defaults() {
        let bucket = AgeBucket::Unlisted("legacy".into());
        assert_eq!(
            AgingMultipliers::DEFAULT.multiplier(&bucket),
            UNLISTED_BUCKET_MULTIPLIER
        );
        let contract = ContractType::Other("seasonal".into());
        assert_eq!(
            ContractScores::DEFAULT.score(&contract),
            UNKNOWN_CONTRACT_SCORE
        );
    }

    #[test]
    fn partial_json_keeps_default_tables() {
        let json = r#"{ "provision_rates": { "low": 0.02, "medium_low": 0.1, "medium": 0.2,
            "medium_high": 0.4, "high": 0.9 } }"#;
        let config = EngineConfig::from_json_str(json).unwrap();
        assert_eq!(config.risk_weights, RiskWeights::DEFAULT);
        assert_abs_diff_eq!(config.provision_rates.get(RiskCategory::High), 0.9);
    }

    #[test]
    fn rejects_weights_not_summing_to_one() {
        let json = r#"{ "risk_weights": { "financial_stability": 0.5, "income_reliability": 0.25,
            "employment_stability": 0.2, "credit_history": 0.15, "assets": 0.1 } }"#;
        let err = EngineConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, RiskError::Config(_)));
    }

    #[test]
    fn rejects_negative_aging_multiplier() {
        let mut config = EngineConfig::DEFAULT;
        config.aging_multipliers.over_360 = -1.0;
        assert!(matches!(config.validate(), Err(RiskError::Config(_))));
    }
}
