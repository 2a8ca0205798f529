//! Per-debt valuation and pricing.
//!
//! This module wires and re-exports:
//! - `pricing`: age-discounted base value and macro market adjustment,
//! - `simulation`: seeded Monte Carlo outcome distribution with a per-sample recovery gate,
//! - `recommendation`: appetite-blended price with heuristic justification notes.
//!
//! [`DebtValuator`] chains the three stages for one [`DebtCase`].

pub mod pricing;
pub mod recommendation;
pub mod simulation;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{CategoryTable, EngineConfig};
use crate::core::{RiskCategory, RiskError, RiskResult, require_unit_interval};
use crate::models::ProbabilityModel;

pub use pricing::{AGE_HORIZON_MONTHS, MarketFactors, base_value, market_adjust};
pub use recommendation::{PriceRange, PricingRecommendation, justification, recommend_price};
pub use simulation::{
    DEFAULT_SCENARIOS, ValuationResult, simulate, simulate_samples, simulate_seeded,
};

/// One debt offered for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtCase {
    pub amount: f64,
    pub age_months: f64,
    pub risk_category: RiskCategory,
    /// Probability that the debt yields any payment, from an external model.
    pub recovery_probability: f64,
    #[serde(default)]
    pub market: MarketFactors,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtValuation {
    pub base_value: f64,
    pub market_value: f64,
    pub valuation: ValuationResult,
    pub pricing: PricingRecommendation,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebtValuator {
    weights: CategoryTable,
}

impl DebtValuator {
    pub fn new(weights: CategoryTable) -> Self {
        Self { weights }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.valuation_weights)
    }

    pub fn base_value(&self, amount: f64, age_months: f64, category: RiskCategory) -> RiskResult<f64> {
        base_value(amount, age_months, category, &self.weights)
    }

    /// Full chain: base value, market adjustment, simulation, and price recommendation.
    pub fn value<R: Rng + ?Sized>(
        &self,
        debt: &DebtCase,
        n_scenarios: usize,
        risk_appetite: f64,
        rng: &mut R,
    ) -> RiskResult<DebtValuation> {
        let base = self.base_value(debt.amount, debt.age_months, debt.risk_category)?;
        let market_value = market_adjust(base, &debt.market)?;
        let valuation = simulate(market_value, debt.recovery_probability, n_scenarios, rng)?;
        let pricing = recommend_price(&valuation, risk_appetite)?;
        Ok(DebtValuation {
            base_value: base,
            market_value,
            valuation,
            pricing,
        })
    }
}

impl Default for DebtValuator {
    fn default() -> Self {
        Self::from_config(&EngineConfig::DEFAULT)
    }
}

/// Recovery probability for one debt's feature row from a collaborator model.
pub fn recovery_probability<M: ProbabilityModel + ?Sized>(
    model: &M,
    features: &[f64],
) -> RiskResult<f64> {
    let predictions = model.predict(&[features.to_vec()])?;
    let [p] = predictions.as_slice() else {
        return Err(RiskError::InvalidInput(format!(
            "expected one recovery prediction, got {}",
            predictions.len()
        )));
    };
    require_unit_interval("recovery probability", *p)?;
    Ok(*p)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::models::FixedProbability;

    #[test]
    fn values_debt_end_to_end() {
        let debt = DebtCase {
            amount: 10_000.0,
            age_months: 30.0,
            risk_category: RiskCategory::Medium,
            recovery_probability: 0.8,
            market: MarketFactors {
                gdp_growth: Some(0.5),
                ..MarketFactors::default()
            },
        };
        let mut rng = StdRng::seed_from_u64(2024);
        let out = DebtValuator::default()
            .value(&debt, 5000, 0.5, &mut rng)
            .unwrap();

        assert_relative_eq!(out.base_value, 3000.0, epsilon = 1.0e-9);
        assert_relative_eq!(out.market_value, 3150.0, epsilon = 1.0e-9);
        assert_relative_eq!(out.valuation.expected_value, 3150.0 * 0.8, max_relative = 0.05);
        assert!(out.pricing.price_range.min <= out.pricing.recommended_price);
        assert!(out.pricing.recommended_price <= out.pricing.price_range.max);
    }

    #[test]
    fn reads_recovery_probability_from_model() {
        let p = recovery_probability(&FixedProbability(0.35), &[1000.0, 12.0, 0.4]).unwrap();
        assert_eq!(p, 0.35);
        assert!(recovery_probability(&FixedProbability(1.4), &[1.0]).is_err());
    }

    #[test]
    fn debt_case_defaults_market_factors() {
        let json = r#"{"amount": 500.0, "age_months": 6, "risk_category": "high",
            "recovery_probability": 0.3}"#;
        let debt: DebtCase = serde_json::from_str(json).unwrap();
        assert_eq!(debt.market, MarketFactors::default());
        assert_eq!(debt.risk_category, RiskCategory::High);
    }
}
