use serde::{Deserialize, Serialize};

use crate::core::{RiskResult, require_unit_interval};

use super::simulation::ValuationResult;

pub const HIGH_VOLATILITY_NOTE: &str = "High value volatility: caution advised";
pub const LOSS_RISK_NOTE: &str = "Significant loss risk: consider collateral or hedging";
pub const UPSIDE_NOTE: &str = "High upside potential: consider a more aggressive price";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRecommendation {
    pub recommended_price: f64,
    /// `var_95` to `expected_value`.
    pub price_range: PriceRange,
    pub justification: Vec<String>,
}

/// Blends the conservative anchor (`var_95`) and the aggressive anchor (`expected_value`)
/// linearly by `risk_appetite`.
pub fn recommend_price(
    valuation: &ValuationResult,
    risk_appetite: f64,
) -> RiskResult<PricingRecommendation> {
    require_unit_interval("risk appetite", risk_appetite)?;

    let conservative = valuation.var_95;
    let aggressive = valuation.expected_value;
    Ok(PricingRecommendation {
        recommended_price: conservative * (1.0 - risk_appetite) + aggressive * risk_appetite,
        price_range: PriceRange {
            min: conservative,
            max: aggressive,
        },
        justification: justification(valuation),
    })
}

pub fn justification(v: &ValuationResult) -> Vec<String> {
    let mut notes = Vec::new();
    if v.expected_value > v.var_95 * 1.5 {
        notes.push(HIGH_VOLATILITY_NOTE.to_string());
    }
    if v.max_loss < v.expected_value * 0.5 {
        notes.push(LOSS_RISK_NOTE.to_string());
    }
    if v.max_gain > v.expected_value * 2.0 {
        notes.push(UPSIDE_NOTE.to_string());
    }
    notes
}
