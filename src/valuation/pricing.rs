use serde::{Deserialize, Serialize};

use crate::config::CategoryTable;
use crate::core::{RiskCategory, RiskError, RiskResult, require_non_negative};

/// Age, in months, at which straight-line discounting reaches zero.
pub const AGE_HORIZON_MONTHS: f64 = 60.0;

const INTEREST_RATE_SENSITIVITY: f64 = 0.10;
const UNEMPLOYMENT_SENSITIVITY: f64 = 0.05;
const GDP_GROWTH_SENSITIVITY: f64 = 0.10;

/// `amount * weight(category) * max(0, 1 - age_months / 60)`.
pub fn base_value(
    amount: f64,
    age_months: f64,
    category: RiskCategory,
    weights: &CategoryTable,
) -> RiskResult<f64> {
    require_non_negative("debt amount", amount)?;
    require_non_negative("debt age", age_months)?;
    let age_discount = (1.0 - age_months / AGE_HORIZON_MONTHS).max(0.0);
    Ok(amount * weights.get(category) * age_discount)
}

/// Optional macro factors; each absent factor contributes a multiplier of 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MarketFactors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unemployment_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gdp_growth: Option<f64>,
}

impl MarketFactors {
    pub fn multiplier(&self) -> RiskResult<f64> {
        let mut m = 1.0;
        if let Some(rate) = self.interest_rate {
            m *= 1.0 - rate * INTEREST_RATE_SENSITIVITY;
        }
        if let Some(rate) = self.unemployment_rate {
            m *= 1.0 - rate * UNEMPLOYMENT_SENSITIVITY;
        }
        if let Some(growth) = self.gdp_growth {
            m *= 1.0 + growth * GDP_GROWTH_SENSITIVITY;
        }
        if !m.is_finite() || m < 0.0 {
            return Err(RiskError::Domain(format!(
                "market factors yield an invalid multiplier {m}"
            )));
        }
        Ok(m)
    }
}

pub fn market_adjust(base: f64, factors: &MarketFactors) -> RiskResult<f64> {
    require_non_negative("base value", base)?;
    Ok(base * factors.multiplier()?)
}
