//! Per-component scoring rules. Each rule reads exactly one document and returns a
//! score in `[0, 1]`. Amounts, tenure and normalized bureau inputs must be non-negative;
//! only `profit` may be signed since its margin is clamped.

use serde::{Deserialize, Serialize};

use crate::config::{ContractScores, RiskWeights};
use crate::core::{ContractType, RiskComponent, RiskResult};
use crate::documents::DocumentContent;

/// Monthly income at which the income term saturates.
pub const INCOME_CAP: f64 = 10_000.0;
/// Employment tenure, in months, at which the tenure term saturates.
pub const TENURE_CAP_MONTHS: f64 = 60.0;
/// Property value at which the asset score saturates.
pub const PROPERTY_CAP: f64 = 1_000_000.0;
/// Asset score when no property valuation was provided.
pub const NEUTRAL_ASSET_SCORE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskComponents {
    pub financial_stability: f64,
    pub income_reliability: f64,
    pub employment_stability: f64,
    pub credit_history: f64,
    pub assets: f64,
}

impl RiskComponents {
    pub fn get(&self, component: RiskComponent) -> f64 {
        match component {
            RiskComponent::FinancialStability => self.financial_stability,
            RiskComponent::IncomeReliability => self.income_reliability,
            RiskComponent::EmploymentStability => self.employment_stability,
            RiskComponent::CreditHistory => self.credit_history,
            RiskComponent::Assets => self.assets,
        }
    }

    /// Components in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (RiskComponent, f64)> + '_ {
        RiskComponent::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    /// `sum(component * weight)`.
    pub fn weighted_score(&self, weights: &RiskWeights) -> f64 {
        self.iter().map(|(c, s)| s * weights.weight(c)).sum()
    }
}

/// `(1 - min(liabilities/assets, 1)) * 0.6 + clamp(profit/revenue, 0, 1) * 0.4`,
/// or `0.0` when assets or revenue is zero.
pub fn financial_stability(doc: &DocumentContent) -> RiskResult<f64> {
    const DOC: &str = "financial_statement";
    let assets = doc.non_negative_or_zero(DOC, "assets")?;
    let liabilities = doc.non_negative_or_zero(DOC, "liabilities")?;
    let revenue = doc.non_negative_or_zero(DOC, "revenue")?;
    let profit = doc.number_or_zero(DOC, "profit")?;

    if assets == 0.0 || revenue == 0.0 {
        return Ok(0.0);
    }

    let debt_ratio = liabilities / assets;
    let profit_margin = profit / revenue;
    Ok((1.0 - debt_ratio.min(1.0)) * 0.6 + profit_margin.clamp(0.0, 1.0) * 0.4)
}

/// Income level and tenure, each saturating at its cap.
pub fn income_reliability(doc: &DocumentContent) -> RiskResult<f64> {
    const DOC: &str = "income_statement";
    let monthly_income = doc.non_negative_or_zero(DOC, "monthly_income")?;
    let employment_period = doc.non_negative_or_zero(DOC, "employment_period")?;

    let income_score = (monthly_income / INCOME_CAP).min(1.0);
    let period_score = (employment_period / TENURE_CAP_MONTHS).min(1.0);
    Ok(income_score * 0.7 + period_score * 0.3)
}

pub fn employment_stability(doc: &DocumentContent, scores: &ContractScores) -> f64 {
    let contract = ContractType::from(doc.text_or_empty("contract_type"));
    scores.score(&contract)
}

/// Weighted blend of bureau score and payment history, both pre-normalized to `[0, 1]`.
pub fn credit_history(doc: &DocumentContent) -> RiskResult<f64> {
    const DOC: &str = "credit_history";
    let credit_score = doc.non_negative_or_zero(DOC, "credit_score")?;
    let payment_history = doc.non_negative_or_zero(DOC, "payment_history")?;
    Ok(credit_score * 0.6 + payment_history * 0.4)
}

/// Neutral score without a valuation, otherwise property value against [`PROPERTY_CAP`].
pub fn assets(doc: Option<&DocumentContent>) -> RiskResult<f64> {
    let Some(doc) = doc else {
        return Ok(NEUTRAL_ASSET_SCORE);
    };
    let property_value = doc.non_negative_or_zero("property_valuation", "property_value")?;
    Ok((property_value / PROPERTY_CAP).min(1.0))
}
