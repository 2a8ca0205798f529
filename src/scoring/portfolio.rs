//! Portfolio-level summary of externally predicted default probabilities.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{RiskCategory, RiskError, RiskResult, require_non_negative, require_unit_interval};
use crate::math;
use crate::models::ProbabilityModel;

/// Probability above which a row counts toward concentration.
pub const CONCENTRATION_THRESHOLD: f64 = 0.8;
const MEAN_PROBABILITY_LIMIT: f64 = 0.6;
const HIGH_RISK_SHARE_LIMIT: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioRiskIndicators {
    /// 95th percentile of predicted default probabilities.
    pub var_95: f64,
    /// Mean default probability times total exposure.
    pub expected_loss: f64,
    /// Share of rows with probability above [`CONCENTRATION_THRESHOLD`].
    pub risk_concentration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioScoreSummary {
    pub mean_probability: f64,
    pub median_probability: f64,
    /// Row counts for all five bands, including empty ones.
    pub category_distribution: BTreeMap<RiskCategory, usize>,
    pub indicators: PortfolioRiskIndicators,
    pub recommendations: Vec<String>,
}

/// Summarizes per-row default probabilities against row exposures.
///
/// The mitigation advisory fires when the *share* of rows in the high band exceeds 0.2,
/// which deliberately differs from comparing the raw high-band row count against 0.2.
pub fn summarize_default_probabilities(
    probabilities: &[f64],
    amounts: &[f64],
) -> RiskResult<PortfolioScoreSummary> {
    if probabilities.is_empty() {
        return Err(RiskError::InvalidInput(
            "portfolio must contain at least one row".to_string(),
        ));
    }
    if probabilities.len() != amounts.len() {
        return Err(RiskError::InvalidInput(format!(
            "{} probabilities for {} amounts",
            probabilities.len(),
            amounts.len()
        )));
    }
    for &p in probabilities {
        require_unit_interval("default probability", p)?;
    }
    for &a in amounts {
        require_non_negative("amount", a)?;
    }

    let n = probabilities.len() as f64;
    let mean_probability = math::mean(probabilities).unwrap_or(0.0);
    let median_probability = math::median(probabilities).unwrap_or(0.0);
    let var_95 = math::percentile(probabilities, 95.0).unwrap_or(0.0);

    let mut category_distribution: BTreeMap<RiskCategory, usize> =
        RiskCategory::ALL.into_iter().map(|c| (c, 0)).collect();
    for &p in probabilities {
        *category_distribution
            .entry(RiskCategory::from_default_probability(p))
            .or_default() += 1;
    }

    let total_amount: f64 = amounts.iter().sum();
    let concentrated = probabilities
        .iter()
        .filter(|&&p| p > CONCENTRATION_THRESHOLD)
        .count();
    let indicators = PortfolioRiskIndicators {
        var_95,
        expected_loss: mean_probability * total_amount,
        risk_concentration: concentrated as f64 / n,
    };

    let high_share = category_distribution[&RiskCategory::High] as f64 / n;
    let mut recommendations = Vec::new();
    if mean_probability > MEAN_PROBABILITY_LIMIT {
        recommendations.push("Consider tightening acceptance criteria".to_string());
    }
    if high_share > HIGH_RISK_SHARE_LIMIT {
        recommendations.push("Mitigation required for high-risk exposures".to_string());
    }

    Ok(PortfolioScoreSummary {
        mean_probability,
        median_probability,
        category_distribution,
        indicators,
        recommendations,
    })
}

/// Predicts default probabilities with a collaborator model, then summarizes them.
pub fn evaluate_portfolio<M: ProbabilityModel + ?Sized>(
    model: &M,
    features: &[Vec<f64>],
    amounts: &[f64],
) -> RiskResult<PortfolioScoreSummary> {
    let probabilities = model.predict(features)?;
    if probabilities.len() != features.len() {
        return Err(RiskError::InvalidInput(format!(
            "model returned {} predictions for {} rows",
            probabilities.len(),
            features.len()
        )));
    }
    summarize_default_probabilities(&probabilities, amounts)
}
