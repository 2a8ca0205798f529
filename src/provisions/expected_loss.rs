use serde::{Deserialize, Serialize};

use crate::core::{RiskError, RiskResult};
use crate::math;
use crate::models::ProbabilityModel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedLossSummary {
    pub mean_loss: f64,
    pub max_loss: f64,
    /// Population standard deviation of predicted losses.
    pub std_dev: f64,
    /// 5th and 95th percentiles.
    pub confidence_interval: [f64; 2],
}

/// Summary statistics of predicted per-row losses.
pub fn summarize_expected_losses(predicted: &[f64]) -> RiskResult<ExpectedLossSummary> {
    if predicted.is_empty() {
        return Err(RiskError::InvalidInput(
            "no predicted losses to summarize".to_string(),
        ));
    }
    if predicted.iter().any(|v| !v.is_finite()) {
        return Err(RiskError::InvalidInput(
            "predicted losses must be finite".to_string(),
        ));
    }

    let mut sorted = predicted.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Ok(ExpectedLossSummary {
        mean_loss: math::mean(predicted).unwrap_or(0.0),
        max_loss: sorted[sorted.len() - 1],
        std_dev: math::population_std(predicted).unwrap_or(0.0),
        confidence_interval: [
            math::sorted_quantile(&sorted, 0.05),
            math::sorted_quantile(&sorted, 0.95),
        ],
    })
}

/// Predicts losses with a collaborator regressor and summarizes them.
///
/// The model's outputs are loss amounts, not probabilities, so they are only required to
/// be finite.
pub fn expected_losses<M: ProbabilityModel + ?Sized>(
    model: &M,
    features: &[Vec<f64>],
) -> RiskResult<ExpectedLossSummary> {
    let predicted = model.predict(features)?;
    summarize_expected_losses(&predicted)
}
