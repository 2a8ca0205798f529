//! Reserve report: current state, trend, stress results, and advisories.
//!
//! The trend direction compares the latest reserve with the observation at index `len - 6`
//! of the history, and the year-over-year change uses index `len - 12`. Both are short-horizon
//! heuristics, not statistical tests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{RiskCategory, RiskError, RiskResult};
use crate::math;

use super::base::ProvisionResult;
use super::stress::StressOutcome;

/// Observations needed for the year-over-year comparison (monthly history).
pub const YEAR_OVER_YEAR_WINDOW: usize = 12;
/// Observations spanned by the trend-direction comparison.
pub const TREND_WINDOW: usize = 6;
/// Coverage below this triggers the low-coverage advisory.
pub const MIN_COVERAGE_RATIO: f64 = 0.2;
/// Worst stress shortfall, as a share of current reserve, that triggers the buffer advisory.
pub const MAX_STRESS_SHORTFALL_SHARE: f64 = 0.3;

pub const LOW_COVERAGE_ADVICE: &str = "Consider raising reserves: coverage ratio is low";
pub const STRESS_BUFFER_ADVICE: &str =
    "High risk under stress scenarios: consider building an additional reserve buffer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    /// `latest / history[len - 12] - 1`.
    pub year_over_year_change: f64,
    /// Coefficient of variation (sample standard deviation over mean).
    pub volatility: f64,
    pub direction: TrendDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentState {
    pub reserve_level: f64,
    pub coverage_ratio: f64,
    pub reserve_structure: BTreeMap<RiskCategory, f64>,
}

impl From<&ProvisionResult> for CurrentState {
    fn from(result: &ProvisionResult) -> Self {
        Self {
            reserve_level: result.total_reserve,
            coverage_ratio: result.coverage_ratio,
            reserve_structure: result.per_category.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionReport {
    pub current_state: CurrentState,
    pub trend: TrendAnalysis,
    pub stress_results: Vec<StressOutcome>,
    pub recommendations: Vec<String>,
}

/// Trend of a reserve history ordered oldest first.
pub fn analyze_trend(history: &[f64]) -> RiskResult<TrendAnalysis> {
    let n = history.len();
    if n < YEAR_OVER_YEAR_WINDOW {
        return Err(RiskError::InsufficientHistory {
            required: YEAR_OVER_YEAR_WINDOW,
            actual: n,
        });
    }
    if history.iter().any(|v| !v.is_finite()) {
        return Err(RiskError::InvalidInput(
            "reserve history must be finite".to_string(),
        ));
    }

    let latest = history[n - 1];
    let year_ago = history[n - YEAR_OVER_YEAR_WINDOW];
    if year_ago == 0.0 {
        return Err(RiskError::Domain(
            "year-over-year base reserve is zero".to_string(),
        ));
    }

    let mean = math::mean(history).unwrap_or(0.0);
    if mean == 0.0 {
        return Err(RiskError::Domain(
            "reserve history has zero mean".to_string(),
        ));
    }
    let std = math::sample_std(history).unwrap_or(0.0);

    let direction = if latest > history[n - TREND_WINDOW] {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    };

    Ok(TrendAnalysis {
        year_over_year_change: latest / year_ago - 1.0,
        volatility: std / mean,
        direction,
    })
}

/// Threshold advisories over current coverage and the worst stress shortfall.
pub fn reserve_recommendations(current: &ProvisionResult, stress: &[StressOutcome]) -> Vec<String> {
    let mut recommendations = Vec::new();
    if current.coverage_ratio < MIN_COVERAGE_RATIO {
        recommendations.push(LOW_COVERAGE_ADVICE.to_string());
    }

    let worst_shortfall = stress
        .iter()
        .map(|s| s.shortfall)
        .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |a| a.max(s))));
    if let Some(worst) = worst_shortfall {
        if worst > current.total_reserve * MAX_STRESS_SHORTFALL_SHARE {
            recommendations.push(STRESS_BUFFER_ADVICE.to_string());
        }
    }
    recommendations
}

pub fn generate_report(
    current: &ProvisionResult,
    history: &[f64],
    stress: &[StressOutcome],
) -> RiskResult<ProvisionReport> {
    let trend = analyze_trend(history)?;
    let recommendations = reserve_recommendations(current, stress);
    if !recommendations.is_empty() {
        tracing::warn!(?recommendations, "reserve advisories raised");
    }
    Ok(ProvisionReport {
        current_state: CurrentState::from(current),
        trend,
        stress_results: stress.to_vec(),
        recommendations,
    })
}
