//! Reserve provisioning for a tagged portfolio.
//!
//! This module wires and re-exports:
//! - `base`: category-rate reserves, coverage ratio, and age-bucket adjustment,
//! - `stress`: sequential multiplicative stress scenarios against current reserves,
//! - `report`: trend analysis, advisories, and the combined reserve report,
//! - `expected_loss`: summaries of model-predicted losses.

pub mod base;
pub mod expected_loss;
pub mod report;
pub mod stress;

pub use base::{
    PortfolioEntry, ProvisionCalculator, ProvisionResult, adjust_for_aging, age_distribution,
    base_provisions, total_exposure,
};
pub use expected_loss::{ExpectedLossSummary, expected_losses, summarize_expected_losses};
pub use report::{
    CurrentState, ProvisionReport, TrendAnalysis, TrendDirection, analyze_trend, generate_report,
    reserve_recommendations,
};
pub use stress::{StressOutcome, StressScenario, stress_test};
