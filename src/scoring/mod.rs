//! Borrower risk scoring.
//!
//! - `components`: the five independent component rules,
//! - `engine`: [`RiskScorer`], the gated weighted composite with category and advisories,
//! - `portfolio`: summaries of model-predicted default probabilities across a portfolio.

pub mod components;
pub mod engine;
pub mod portfolio;

pub use components::RiskComponents;
pub use engine::{RiskAssessment, RiskScorer, ScoreOutcome, recommendation_for, recommendations};
pub use portfolio::{
    PortfolioRiskIndicators, PortfolioScoreSummary, evaluate_portfolio,
    summarize_default_probabilities,
};
