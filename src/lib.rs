//! Debtrisk is a credit-risk toolkit: it gates a borrower's documents, scores the borrower,
//! sizes loan-loss reserves for a portfolio, and values individual debts for sale.
//!
//! The crate is organized as a pipeline of small engines sharing one configuration:
//! document validation feeds the weighted risk scorer, portfolio rows tagged with a risk
//! band feed the provisioning engine, and each debt offered for sale goes through
//! age/market pricing, a seeded Monte Carlo outcome simulation, and a price recommendation.
//! Predictive models (default probability, recovery probability, payment forecasting) are
//! external collaborators behind the traits in [`models`].
//!
//! Numerical considerations:
//! - Percentiles use linear interpolation between closest ranks.
//! - Volatility figures use the sample standard deviation; the expected-loss summary uses the
//!   population standard deviation.
//! - Monte Carlo results are reproducible for a fixed seed; the random source is injected.
//!
//! # Feature Flags
//! - `parallel`: runs batch case scoring and debt valuation on Rayon.
//! - `cli` (default): builds the `credit_report` binary.
//!
//! # Quick Start
//! Validate documents and score a borrower:
//! ```rust
//! use std::collections::BTreeMap;
//! use debtrisk::core::RiskCategory;
//! use debtrisk::documents::{DocumentContent, DocumentValidator};
//! use debtrisk::scoring::RiskScorer;
//!
//! let mut provided = BTreeMap::new();
//! provided.insert(
//!     "financial_statement".to_string(),
//!     DocumentContent::new()
//!         .with("assets", 100_000)
//!         .with("liabilities", 50_000)
//!         .with("revenue", 80_000)
//!         .with("profit", 20_000),
//! );
//! provided.insert(
//!     "income_statement".to_string(),
//!     DocumentContent::new()
//!         .with("monthly_income", 5_000)
//!         .with("employment_period", 60)
//!         .with("position", "analyst"),
//! );
//! provided.insert(
//!     "employment_contract".to_string(),
//!     DocumentContent::new()
//!         .with("contract_type", "permanent")
//!         .with("start_date", "2019-03-01")
//!         .with("salary", 5_000),
//! );
//! provided.insert(
//!     "credit_history".to_string(),
//!     DocumentContent::new()
//!         .with("credit_score", 0.7)
//!         .with("payment_history", 0.9)
//!         .with("active_loans", 1),
//! );
//!
//! let mut validator = DocumentValidator::new();
//! let documents = validator.validate(&provided);
//! let outcome = RiskScorer::default().score(documents)?;
//! let assessment = outcome.assessment().unwrap();
//! assert!((assessment.overall_score - 0.6495).abs() < 1.0e-9);
//! assert_eq!(assessment.risk_category, RiskCategory::MediumLow);
//! # Ok::<(), debtrisk::core::RiskError>(())
//! ```
//!
//! Size reserves and stress them:
//! ```rust
//! use debtrisk::core::{AgeBucket, RiskCategory};
//! use debtrisk::provisions::{PortfolioEntry, ProvisionCalculator, StressScenario, stress_test};
//!
//! let portfolio = vec![
//!     PortfolioEntry::new(6_000.0, RiskCategory::Low, AgeBucket::Days0To30),
//!     PortfolioEntry::new(4_000.0, RiskCategory::Medium, AgeBucket::Days91To180),
//! ];
//! let reserves = ProvisionCalculator::default().base_provisions(&portfolio)?;
//! assert!((reserves.total_reserve - 1_300.0).abs() < 1.0e-9);
//!
//! let recession = StressScenario::new("recession").with_default_rate_increase(0.5);
//! let stressed = stress_test(reserves.total_reserve, reserves.total_exposure, &[recession])?;
//! assert!((stressed[0].shortfall - 650.0).abs() < 1.0e-9);
//! # Ok::<(), debtrisk::core::RiskError>(())
//! ```
//!
//! Value a debt with a reproducible simulation:
//! ```rust
//! use debtrisk::core::RiskCategory;
//! use debtrisk::config::CategoryTable;
//! use debtrisk::valuation::{base_value, recommend_price, simulate_seeded};
//!
//! let base = base_value(10_000.0, 30.0, RiskCategory::Medium, &CategoryTable::VALUATION_WEIGHTS)?;
//! assert!((base - 3_000.0).abs() < 1.0e-9);
//!
//! let valuation = simulate_seeded(base, 0.7, 10_000, 42)?;
//! let pricing = recommend_price(&valuation, 0.5)?;
//! assert!(pricing.price_range.min <= pricing.recommended_price);
//! assert!(pricing.recommended_price <= pricing.price_range.max);
//! # Ok::<(), debtrisk::core::RiskError>(())
//! ```

pub mod config;
pub mod core;
pub mod documents;
pub mod math;
pub mod models;
pub mod pipeline;
pub mod provisions;
pub mod repayment;
pub mod scoring;
pub mod valuation;

/// Common imports for ergonomic usage.
#[allow(ambiguous_glob_reexports)]
pub mod prelude {
    pub use crate::config::*;
    pub use crate::core::*;
    pub use crate::documents::*;
    pub use crate::models::*;
    pub use crate::pipeline::*;
    pub use crate::provisions::*;
    pub use crate::scoring::*;
    pub use crate::valuation::*;
}
