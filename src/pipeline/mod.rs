//! Batch entry points and the combined credit report.
//!
//! Cases and debts are independent; each one gets its own result and a failing item never
//! aborts the batch. With the `parallel` feature the batches run on Rayon and still return
//! results in input order.
//!
//! Debt `i` is simulated with a private `StdRng` seeded `seed + i * 7919` (wrapping), so a
//! batch is reproducible regardless of evaluation order.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::core::{AgeBucket, RiskResult};
use crate::documents::{DocumentContent, DocumentSet, DocumentValidator};
use crate::provisions::{
    PortfolioEntry, ProvisionCalculator, ProvisionReport, ProvisionResult, StressOutcome,
    StressScenario, generate_report, stress_test,
};
use crate::scoring::{RiskScorer, ScoreOutcome};
use crate::valuation::{DEFAULT_SCENARIOS, DebtCase, DebtValuation, DebtValuator};

const SEED_STRIDE: u64 = 7_919;

/// Documents supplied for one applicant, keyed by slot name such as `"financial_statement"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseInput {
    #[serde(default)]
    pub documents: BTreeMap<String, DocumentContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseOutcome {
    pub documents: DocumentSet,
    pub outcome: ScoreOutcome,
}

/// Validates the case's documents against a fresh standard set and scores it.
pub fn assess_case(case: &CaseInput, scorer: &RiskScorer) -> RiskResult<CaseOutcome> {
    let mut validator = DocumentValidator::new();
    validator.validate(&case.documents);
    let documents = validator.into_documents();
    let outcome = scorer.score(&documents)?;
    Ok(CaseOutcome { documents, outcome })
}

pub fn assess_cases(cases: &[CaseInput], config: &EngineConfig) -> Vec<RiskResult<CaseOutcome>> {
    let scorer = RiskScorer::from_config(config);
    let assess = |case: &CaseInput| assess_case(case, &scorer);

    #[cfg(feature = "parallel")]
    let outcomes = cases.par_iter().map(assess).collect::<Vec<_>>();
    #[cfg(not(feature = "parallel"))]
    let outcomes = cases.iter().map(assess).collect::<Vec<_>>();
    outcomes
}

pub fn debt_seed(seed: u64, index: usize) -> u64 {
    seed.wrapping_add((index as u64).wrapping_mul(SEED_STRIDE))
}

pub fn value_debts(
    debts: &[DebtCase],
    config: &EngineConfig,
    seed: u64,
    n_scenarios: usize,
    risk_appetite: f64,
) -> Vec<RiskResult<DebtValuation>> {
    let valuator = DebtValuator::from_config(config);
    let value_one = |(i, debt): (usize, &DebtCase)| {
        let mut rng = StdRng::seed_from_u64(debt_seed(seed, i));
        valuator.value(debt, n_scenarios, risk_appetite, &mut rng)
    };

    #[cfg(feature = "parallel")]
    let valuations = debts.par_iter().enumerate().map(value_one).collect::<Vec<_>>();
    #[cfg(not(feature = "parallel"))]
    let valuations = debts.iter().enumerate().map(value_one).collect::<Vec<_>>();
    valuations
}

/// Everything the reporting front end needs for one credit file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditCase {
    pub documents: BTreeMap<String, DocumentContent>,
    pub portfolio: Vec<PortfolioEntry>,
    /// Amounts by age bucket for the aging adjustment. Derived from `portfolio` when empty.
    pub age_distribution: BTreeMap<AgeBucket, f64>,
    /// Reserve currently held. Defaults to the computed base reserve.
    pub current_reserve: Option<f64>,
    /// Monthly reserve levels, oldest first.
    pub reserve_history: Vec<f64>,
    pub stress_scenarios: Vec<StressScenario>,
    pub debts: Vec<DebtCase>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOptions {
    pub seed: u64,
    pub n_scenarios: usize,
    pub risk_appetite: f64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            n_scenarios: DEFAULT_SCENARIOS,
            risk_appetite: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionSection {
    pub base: ProvisionResult,
    pub aged_exposure: f64,
    pub stress_results: Vec<StressOutcome>,
    /// Present when a reserve history was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ProvisionReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditReport {
    pub assessment: CaseOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisions: Option<ProvisionSection>,
    pub debts: Vec<DebtValuation>,
}

fn provision_section(
    case: &CreditCase,
    calculator: &ProvisionCalculator,
) -> RiskResult<ProvisionSection> {
    let base = calculator.base_provisions(&case.portfolio)?;
    let aged_exposure = if case.age_distribution.is_empty() {
        calculator.aged_exposure(&case.portfolio)?
    } else {
        calculator.adjust_for_aging(&case.age_distribution)?
    };
    let reserve = case.current_reserve.unwrap_or(base.total_reserve);
    let stress_results = stress_test(reserve, base.total_exposure, &case.stress_scenarios)?;
    let report = if case.reserve_history.is_empty() {
        None
    } else {
        Some(generate_report(&base, &case.reserve_history, &stress_results)?)
    };
    Ok(ProvisionSection {
        base,
        aged_exposure,
        stress_results,
        report,
    })
}

/// Scores the documents, provisions the portfolio (when one is given), and values every debt.
pub fn run_case(
    case: &CreditCase,
    config: &EngineConfig,
    options: RunOptions,
) -> RiskResult<CreditReport> {
    config.validate()?;
    let scorer = RiskScorer::from_config(config);
    let assessment = assess_case(
        &CaseInput {
            documents: case.documents.clone(),
        },
        &scorer,
    )?;

    let provisions = if case.portfolio.is_empty() {
        None
    } else {
        Some(provision_section(case, &ProvisionCalculator::from_config(config))?)
    };

    let debts = value_debts(
        &case.debts,
        config,
        options.seed,
        options.n_scenarios,
        options.risk_appetite,
    )
    .into_iter()
    .collect::<RiskResult<Vec<_>>>()?;

    tracing::info!(
        scored = assessment.outcome.is_scored(),
        debts = debts.len(),
        "credit case processed"
    );
    Ok(CreditReport {
        assessment,
        provisions,
        debts,
    })
}
