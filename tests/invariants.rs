//! Structural invariants of the engines, checked over sweeps of inputs rather than single
//! reference points.

use std::collections::BTreeMap;

use approx::assert_relative_eq;
use debtrisk::config::{EngineConfig, RiskWeights};
use debtrisk::core::{RiskCategory, RiskError};
use debtrisk::documents::{DocumentContent, DocumentSlot, DocumentValidator};
use debtrisk::pipeline::{assess_cases, value_debts, CaseInput};
use debtrisk::provisions::{StressScenario, stress_test};
use debtrisk::scoring::{RiskScorer, ScoreOutcome};
use debtrisk::valuation::{DebtCase, MarketFactors, simulate_seeded};

fn full_submission() -> BTreeMap<String, DocumentContent> {
    let mut provided = BTreeMap::new();
    provided.insert(
        "financial_statement".to_string(),
        DocumentContent::new()
            .with("assets", 400_000)
            .with("liabilities", 100_000)
            .with("revenue", 250_000)
            .with("profit", 25_000),
    );
    provided.insert(
        "income_statement".to_string(),
        DocumentContent::new()
            .with("monthly_income", 4500)
            .with("employment_period", 18)
            .with("position", "clerk"),
    );
    provided.insert(
        "employment_contract".to_string(),
        DocumentContent::new()
            .with("contract_type", "b2b")
            .with("start_date", "2023-01-15")
            .with("salary", 4500),
    );
    provided.insert(
        "credit_history".to_string(),
        DocumentContent::new()
            .with("credit_score", 0.55)
            .with("payment_history", 0.7)
            .with("active_loans", 3),
    );
    provided
}

#[test]
fn default_weights_sum_to_one() {
    assert_relative_eq!(RiskWeights::DEFAULT.sum(), 1.0, epsilon = 1.0e-9);
    assert!(EngineConfig::DEFAULT.validate().is_ok());
}

#[test]
fn category_is_monotone_in_overall_score() {
    let scores: Vec<f64> = (0..=1000).map(|i| i as f64 / 1000.0).collect();
    for pair in scores.windows(2) {
        let (lower, higher) = (pair[0], pair[1]);
        assert!(
            RiskCategory::from_overall_score(higher).rank()
                <= RiskCategory::from_overall_score(lower).rank(),
            "rank increased between {lower} and {higher}"
        );
    }
    assert_eq!(RiskCategory::from_overall_score(1.0), RiskCategory::Low);
    assert_eq!(RiskCategory::from_overall_score(0.0), RiskCategory::High);
}

#[test]
fn any_missing_required_document_blocks_scoring() {
    let required = [
        DocumentSlot::FinancialStatement,
        DocumentSlot::IncomeStatement,
        DocumentSlot::EmploymentContract,
        DocumentSlot::CreditHistory,
    ];
    for slot in required {
        let mut provided = full_submission();
        provided.remove(slot.key());
        let mut validator = DocumentValidator::new();
        let outcome = RiskScorer::default()
            .score(validator.validate(&provided))
            .unwrap();
        match outcome {
            ScoreOutcome::Rejected {
                missing_documents, ..
            } => assert_eq!(missing_documents.len(), 1, "slot {slot}"),
            ScoreOutcome::Scored(_) => panic!("scored without {slot}"),
        }
    }
}

#[test]
fn incomplete_required_document_also_blocks_scoring() {
    let mut provided = full_submission();
    provided.insert(
        "credit_history".to_string(),
        DocumentContent::new().with("credit_score", 0.9),
    );
    let mut validator = DocumentValidator::new();
    let outcome = RiskScorer::default()
        .score(validator.validate(&provided))
        .unwrap();
    assert!(outcome.assessment().is_none());
}

#[test]
fn negative_document_figures_fail_instead_of_leaving_unit_range() {
    let mut provided = full_submission();
    provided.insert(
        "financial_statement".to_string(),
        DocumentContent::new()
            .with("assets", 100_000)
            .with("liabilities", -500_000)
            .with("revenue", 250_000)
            .with("profit", 25_000),
    );
    let mut validator = DocumentValidator::new();
    let result = RiskScorer::default().score(validator.validate(&provided));
    assert!(matches!(
        result,
        Err(RiskError::InvalidField { ref field, .. }) if field == "liabilities"
    ));

    let mut provided = full_submission();
    provided.insert(
        "income_statement".to_string(),
        DocumentContent::new()
            .with("monthly_income", -50_000)
            .with("employment_period", 18)
            .with("position", "clerk"),
    );
    let mut validator = DocumentValidator::new();
    assert!(RiskScorer::default().score(validator.validate(&provided)).is_err());
}

#[test]
fn validation_is_idempotent() {
    let provided = full_submission();
    let mut validator = DocumentValidator::new();
    let first = validator.validate(&provided).clone();
    let second = validator.validate(&provided).clone();
    assert_eq!(first, second);
}

#[test]
fn simulated_mean_converges_to_expected_recovery() {
    for &(base, p) in &[(1_000.0, 0.3), (5_000.0, 0.75), (250.0, 0.95)] {
        let result = simulate_seeded(base, p, 100_000, 123).unwrap();
        assert_relative_eq!(result.expected_value, base * p, max_relative = 0.02);
    }
}

#[test]
fn stress_shocks_multiply_in_sequence() {
    let scenarios = vec![
        StressScenario::new("defaults").with_default_rate_increase(0.1),
        StressScenario::new("defaults and recovery")
            .with_default_rate_increase(0.1)
            .with_recovery_rate_decrease(0.2),
        StressScenario::new("all")
            .with_default_rate_increase(0.1)
            .with_recovery_rate_decrease(0.2)
            .with_market_downturn(0.4),
    ];
    let out = stress_test(1000.0, 8000.0, &scenarios).unwrap();
    assert_relative_eq!(out[0].required_reserve, 1100.0, epsilon = 1.0e-9);
    assert_relative_eq!(out[1].required_reserve, 1375.0, epsilon = 1.0e-9);
    assert_relative_eq!(out[2].required_reserve, 1375.0 * 1.2, epsilon = 1.0e-9);
}

#[test]
fn full_recovery_shock_is_a_domain_error() {
    let scenario = StressScenario::new("wipeout").with_recovery_rate_decrease(1.0);
    assert!(matches!(
        stress_test(1000.0, 8000.0, &[scenario]),
        Err(RiskError::Domain(_))
    ));
}

#[test]
fn batches_preserve_input_order() {
    let cases: Vec<CaseInput> = (0..8)
        .map(|i| CaseInput {
            documents: if i % 2 == 0 {
                full_submission()
            } else {
                BTreeMap::new()
            },
        })
        .collect();
    let outcomes = assess_cases(&cases, &EngineConfig::DEFAULT);
    for (i, outcome) in outcomes.iter().enumerate() {
        assert_eq!(outcome.as_ref().unwrap().outcome.is_scored(), i % 2 == 0);
    }

    let debts: Vec<DebtCase> = (1..=6)
        .map(|i| DebtCase {
            amount: 1_000.0 * i as f64,
            age_months: 0.0,
            risk_category: RiskCategory::Low,
            recovery_probability: 1.0,
            market: MarketFactors::default(),
        })
        .collect();
    let valuations = value_debts(&debts, &EngineConfig::DEFAULT, 77, 200, 0.5);
    for (i, valuation) in valuations.iter().enumerate() {
        let v = valuation.as_ref().unwrap();
        assert_relative_eq!(v.base_value, 1_000.0 * (i + 1) as f64, epsilon = 1.0e-9);
    }
}
