use serde::{Deserialize, Serialize};

use crate::config::{ContractScores, EngineConfig, RiskWeights};
use crate::core::{RiskCategory, RiskComponent, RiskResult};
use crate::documents::{DocumentContent, DocumentSet, DocumentSlot};

use super::components::{self, RiskComponents};

/// Components scoring below this trigger their advisory.
pub const RECOMMENDATION_THRESHOLD: f64 = 0.4;

pub const MISSING_DOCUMENTS_MESSAGE: &str = "required documents missing or invalid";

/// Advisory attached when a component scores below [`RECOMMENDATION_THRESHOLD`].
pub fn recommendation_for(component: RiskComponent) -> &'static str {
    match component {
        RiskComponent::FinancialStability => "Improve financial stability before approval",
        RiskComponent::IncomeReliability => "Additional confirmation of income sources required",
        RiskComponent::EmploymentStability => {
            "Consider additional collateral due to employment instability"
        }
        RiskComponent::CreditHistory => "Explanation of credit history required",
        RiskComponent::Assets => "Consider additional asset-backed collateral",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub overall_score: f64,
    pub risk_category: RiskCategory,
    pub components: RiskComponents,
    pub recommendations: Vec<String>,
}

/// Result of scoring a document set. A rejection carries no partial score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScoreOutcome {
    Scored(RiskAssessment),
    Rejected {
        message: String,
        missing_documents: Vec<String>,
    },
}

impl ScoreOutcome {
    pub fn assessment(&self) -> Option<&RiskAssessment> {
        match self {
            Self::Scored(a) => Some(a),
            Self::Rejected { .. } => None,
        }
    }

    pub fn is_scored(&self) -> bool {
        matches!(self, Self::Scored(_))
    }
}

/// Weighted composite scorer over a validated document set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskScorer {
    weights: RiskWeights,
    contract_scores: ContractScores,
}

impl RiskScorer {
    pub fn new(weights: RiskWeights, contract_scores: ContractScores) -> Self {
        Self {
            weights,
            contract_scores,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.risk_weights, config.contract_scores)
    }

    pub fn weights(&self) -> &RiskWeights {
        &self.weights
    }

    /// Scores a document set, failing closed when any required document is blocking.
    ///
    /// `Err` is reserved for malformed field values; gating is reported as
    /// [`ScoreOutcome::Rejected`].
    pub fn score(&self, documents: &DocumentSet) -> RiskResult<ScoreOutcome> {
        let missing = documents.blocking_documents();
        if !missing.is_empty() {
            tracing::info!(?missing, "scoring rejected: required documents blocking");
            return Ok(ScoreOutcome::Rejected {
                message: MISSING_DOCUMENTS_MESSAGE.to_string(),
                missing_documents: missing,
            });
        }

        let components = self.components(documents)?;
        Ok(ScoreOutcome::Scored(self.assess_components(components)))
    }

    /// Builds an assessment from precomputed component scores.
    pub fn assess_components(&self, components: RiskComponents) -> RiskAssessment {
        let overall_score = components.weighted_score(&self.weights);
        let risk_category = RiskCategory::from_overall_score(overall_score);
        tracing::debug!(overall_score, %risk_category, "risk assessment computed");
        RiskAssessment {
            overall_score,
            risk_category,
            components,
            recommendations: recommendations(&components),
        }
    }

    fn components(&self, documents: &DocumentSet) -> RiskResult<RiskComponents> {
        let empty = DocumentContent::new();
        let content = |slot: DocumentSlot| documents.get(slot).map_or(&empty, |d| &d.content);

        Ok(RiskComponents {
            financial_stability: components::financial_stability(content(
                DocumentSlot::FinancialStatement,
            ))?,
            income_reliability: components::income_reliability(content(
                DocumentSlot::IncomeStatement,
            ))?,
            employment_stability: components::employment_stability(
                content(DocumentSlot::EmploymentContract),
                &self.contract_scores,
            ),
            credit_history: components::credit_history(content(DocumentSlot::CreditHistory))?,
            assets: components::assets(documents.provided_content(DocumentSlot::PropertyValuation))?,
        })
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::from_config(&EngineConfig::DEFAULT)
    }
}

/// Advisories in canonical component order, one per component under the threshold.
pub fn recommendations(components: &RiskComponents) -> Vec<String> {
    components
        .iter()
        .filter(|(_, score)| *score < RECOMMENDATION_THRESHOLD)
        .map(|(c, _)| recommendation_for(c).to_string())
        .collect()
}
