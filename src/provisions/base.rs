use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{AgingMultipliers, CategoryTable, EngineConfig};
use crate::core::{AgeBucket, RiskCategory, RiskError, RiskResult, require_non_negative};

/// One exposure row supplied by the portfolio table collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub amount: f64,
    pub risk_category: RiskCategory,
    pub age_bucket: AgeBucket,
}

impl PortfolioEntry {
    pub fn new(amount: f64, risk_category: RiskCategory, age_bucket: AgeBucket) -> Self {
        Self {
            amount,
            risk_category,
            age_bucket,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionResult {
    /// Reserve per band; every band is present, possibly at zero.
    pub per_category: BTreeMap<RiskCategory, f64>,
    pub total_reserve: f64,
    pub total_exposure: f64,
    /// `total_reserve / total_exposure`.
    pub coverage_ratio: f64,
}

/// Sum of entry amounts, rejecting negative or non-finite rows.
pub fn total_exposure(portfolio: &[PortfolioEntry]) -> RiskResult<f64> {
    let mut total = 0.0;
    for entry in portfolio {
        require_non_negative("portfolio amount", entry.amount)?;
        total += entry.amount;
    }
    Ok(total)
}

/// Category-rate reserves for a portfolio.
///
/// Fails with [`RiskError::ZeroExposure`] when the portfolio sums to zero.
pub fn base_provisions(
    portfolio: &[PortfolioEntry],
    rates: &CategoryTable,
) -> RiskResult<ProvisionResult> {
    let exposure = total_exposure(portfolio)?;
    if exposure == 0.0 {
        return Err(RiskError::ZeroExposure);
    }

    let mut amounts: BTreeMap<RiskCategory, f64> =
        RiskCategory::ALL.into_iter().map(|c| (c, 0.0)).collect();
    for entry in portfolio {
        *amounts.entry(entry.risk_category).or_default() += entry.amount;
    }

    let per_category: BTreeMap<RiskCategory, f64> = amounts
        .into_iter()
        .map(|(category, amount)| (category, amount * rates.get(category)))
        .collect();
    let total_reserve: f64 = per_category.values().sum();

    Ok(ProvisionResult {
        per_category,
        total_reserve,
        total_exposure: exposure,
        coverage_ratio: total_reserve / exposure,
    })
}

/// Aggregates entry amounts by age bucket.
pub fn age_distribution(portfolio: &[PortfolioEntry]) -> BTreeMap<AgeBucket, f64> {
    let mut out = BTreeMap::new();
    for entry in portfolio {
        *out.entry(entry.age_bucket.clone()).or_insert(0.0) += entry.amount;
    }
    out
}

/// `sum(amount * multiplier(bucket))`; unlisted buckets use a multiplier of 1.0.
pub fn adjust_for_aging(
    amounts_by_bucket: &BTreeMap<AgeBucket, f64>,
    multipliers: &AgingMultipliers,
) -> RiskResult<f64> {
    let mut adjusted = 0.0;
    for (bucket, &amount) in amounts_by_bucket {
        require_non_negative("aged amount", amount)?;
        if let AgeBucket::Unlisted(label) = bucket {
            tracing::debug!(bucket = %label, "age bucket has no multiplier, using 1.0");
        }
        adjusted += amount * multipliers.multiplier(bucket);
    }
    Ok(adjusted)
}

/// Provisioning tables bundled for repeated use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProvisionCalculator {
    pub rates: CategoryTable,
    pub aging: AgingMultipliers,
}

impl ProvisionCalculator {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            rates: config.provision_rates,
            aging: config.aging_multipliers,
        }
    }

    pub fn base_provisions(&self, portfolio: &[PortfolioEntry]) -> RiskResult<ProvisionResult> {
        base_provisions(portfolio, &self.rates)
    }

    pub fn adjust_for_aging(&self, amounts_by_bucket: &BTreeMap<AgeBucket, f64>) -> RiskResult<f64> {
        adjust_for_aging(amounts_by_bucket, &self.aging)
    }

    /// Aging-adjusted total of the portfolio's own age distribution.
    pub fn aged_exposure(&self, portfolio: &[PortfolioEntry]) -> RiskResult<f64> {
        self.adjust_for_aging(&age_distribution(portfolio))
    }
}

impl Default for ProvisionCalculator {
    fn default() -> Self {
        Self::from_config(&EngineConfig::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn entry(amount: f64, category: RiskCategory, bucket: &str) -> PortfolioEntry {
        PortfolioEntry::new(amount, category, AgeBucket::from(bucket))
    }

    #[test]
    fn reserves_by_category_rate() {
        let portfolio = vec![
            entry(1000.0, RiskCategory::Low, "0-30d"),
            entry(1000.0, RiskCategory::Low, "31-90d"),
            entry(2000.0, RiskCategory::Medium, "91-180d"),
            entry(1000.0, RiskCategory::High, ">360d"),
        ];
        let result = base_provisions(&portfolio, &CategoryTable::PROVISION_RATES).unwrap();

        assert_relative_eq!(result.per_category[&RiskCategory::Low], 100.0, epsilon = 1.0e-9);
        assert_relative_eq!(result.per_category[&RiskCategory::Medium], 500.0, epsilon = 1.0e-9);
        assert_relative_eq!(result.per_category[&RiskCategory::High], 750.0, epsilon = 1.0e-9);
        assert_eq!(result.per_category[&RiskCategory::MediumLow], 0.0);
        assert_relative_eq!(result.total_reserve, 1350.0, epsilon = 1.0e-9);
        assert_relative_eq!(result.coverage_ratio, 0.27, epsilon = 1.0e-12);
    }

    #[test]
    fn zero_exposure_is_an_error() {
        let portfolio = vec![entry(0.0, RiskCategory::Low, "0-30d")];
        assert!(matches!(
            base_provisions(&portfolio, &CategoryTable::PROVISION_RATES),
            Err(RiskError::ZeroExposure)
        ));
        assert!(matches!(
            base_provisions(&[], &CategoryTable::PROVISION_RATES),
            Err(RiskError::ZeroExposure)
        ));
    }

    #[test]
    fn negative_amount_is_rejected() {
        let portfolio = vec![entry(-5.0, RiskCategory::Low, "0-30d")];
        assert!(matches!(
            base_provisions(&portfolio, &CategoryTable::PROVISION_RATES),
            Err(RiskError::InvalidInput(_))
        ));
    }

    #[test]
    fn aging_applies_multipliers_and_fails_open() {
        let mut amounts = BTreeMap::new();
        amounts.insert(AgeBucket::Days0To30, 100.0);
        amounts.insert(AgeBucket::Days31To90, 100.0);
        amounts.insert(AgeBucket::Over360Days, 100.0);
        amounts.insert(AgeBucket::Unlisted("disputed".into()), 100.0);
        let adjusted = adjust_for_aging(&amounts, &AgingMultipliers::DEFAULT).unwrap();
        assert_relative_eq!(adjusted, 100.0 + 120.0 + 250.0 + 100.0, epsilon = 1.0e-9);
    }

    #[test]
    fn aged_exposure_groups_portfolio_by_bucket() {
        let portfolio = vec![
            entry(50.0, RiskCategory::Low, "181-360d"),
            entry(50.0, RiskCategory::High, "181-360 days"),
        ];
        let calc = ProvisionCalculator::default();
        assert_eq!(age_distribution(&portfolio).len(), 1);
        assert_relative_eq!(calc.aged_exposure(&portfolio).unwrap(), 200.0, epsilon = 1.0e-9);
    }
}
