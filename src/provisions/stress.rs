use serde::{Deserialize, Serialize};

use crate::core::{RiskError, RiskResult, require_non_negative};

/// Weight of the market downturn shock on reserves.
pub const MARKET_DOWNTURN_SENSITIVITY: f64 = 0.5;

/// Named combination of optional reserve shocks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StressScenario {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_rate_increase: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_rate_decrease: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_downturn: Option<f64>,
}

impl StressScenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_default_rate_increase(mut self, shock: f64) -> Self {
        self.default_rate_increase = Some(shock);
        self
    }

    pub fn with_recovery_rate_decrease(mut self, shock: f64) -> Self {
        self.recovery_rate_decrease = Some(shock);
        self
    }

    pub fn with_market_downturn(mut self, shock: f64) -> Self {
        self.market_downturn = Some(shock);
        self
    }

    /// Stressed reserve: the present shocks compose multiplicatively in fixed order
    /// (default rate, then recovery rate, then market downturn).
    pub fn apply(&self, reserve: f64) -> RiskResult<f64> {
        let mut stressed = reserve;
        if let Some(increase) = self.default_rate_increase {
            stressed *= 1.0 + increase;
        }
        if let Some(decrease) = self.recovery_rate_decrease {
            if decrease >= 1.0 {
                return Err(RiskError::Domain(format!(
                    "scenario '{}': recovery_rate_decrease must be < 1, got {decrease}",
                    self.name
                )));
            }
            stressed /= 1.0 - decrease;
        }
        if let Some(downturn) = self.market_downturn {
            stressed *= 1.0 + downturn * MARKET_DOWNTURN_SENSITIVITY;
        }
        if !stressed.is_finite() {
            return Err(RiskError::Domain(format!(
                "scenario '{}' produced a non-finite reserve",
                self.name
            )));
        }
        Ok(stressed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressOutcome {
    pub name: String,
    pub required_reserve: f64,
    /// `max(0, required_reserve - current_reserve)`.
    pub shortfall: f64,
    pub coverage_ratio: f64,
}

/// Runs each scenario against the current reserve, in input order.
pub fn stress_test(
    current_reserve: f64,
    portfolio_total: f64,
    scenarios: &[StressScenario],
) -> RiskResult<Vec<StressOutcome>> {
    require_non_negative("current reserve", current_reserve)?;
    require_non_negative("portfolio total", portfolio_total)?;
    if portfolio_total == 0.0 {
        return Err(RiskError::ZeroExposure);
    }

    scenarios
        .iter()
        .map(|scenario| {
            let required_reserve = scenario.apply(current_reserve)?;
            let shortfall = (required_reserve - current_reserve).max(0.0);
            if shortfall > 0.0 {
                tracing::debug!(scenario = %scenario.name, shortfall, "stress scenario shortfall");
            }
            Ok(StressOutcome {
                name: scenario.name.clone(),
                required_reserve,
                shortfall,
                coverage_ratio: required_reserve / portfolio_total,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn shocks_compose_multiplicatively_in_order() {
        let scenario = StressScenario::new("adverse")
            .with_default_rate_increase(0.1)
            .with_recovery_rate_decrease(0.2);
        assert_relative_eq!(scenario.apply(1000.0).unwrap(), 1375.0, epsilon = 1.0e-9);

        let all = scenario.clone().with_market_downturn(0.4);
        assert_relative_eq!(all.apply(1000.0).unwrap(), 1375.0 * 1.2, epsilon = 1.0e-9);
    }

    #[test]
    fn absent_shocks_leave_reserve_unchanged() {
        let baseline = StressScenario::new("baseline");
        assert_eq!(baseline.apply(500.0).unwrap(), 500.0);
    }

    #[test]
    fn reports_shortfall_and_coverage() {
        let scenarios = vec![
            StressScenario::new("mild").with_default_rate_increase(0.1),
            StressScenario::new("relief").with_default_rate_increase(-0.2),
        ];
        let out = stress_test(1000.0, 10_000.0, &scenarios).unwrap();
        assert_eq!(out[0].name, "mild");
        assert_relative_eq!(out[0].shortfall, 100.0, epsilon = 1.0e-9);
        assert_relative_eq!(out[0].coverage_ratio, 0.11, epsilon = 1.0e-12);
        assert_eq!(out[1].shortfall, 0.0);
    }

    #[test]
    fn full_recovery_loss_is_a_domain_error() {
        let scenarios = vec![StressScenario::new("wipeout").with_recovery_rate_decrease(1.0)];
        assert!(matches!(
            stress_test(1000.0, 10_000.0, &scenarios),
            Err(RiskError::Domain(_))
        ));
    }

    #[test]
    fn zero_portfolio_total_is_rejected() {
        assert!(matches!(
            stress_test(1000.0, 0.0, &[StressScenario::new("any")]),
            Err(RiskError::ZeroExposure)
        ));
    }

    #[test]
    fn scenario_json_omits_absent_shocks() {
        let json = r#"{"name": "rates", "market_downturn": 0.3}"#;
        let scenario: StressScenario = serde_json::from_str(json).unwrap();
        assert_eq!(scenario.default_rate_increase, None);
        assert_eq!(scenario.market_downturn, Some(0.3));
    }
}
