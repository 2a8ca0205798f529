//! Monte Carlo outcome distribution for a single debt.
//!
//! Each scenario draws `N(base, (0.2 * base)^2)` and is then zeroed independently with
//! probability `1 - recovery_probability`. The randomness source is always injected; use
//! [`simulate_seeded`] for reproducible production runs.
//!
//! `var_95` and `var_99` are the 5th and 1st percentiles of the simulated *values*. They are
//! low-side figures (a lower percentile is a larger loss) and are used downstream as the
//! conservative price anchor.

use rand::Rng;
use rand::SeedableRng;
use rand::distr::{Bernoulli, Distribution};
use rand::rngs::StdRng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::core::{RiskError, RiskResult, require_non_negative, require_unit_interval};
use crate::math;

/// Standard deviation of simulated value as a share of base value.
pub const VALUE_VOLATILITY: f64 = 0.2;
pub const DEFAULT_SCENARIOS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    /// Sample mean.
    pub expected_value: f64,
    /// 5th percentile of simulated values.
    pub var_95: f64,
    /// 1st percentile of simulated values.
    pub var_99: f64,
    /// Sample minimum.
    pub max_loss: f64,
    /// Sample maximum.
    pub max_gain: f64,
}

impl ValuationResult {
    /// Statistics of an already simulated sample.
    pub fn from_samples(samples: &[f64]) -> RiskResult<Self> {
        if samples.is_empty() {
            return Err(RiskError::InvalidInput(
                "at least one scenario is required".to_string(),
            ));
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        Ok(Self {
            expected_value: math::mean(samples).unwrap_or(0.0),
            var_95: math::sorted_quantile(&sorted, 0.05),
            var_99: math::sorted_quantile(&sorted, 0.01),
            max_loss: sorted[0],
            max_gain: sorted[sorted.len() - 1],
        })
    }
}

/// Draws `n_scenarios` gated normal outcomes from `rng`.
pub fn simulate_samples<R: Rng + ?Sized>(
    base_value: f64,
    recovery_probability: f64,
    n_scenarios: usize,
    rng: &mut R,
) -> RiskResult<Vec<f64>> {
    require_non_negative("base value", base_value)?;
    require_unit_interval("recovery probability", recovery_probability)?;
    if n_scenarios == 0 {
        return Err(RiskError::InvalidInput(
            "n_scenarios must be > 0".to_string(),
        ));
    }

    let value = Normal::new(base_value, base_value * VALUE_VOLATILITY)
        .map_err(|e| RiskError::Domain(format!("value distribution: {e}")))?;
    let recovered = Bernoulli::new(recovery_probability)
        .map_err(|e| RiskError::Domain(format!("recovery gate: {e}")))?;

    Ok((0..n_scenarios)
        .map(|_| {
            let x: f64 = value.sample(&mut *rng);
            if recovered.sample(&mut *rng) { x } else { 0.0 }
        })
        .collect())
}

pub fn simulate<R: Rng + ?Sized>(
    base_value: f64,
    recovery_probability: f64,
    n_scenarios: usize,
    rng: &mut R,
) -> RiskResult<ValuationResult> {
    tracing::debug!(base_value, recovery_probability, n_scenarios, "simulating debt value");
    let samples = simulate_samples(base_value, recovery_probability, n_scenarios, rng)?;
    ValuationResult::from_samples(&samples)
}

/// [`simulate`] with a `StdRng` seeded from `seed`.
pub fn simulate_seeded(
    base_value: f64,
    recovery_probability: f64,
    n_scenarios: usize,
    seed: u64,
) -> RiskResult<ValuationResult> {
    let mut rng = StdRng::seed_from_u64(seed);
    simulate(base_value, recovery_probability, n_scenarios, &mut rng)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn same_seed_reproduces_result() {
        let a = simulate_seeded(3000.0, 0.7, 2000, 42).unwrap();
        let b = simulate_seeded(3000.0, 0.7, 2000, 42).unwrap();
        assert_eq!(a, b);
        let c = simulate_seeded(3000.0, 0.7, 2000, 43).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn mean_converges_to_base_times_recovery() {
        let base = 3000.0;
        let p = 0.65;
        let result = simulate_seeded(base, p, 200_000, 7).unwrap();
        assert_relative_eq!(result.expected_value, base * p, max_relative = 0.01);
    }

    #[test]
    fn certain_recovery_is_a_plain_normal() {
        let result = simulate_seeded(1000.0, 1.0, 100_000, 11).unwrap();
        assert_relative_eq!(result.expected_value, 1000.0, max_relative = 0.005);
        // 5th percentile of N(1000, 200^2) is 1000 - 1.6449 * 200
        assert_relative_eq!(result.var_95, 671.0, max_relative = 0.01);
        assert!(result.var_99 < result.var_95);
        assert!(result.max_loss <= result.var_99);
        assert!(result.max_gain >= result.expected_value);
    }

    #[test]
    fn zero_recovery_zeroes_every_scenario() {
        let result = simulate_seeded(1000.0, 0.0, 500, 3).unwrap();
        assert_eq!(result.expected_value, 0.0);
        assert_eq!(result.max_gain, 0.0);
        assert_eq!(result.max_loss, 0.0);
    }

    #[test]
    fn gate_is_applied_per_sample() {
        let mut rng = StdRng::seed_from_u64(5);
        let samples = simulate_samples(1000.0, 0.5, 1000, &mut rng).unwrap();
        let zeros = samples.iter().filter(|&&x| x == 0.0).count();
        assert!(zeros > 400 && zeros < 600, "zeros = {zeros}");
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert!(simulate_seeded(1000.0, 1.2, 10, 1).is_err());
        assert!(simulate_seeded(-1.0, 0.5, 10, 1).is_err());
        assert!(simulate_seeded(1000.0, 0.5, 0, 1).is_err());
    }

    #[test]
    fn statistics_of_known_sample() {
        let samples: Vec<f64> = (0..=100).map(f64::from).collect();
        let result = ValuationResult::from_samples(&samples).unwrap();
        assert_relative_eq!(result.expected_value, 50.0, epsilon = 1.0e-12);
        assert_relative_eq!(result.var_95, 5.0, epsilon = 1.0e-12);
        assert_relative_eq!(result.var_99, 1.0, epsilon = 1.0e-12);
        assert_eq!(result.max_loss, 0.0);
        assert_eq!(result.max_gain, 100.0);
    }
}
