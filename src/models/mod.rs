//! Seams for external predictive collaborators.
//!
//! The engines only consume model outputs (a probability or score per row, a forecast
//! series); how those models are trained is outside this crate.

use serde::{Deserialize, Serialize};

use crate::core::{RiskError, RiskResult};

/// Maps feature rows to one value per row.
///
/// Most callers consume probabilities, but the trait places no range on the output: the
/// expected-loss summary feeds it a loss regressor that predicts money amounts. Callers that
/// need probabilities check the unit interval themselves.
pub trait ProbabilityModel {
    fn predict(&self, features: &[Vec<f64>]) -> RiskResult<Vec<f64>>;
}

/// A [`ProbabilityModel`] that can be (re)fitted on labelled rows.
pub trait TrainableModel: ProbabilityModel {
    fn fit(&mut self, features: &[Vec<f64>], labels: &[f64]) -> RiskResult<()>;
}

/// Point forecast with a confidence band, one entry per future period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub values: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl Forecast {
    pub fn new(values: Vec<f64>, lower: Vec<f64>, upper: Vec<f64>) -> RiskResult<Self> {
        if values.len() != lower.len() || values.len() != upper.len() {
            return Err(RiskError::InvalidInput(format!(
                "forecast bands have lengths {}/{}/{}",
                values.len(),
                lower.len(),
                upper.len()
            )));
        }
        Ok(Self {
            values,
            lower,
            upper,
        })
    }

    pub fn periods(&self) -> usize {
        self.values.len()
    }
}

/// Time-series forecaster for future payment amounts.
pub trait PaymentForecaster {
    fn fit(&mut self, series: &[f64]) -> RiskResult<()>;
    fn forecast(&self, periods: usize) -> RiskResult<Forecast>;
}

/// Model that returns one fixed probability for every row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedProbability(pub f64);

impl ProbabilityModel for FixedProbability {
    fn predict(&self, features: &[Vec<f64>]) -> RiskResult<Vec<f64>> {
        Ok(vec![self.0; features.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_rejects_ragged_bands() {
        assert!(Forecast::new(vec![1.0, 2.0], vec![0.5], vec![1.5, 2.5]).is_err());
        let f = Forecast::new(vec![1.0], vec![0.5], vec![1.5]).unwrap();
        assert_eq!(f.periods(), 1);
    }

    /// Predicts the observed default rate for every row.
    #[derive(Default)]
    struct BaseRate(Option<f64>);

    impl ProbabilityModel for BaseRate {
        fn predict(&self, features: &[Vec<f64>]) -> RiskResult<Vec<f64>> {
            let rate = self
                .0
                .ok_or_else(|| RiskError::InvalidInput("model is not fitted".to_string()))?;
            Ok(vec![rate; features.len()])
        }
    }

    impl TrainableModel for BaseRate {
        fn fit(&mut self, _features: &[Vec<f64>], labels: &[f64]) -> RiskResult<()> {
            self.0 = crate::math::mean(labels);
            Ok(())
        }
    }

    #[test]
    fn trainable_model_predicts_after_fit() {
        let rows = vec![vec![0.0]; 4];
        let mut model = BaseRate::default();
        assert!(model.predict(&rows).is_err());

        model.fit(&rows, &[1.0, 0.0, 0.0, 1.0]).unwrap();
        assert_eq!(model.predict(&rows).unwrap(), vec![0.5; 4]);
    }

    #[test]
    fn fixed_probability_predicts_one_value_per_row() {
        let rows = vec![vec![1.0], vec![2.0], vec![3.0]];
        assert_eq!(FixedProbability(0.4).predict(&rows).unwrap(), vec![0.4; 3]);
    }
}
