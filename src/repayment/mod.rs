//! Repayment analytics over a debtor's payment records.
//!
//! Covers monthly aggregation for the forecasting collaborator, NPV of forecast payments,
//! payment regularity, monthly seasonality, and the resulting collection strategy.

use std::collections::BTreeMap;

use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::{RiskError, RiskResult};
use crate::math;
use crate::models::{Forecast, PaymentForecaster};

const MIN_REGULARITY: f64 = 0.3;
const SEASONAL_STRENGTH_LIMIT: f64 = 1.5;
const RESTRUCTURING_RISK_SCORE: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub date: NaiveDate,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

/// Total paid per calendar month from the first to the last payment, gaps filled with zero.
pub fn monthly_series(payments: &[PaymentRecord]) -> Vec<(YearMonth, f64)> {
    let mut totals: BTreeMap<YearMonth, f64> = BTreeMap::new();
    for p in payments {
        *totals.entry(YearMonth::of(p.date)).or_insert(0.0) += p.amount;
    }
    let (Some(&first), Some(&last)) = (totals.keys().next(), totals.keys().next_back()) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut cursor = first;
    while cursor <= last {
        out.push((cursor, totals.get(&cursor).copied().unwrap_or(0.0)));
        cursor = cursor.next();
    }
    out
}

/// Fits the forecaster on the monthly series and forecasts `periods` months ahead.
pub fn forecast_payments<F: PaymentForecaster + ?Sized>(
    forecaster: &mut F,
    payments: &[PaymentRecord],
    periods: usize,
) -> RiskResult<Forecast> {
    let series: Vec<f64> = monthly_series(payments).into_iter().map(|(_, v)| v).collect();
    if series.is_empty() {
        return Err(RiskError::InvalidInput(
            "no payments to forecast from".to_string(),
        ));
    }
    forecaster.fit(&series)?;
    let forecast = forecaster.forecast(periods)?;
    if forecast.periods() != periods {
        return Err(RiskError::InvalidInput(format!(
            "forecaster returned {} periods, expected {periods}",
            forecast.periods()
        )));
    }
    Ok(forecast)
}

/// `sum(p_t / (1 + r)^t)` for `t = 1..=n`.
pub fn npv(payments: &[f64], discount_rate: f64) -> RiskResult<f64> {
    if !discount_rate.is_finite() || discount_rate <= -1.0 {
        return Err(RiskError::Domain(format!(
            "discount rate must be > -1, got {discount_rate}"
        )));
    }
    let growth = 1.0 + discount_rate;
    Ok(payments
        .iter()
        .enumerate()
        .map(|(i, p)| p / growth.powi(i as i32 + 1))
        .sum())
}

/// `1 - std(intervals) / mean(intervals)` over day gaps between sorted payment dates.
///
/// Fewer than three dates give `0.0`.
pub fn payment_regularity(dates: &[NaiveDate]) -> RiskResult<f64> {
    if dates.len() < 3 {
        return Ok(0.0);
    }
    let mut sorted = dates.to_vec();
    sorted.sort();
    let intervals: Vec<f64> = sorted
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days() as f64)
        .collect();

    let mean = math::mean(&intervals).unwrap_or(0.0);
    if mean == 0.0 {
        return Err(RiskError::Domain(
            "all payments share one date".to_string(),
        ));
    }
    let std = math::sample_std(&intervals).unwrap_or(0.0);
    Ok(1.0 - std / mean)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Seasonality {
    /// Calendar month (1-12) with the highest mean payment.
    pub peak_month: u32,
    /// Peak monthly mean over the mean of monthly means.
    pub relative_strength: f64,
}

pub fn seasonality(payments: &[PaymentRecord]) -> Option<Seasonality> {
    let mut by_month: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for p in payments {
        by_month.entry(p.date.month()).or_default().push(p.amount);
    }
    let monthly: Vec<(u32, f64)> = by_month
        .into_iter()
        .filter_map(|(m, v)| math::mean(&v).map(|avg| (m, avg)))
        .collect();

    let (peak_month, peak) = monthly
        .iter()
        .copied()
        .fold(None, |best: Option<(u32, f64)>, (m, v)| match best {
            Some((_, bv)) if bv >= v => best,
            _ => Some((m, v)),
        })?;
    let overall = monthly.iter().map(|(_, v)| v).sum::<f64>() / monthly.len() as f64;
    if overall == 0.0 {
        return None;
    }
    Some(Seasonality {
        peak_month,
        relative_strength: peak / overall,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentAnalysis {
    pub mean_payment: f64,
    pub median_payment: f64,
    pub regularity: f64,
    pub seasonality: Option<Seasonality>,
}

pub fn analyze_payments(payments: &[PaymentRecord]) -> RiskResult<PaymentAnalysis> {
    if payments.is_empty() {
        return Err(RiskError::InvalidInput(
            "no payments to analyze".to_string(),
        ));
    }
    let amounts: Vec<f64> = payments.iter().map(|p| p.amount).collect();
    let dates: Vec<NaiveDate> = payments.iter().map(|p| p.date).collect();
    Ok(PaymentAnalysis {
        mean_payment: math::mean(&amounts).unwrap_or(0.0),
        median_payment: math::median(&amounts).unwrap_or(0.0),
        regularity: payment_regularity(&dates)?,
        seasonality: seasonality(payments),
    })
}

/// Collection actions for a debtor given their payment behaviour and risk score.
pub fn repayment_strategy(analysis: &PaymentAnalysis, risk_score: f64) -> Vec<String> {
    let mut strategy = Vec::new();
    if analysis.regularity < MIN_REGULARITY {
        strategy.push("Introduce a payment reminder system".to_string());
    }
    if let Some(season) = analysis.seasonality {
        if season.relative_strength > SEASONAL_STRENGTH_LIMIT {
            let month = u8::try_from(season.peak_month)
                .ok()
                .and_then(|m| Month::try_from(m).ok())
                .map_or_else(|| season.peak_month.to_string(), |m| m.name().to_string());
            strategy.push(format!("Intensify collection activity in {month}"));
        }
    }
    if risk_score > RESTRUCTURING_RISK_SCORE {
        strategy.push("Consider debt restructuring".to_string());
    }
    strategy
}
