//! Shared domain enums and the library-wide error type.

pub mod types;

pub use types::*;

/// Errors surfaced by fallible computations.
///
/// Gating outcomes (missing documents) and per-document validation results are not errors;
/// they are reported as values so batch callers can continue past a bad case.
#[derive(Debug, thiserror::Error)]
pub enum RiskError {
    /// Input validation error.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Coverage ratio requested against a zero exposure.
    #[error("total portfolio exposure is zero")]
    ZeroExposure,
    /// Arithmetic would leave its valid domain (division by zero, negative denominators).
    #[error("domain error: {0}")]
    Domain(String),
    /// A time series is too short for the requested look-back.
    #[error("insufficient history: need {required} observations, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },
    /// A document field holds a value of the wrong shape.
    #[error("invalid field '{field}' in {document}: {reason}")]
    InvalidField {
        document: String,
        field: String,
        reason: String,
    },
    /// Configuration table failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type RiskResult<T> = Result<T, RiskError>;

/// Rejects NaN/infinite values and negatives.
pub(crate) fn require_non_negative(name: &str, value: f64) -> RiskResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(RiskError::InvalidInput(format!(
            "{name} must be finite and >= 0, got {value}"
        )));
    }
    Ok(())
}

/// Rejects values outside the closed unit interval.
pub(crate) fn require_unit_interval(name: &str, value: f64) -> RiskResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(RiskError::InvalidInput(format!(
            "{name} must be in [0, 1], got {value}"
        )));
    }
    Ok(())
}
