//! Error types for IRR and NPV calculations

use thiserror::Error;

/// A specialized Result type for valuation operations.
pub type IrrResult<T> = Result<T, IrrError>;

/// Failures raised while validating inputs or solving for the IRR.
///
/// The `Display` text of each variant is meant to be shown to users as-is.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IrrError {
    /// No cash flows were supplied at all.
    #[error("cash-flow series is empty")]
    EmptySeries,

    /// A cash flow is NaN or infinite.
    #[error("cash flow for period {period} is not a finite number ({value})")]
    NonFiniteCashFlow {
        /// Period index of the offending flow.
        period: usize,
        /// The value that was rejected.
        value: f64,
    },

    /// Every flow has the same sign, so there is no rate at which NPV is zero.
    #[error("cash flows never change sign, so no internal rate of return exists")]
    NoSignChange,

    /// The NPV derivative is zero or non-finite and the Newton step is undefined.
    #[error("NPV derivative is {derivative} at rate {rate}; cannot take a Newton step")]
    DegenerateDerivative {
        /// Rate at which the derivative was evaluated.
        rate: f64,
        /// The derivative value.
        derivative: f64,
    },

    /// The iteration reached a rate at or below -100%, or NPV stopped being finite.
    #[error("iteration diverged: rate {rate} makes the discount factor undefined")]
    DivergedOrInvalidRate {
        /// The rate the iteration reached.
        rate: f64,
    },

    /// Solver parameters are unusable.
    #[error("invalid solver configuration: {reason}")]
    InvalidConfig {
        /// What was wrong with the configuration.
        reason: String,
    },

    /// Curve sweep bounds or step are unusable.
    #[error("invalid rate range [{min}, {max}] with step {step}")]
    InvalidRateRange {
        /// Lower bound of the sweep.
        min: f64,
        /// Upper bound of the sweep.
        max: f64,
        /// Step between samples.
        step: f64,
    },
}

/// Errors raised while reading cash flows or configuration from disk.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV, or a row that does not match `Period,CashFlow`.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON, or a document with the wrong shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Well-formed input that still cannot be turned into a series,
    /// e.g. missing or duplicated periods.
    #[error("{0}")]
    Parse(String),

    /// The flows were read but failed series validation.
    #[error("invalid cash flows: {0}")]
    Series(#[from] IrrError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_readable() {
        assert_eq!(
            IrrError::NoSignChange.to_string(),
            "cash flows never change sign, so no internal rate of return exists"
        );

        let err = IrrError::DivergedOrInvalidRate { rate: -1.0 };
        assert!(err.to_string().contains("-1"));
        assert!(!err.to_string().contains("NaN"));
    }

    #[test]
    fn test_load_error_wraps_series_error() {
        let err: LoadError = IrrError::EmptySeries.into();
        assert!(matches!(err, LoadError::Series(IrrError::EmptySeries)));
        assert_eq!(err.to_string(), "invalid cash flows: cash-flow series is empty");
    }

    #[test]
    fn test_load_error_sources() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "flows.csv");
        let err: LoadError = io.into();
        assert!(matches!(err, LoadError::Io(_)));
        assert!(err.to_string().starts_with("I/O error"));

        let err: LoadError = serde_json::from_str::<Vec<f64>>("[1,").unwrap_err().into();
        assert!(err.to_string().starts_with("JSON error"));
    }
}
