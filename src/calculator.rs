//! Calculator front end for IRR and NPV curve requests
//!
//! Holds one configuration and applies it to every request. Nothing is cached
//! between calls; each computation starts from the inputs it is given.

use crate::cashflow::{CashFlowSeries, TimelineEntry};
use crate::config::{CalculatorConfig, RateRange, SolverConfig};
use crate::error::{IrrResult, LoadError};
use crate::valuation::{calculate_irr, npv_and_derivative, npv_curve, CurvePoint, IrrSolution};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Reusable calculator configured once, run many times
///
/// # Example
/// ```
/// use irr_calculator::IrrCalculator;
///
/// let calc = IrrCalculator::new();
/// let irr = calc.compute_irr(-100_000.0, &[60_000.0, 60_000.0]).unwrap();
/// assert!(irr.rate > 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct IrrCalculator {
    config: CalculatorConfig,
}

impl IrrCalculator {
    /// Create calculator with default solver and curve settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create calculator with a specific configuration
    pub fn with_config(config: CalculatorConfig) -> IrrResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create calculator from defaults plus IRR_* environment overrides
    pub fn from_env() -> IrrResult<Self> {
        Self::with_config(CalculatorConfig::default().with_env_overrides())
    }

    /// Create calculator from a JSON configuration file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        Ok(Self::with_config(CalculatorConfig::from_json_path(path)?)?)
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn solver(&self) -> &SolverConfig {
        &self.config.solver
    }

    pub fn rate_range(&self) -> &RateRange {
        &self.config.curve
    }

    /// IRR of `initial_investment` followed by `cash_flows`
    pub fn compute_irr(&self, initial_investment: f64, cash_flows: &[f64]) -> IrrResult<IrrSolution> {
        let series = CashFlowSeries::with_initial(initial_investment, cash_flows)?;
        self.solve(&series)
    }

    /// IRR of an already-assembled series
    pub fn solve(&self, series: &CashFlowSeries) -> IrrResult<IrrSolution> {
        calculate_irr(series.as_slice(), &self.config.solver)
    }

    /// NPV curve over the configured rate range
    pub fn compute_npv_curve(&self, initial_investment: f64, cash_flows: &[f64]) -> IrrResult<Vec<CurvePoint>> {
        let series = CashFlowSeries::with_initial(initial_investment, cash_flows)?;
        npv_curve(series.as_slice(), &self.config.curve)
    }

    /// NPV and its rate derivative for raw flows
    pub fn evaluate_npv(&self, rate: f64, flows: &[f64]) -> (f64, f64) {
        npv_and_derivative(flows, rate)
    }

    /// IRR, curve and timeline for one series
    ///
    /// A failed IRR is recorded in the report; only an unusable rate range fails the call.
    pub fn analyze(&self, series: &CashFlowSeries) -> IrrResult<IrrReport> {
        let curve = npv_curve(series.as_slice(), &self.config.curve)?;
        let (irr, error) = match self.solve(series) {
            Ok(solution) => (Some(solution), None),
            Err(e) => (None, Some(e.to_string())),
        };

        Ok(IrrReport {
            cash_flows: series.as_slice().to_vec(),
            irr,
            error,
            curve,
            timeline: series.timeline(),
        })
    }
}

/// Everything the presentation layer needs for one set of inputs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrrReport {
    pub cash_flows: Vec<f64>,
    pub irr: Option<IrrSolution>,
    /// User-facing reason when `irr` is absent
    pub error: Option<String>,
    pub curve: Vec<CurvePoint>,
    pub timeline: Vec<TimelineEntry>,
}

/// IRR with default settings (10% guess, 1000 iterations, 0.0001 tolerance)
pub fn compute_irr(initial_investment: f64, cash_flows: &[f64]) -> IrrResult<IrrSolution> {
    IrrCalculator::new().compute_irr(initial_investment, cash_flows)
}

/// NPV sampled from `rate_min` to `rate_max` inclusive in `rate_step` increments
pub fn compute_npv_curve(
    initial_investment: f64,
    cash_flows: &[f64],
    rate_min: f64,
    rate_max: f64,
    rate_step: f64,
) -> IrrResult<Vec<CurvePoint>> {
    let series = CashFlowSeries::with_initial(initial_investment, cash_flows)?;
    npv_curve(series.as_slice(), &RateRange::new(rate_min, rate_max, rate_step))
}

/// NPV and dNPV/drate at `rate`; returns non-finite values rather than failing
pub fn evaluate_npv(rate: f64, flows: &[f64]) -> (f64, f64) {
    npv_and_derivative(flows, rate)
}
