//! Solver and curve configuration
//!
//! Defaults match the interactive calculator: a 10% starting guess, 1000 Newton
//! iterations, 0.0001 tolerance, and an NPV curve from -50% to +50% in 1% steps.

use crate::error::{IrrError, IrrResult, LoadError};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

pub const DEFAULT_INITIAL_GUESS: f64 = 0.10;
pub const DEFAULT_MAX_ITERATIONS: u32 = 1000;
pub const DEFAULT_TOLERANCE: f64 = 0.0001;

pub const DEFAULT_RATE_MIN: f64 = -0.5;
pub const DEFAULT_RATE_MAX: f64 = 0.5;
pub const DEFAULT_RATE_STEP: f64 = 0.01;

/// Largest number of samples a curve sweep may produce
pub const MAX_CURVE_SAMPLES: usize = 1_000_000;

fn default_initial_guess() -> f64 { DEFAULT_INITIAL_GUESS }
fn default_max_iterations() -> u32 { DEFAULT_MAX_ITERATIONS }
fn default_tolerance() -> f64 { DEFAULT_TOLERANCE }
fn default_rate_min() -> f64 { DEFAULT_RATE_MIN }
fn default_rate_max() -> f64 { DEFAULT_RATE_MAX }
fn default_rate_step() -> f64 { DEFAULT_RATE_STEP }

/// Newton-Raphson parameters for the IRR solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Starting rate for the iteration
    #[serde(default = "default_initial_guess")]
    pub initial_guess: f64,

    /// Iteration cap; hitting it returns the last estimate flagged as not converged
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Stop once successive estimates differ by less than this
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl SolverConfig {
    pub fn validate(&self) -> IrrResult<()> {
        if !self.initial_guess.is_finite() || self.initial_guess <= -1.0 {
            return Err(IrrError::InvalidConfig {
                reason: format!("initial guess must be a finite rate above -1, got {}", self.initial_guess),
            });
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(IrrError::InvalidConfig {
                reason: format!("tolerance must be a finite positive number, got {}", self.tolerance),
            });
        }
        Ok(())
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            initial_guess: DEFAULT_INITIAL_GUESS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Inclusive range of discount rates swept when drawing the NPV curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateRange {
    #[serde(default = "default_rate_min")]
    pub min: f64,
    #[serde(default = "default_rate_max")]
    pub max: f64,
    #[serde(default = "default_rate_step")]
    pub step: f64,
}

impl RateRange {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    pub fn validate(&self) -> IrrResult<()> {
        self.sample_count().map(|_| ())
    }

    fn invalid(&self) -> IrrError {
        IrrError::InvalidRateRange {
            min: self.min,
            max: self.max,
            step: self.step,
        }
    }

    /// Number of samples in the sweep, both ends included.
    ///
    /// Fails for non-finite or reversed bounds, a non-positive step, or a sweep
    /// of more than `MAX_CURVE_SAMPLES` points. The small epsilon keeps e.g.
    /// (0.5 - -0.5) / 0.01 from landing just under 100.
    pub fn sample_count(&self) -> IrrResult<usize> {
        let bounds_ok = self.min.is_finite() && self.max.is_finite() && self.min <= self.max;
        let step_ok = self.step.is_finite() && self.step > 0.0;
        if !bounds_ok || !step_ok {
            return Err(self.invalid());
        }

        let intervals = ((self.max - self.min) / self.step + 1e-9).floor();
        if !intervals.is_finite() || intervals >= MAX_CURVE_SAMPLES as f64 {
            return Err(self.invalid());
        }

        (intervals as usize).checked_add(1).ok_or_else(|| self.invalid())
    }
}

impl Default for RateRange {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_MIN, DEFAULT_RATE_MAX, DEFAULT_RATE_STEP)
    }
}

/// Full calculator configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub curve: RateRange,
}

impl CalculatorConfig {
    /// Load configuration from a JSON file; missing fields fall back to defaults
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Apply overrides from the environment
    ///
    /// Reads IRR_INITIAL_GUESS, IRR_MAX_ITERATIONS, IRR_TOLERANCE,
    /// IRR_RATE_MIN, IRR_RATE_MAX and IRR_RATE_STEP. Unset or unparsable
    /// variables leave the current value alone.
    pub fn with_env_overrides(mut self) -> Self {
        self.solver.initial_guess = env_or("IRR_INITIAL_GUESS", self.solver.initial_guess);
        self.solver.max_iterations = env_or("IRR_MAX_ITERATIONS", self.solver.max_iterations);
        self.solver.tolerance = env_or("IRR_TOLERANCE", self.solver.tolerance);
        self.curve.min = env_or("IRR_RATE_MIN", self.curve.min);
        self.curve.max = env_or("IRR_RATE_MAX", self.curve.max);
        self.curve.step = env_or("IRR_RATE_STEP", self.curve.step);
        self
    }

    pub fn validate(&self) -> IrrResult<()> {
        self.solver.validate()?;
        self.curve.validate()
    }
}

fn env_or<T: std::str::FromStr>(key: &str, current: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(current)
}
