//! IRR Calculator - Internal Rate of Return and NPV analysis for periodic cash flows
//!
//! This library provides:
//! - Net present value and its rate derivative for a cash-flow series
//! - Newton-Raphson IRR solving with typed failures instead of NaN rates
//! - NPV-vs-discount-rate curves and cash-flow timelines for charting
//! - Cash-flow loading from CSV/JSON and calculator configuration

pub mod error;
pub mod config;
pub mod cashflow;
pub mod valuation;
pub mod calculator;

// Re-export commonly used types
pub use error::{IrrError, IrrResult, LoadError};
pub use config::{CalculatorConfig, RateRange, SolverConfig};
pub use cashflow::{CashFlowKind, CashFlowSeries, TimelineEntry};
pub use valuation::{Convergence, CurvePoint, IrrSolution};
pub use calculator::{compute_irr, compute_npv_curve, evaluate_npv, IrrCalculator, IrrReport};
