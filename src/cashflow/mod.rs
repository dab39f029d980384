//! Cash-flow series and input loading

mod series;
pub mod loader;

pub use series::{has_sign_change, validate_flows, CashFlowKind, CashFlowSeries, TimelineEntry};
pub use loader::{load_series, load_series_from_reader, CashFlowInput, DEFAULT_CASH_FLOWS, DEFAULT_INITIAL_INVESTMENT};
