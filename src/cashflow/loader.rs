//! Load cash flows from CSV or JSON files

use super::CashFlowSeries;
use crate::error::LoadError;
use csv::Reader;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Initial investment used when none is supplied
pub const DEFAULT_INITIAL_INVESTMENT: f64 = -100_000.0;

/// Yearly flows used when none are supplied
pub const DEFAULT_CASH_FLOWS: [f64; 5] = [25_000.0, 30_000.0, 35_000.0, 40_000.0, 45_000.0];

/// Raw CSV row: one period per line
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Period")]
    period: u32,
    #[serde(rename = "CashFlow")]
    cash_flow: f64,
}

/// JSON input: the initial outlay kept apart from the yearly flows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowInput {
    #[serde(default = "default_initial_investment")]
    pub initial_investment: f64,

    #[serde(default = "default_cash_flows")]
    pub cash_flows: Vec<f64>,
}

fn default_initial_investment() -> f64 { DEFAULT_INITIAL_INVESTMENT }
fn default_cash_flows() -> Vec<f64> { DEFAULT_CASH_FLOWS.to_vec() }

impl CashFlowInput {
    pub fn into_series(self) -> Result<CashFlowSeries, LoadError> {
        Ok(CashFlowSeries::with_initial(self.initial_investment, &self.cash_flows)?)
    }
}

impl Default for CashFlowInput {
    fn default() -> Self {
        Self {
            initial_investment: DEFAULT_INITIAL_INVESTMENT,
            cash_flows: DEFAULT_CASH_FLOWS.to_vec(),
        }
    }
}

fn rows_to_series(mut rows: Vec<CsvRow>) -> Result<CashFlowSeries, LoadError> {
    rows.sort_by_key(|row| row.period);

    for (expected, row) in rows.iter().enumerate() {
        if row.period as usize != expected {
            return Err(LoadError::Parse(format!(
                "periods must run 0, 1, 2, ... without gaps; expected period {} but found {}",
                expected, row.period
            )));
        }
    }

    let flows = rows.into_iter().map(|row| row.cash_flow).collect();
    Ok(CashFlowSeries::new(flows)?)
}

/// Load a series from CSV with a `Period,CashFlow` header
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<CashFlowSeries, LoadError> {
    let mut reader = Reader::from_path(path)?;
    let mut rows = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        rows.push(row);
    }

    rows_to_series(rows)
}

/// Load a series from any CSV reader (e.g., string buffer, stdin)
pub fn load_series_from_reader<R: std::io::Read>(reader: R) -> Result<CashFlowSeries, LoadError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut rows = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        rows.push(row);
    }

    rows_to_series(rows)
}

/// Load a series from a JSON file shaped like `CashFlowInput`
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<CashFlowSeries, LoadError> {
    let contents = fs::read_to_string(path)?;
    let input: CashFlowInput = serde_json::from_str(&contents)?;
    input.into_series()
}

/// Load a series, picking the format from the file extension (`.json`, anything else is CSV)
pub fn load_series<P: AsRef<Path>>(path: P) -> Result<CashFlowSeries, LoadError> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    log::debug!("loading cash flows from {} ({})", path.display(), if is_json { "json" } else { "csv" });

    if is_json {
        load_json(path)
    } else {
        load_csv(path)
    }
}
