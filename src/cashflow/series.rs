//! Ordered cash-flow series, indexed by period

use crate::error::{IrrError, IrrResult};
use serde::{Deserialize, Serialize};

/// Cash flows where index = period number and period 0 is the initial outlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct CashFlowSeries {
    flows: Vec<f64>,
}

impl CashFlowSeries {
    /// Build a series from raw flows. Rejects empty input and NaN/infinite values.
    pub fn new(flows: Vec<f64>) -> IrrResult<Self> {
        validate_flows(&flows)?;
        Ok(Self { flows })
    }

    /// Prepend the initial investment to the subsequent periodic flows
    pub fn with_initial(initial_investment: f64, cash_flows: &[f64]) -> IrrResult<Self> {
        let mut flows = Vec::with_capacity(cash_flows.len() + 1);
        flows.push(initial_investment);
        flows.extend_from_slice(cash_flows);
        Self::new(flows)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.flows
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    /// Never true for a series built through `new`
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Number of periods after the initial outlay
    pub fn periods(&self) -> usize {
        self.flows.len() - 1
    }

    pub fn initial_investment(&self) -> f64 {
        self.flows[0]
    }

    /// True when the series has at least one strictly positive and one strictly negative flow
    pub fn has_sign_change(&self) -> bool {
        has_sign_change(&self.flows)
    }

    /// Per-period view used for the cash-flow bar chart
    pub fn timeline(&self) -> Vec<TimelineEntry> {
        self.flows
            .iter()
            .enumerate()
            .map(|(period, &amount)| TimelineEntry {
                period: period as u32,
                amount,
                kind: CashFlowKind::classify(period, amount),
            })
            .collect()
    }
}

impl TryFrom<Vec<f64>> for CashFlowSeries {
    type Error = IrrError;

    fn try_from(flows: Vec<f64>) -> IrrResult<Self> {
        Self::new(flows)
    }
}

impl From<CashFlowSeries> for Vec<f64> {
    fn from(series: CashFlowSeries) -> Self {
        series.flows
    }
}

impl AsRef<[f64]> for CashFlowSeries {
    fn as_ref(&self) -> &[f64] {
        &self.flows
    }
}

/// Check that raw flows are non-empty and all finite
pub fn validate_flows(flows: &[f64]) -> IrrResult<()> {
    if flows.is_empty() {
        return Err(IrrError::EmptySeries);
    }
    if let Some((period, &value)) = flows.iter().enumerate().find(|(_, cf)| !cf.is_finite()) {
        return Err(IrrError::NonFiniteCashFlow { period, value });
    }
    Ok(())
}

/// Sign-change test on raw flows; zeros count as neither sign
pub fn has_sign_change(flows: &[f64]) -> bool {
    let has_positive = flows.iter().any(|&cf| cf > 0.0);
    let has_negative = flows.iter().any(|&cf| cf < 0.0);
    has_positive && has_negative
}

/// How a period's flow is labelled on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CashFlowKind {
    InitialInvestment,
    Inflow,
    Outflow,
}

impl CashFlowKind {
    fn classify(period: usize, amount: f64) -> Self {
        if period == 0 {
            CashFlowKind::InitialInvestment
        } else if amount < 0.0 {
            CashFlowKind::Outflow
        } else {
            CashFlowKind::Inflow
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CashFlowKind::InitialInvestment => "Initial Investment",
            CashFlowKind::Inflow => "Cash Inflow",
            CashFlowKind::Outflow => "Cash Outflow",
        }
    }
}

/// One bar of the cash-flow timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub period: u32,
    pub amount: f64,
    pub kind: CashFlowKind,
}
