//! NPV-vs-discount-rate curve for plotting

use super::npv::npv_at_rate;
use crate::config::RateRange;
use crate::error::IrrResult;
use serde::{Deserialize, Serialize};

/// One sample of the NPV curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub rate: f64,
    pub npv: f64,
}

impl CurvePoint {
    /// Rate as a percentage with one decimal, e.g. "-12.0"
    pub fn rate_label(&self) -> String {
        format!("{:.1}", self.rate * 100.0)
    }

    /// NPV rounded to whole currency units
    pub fn npv_label(&self) -> String {
        format!("{:.0}", self.npv)
    }
}

/// Evaluate NPV at every rate of `range`, both ends included
///
/// Rates are `min + i * step` rather than a running sum so the last sample
/// lands on `max` instead of drifting past it.
pub fn npv_curve(cashflows: &[f64], range: &RateRange) -> IrrResult<Vec<CurvePoint>> {
    let count = range.sample_count()?;
    log::debug!("sweeping {} rates from {} to {}", count, range.min, range.max);

    let points = (0..count)
        .map(|i| {
            let rate = range.min + i as f64 * range.step;
            CurvePoint { rate, npv: npv_at_rate(cashflows, rate) }
        })
        .collect();

    Ok(points)
}

/// Rates where the curve reaches zero
///
/// Each entry is either a sample whose NPV is exactly zero or the left-hand
/// sample of an adjacent pair with strictly opposite signs. A run of zero
/// samples is reported once, at its first rate. Non-finite NPVs never count.
pub fn zero_crossings(points: &[CurvePoint]) -> Vec<f64> {
    let mut crossings = Vec::new();

    for (i, point) in points.iter().enumerate() {
        if point.npv == 0.0 {
            let run_start = i == 0 || points[i - 1].npv != 0.0;
            if run_start {
                crossings.push(point.rate);
            }
            continue;
        }

        if let Some(next) = points.get(i + 1) {
            let (a, b) = (point.npv, next.npv);
            if (a < 0.0 && b > 0.0) || (a > 0.0 && b < 0.0) {
                crossings.push(point.rate);
            }
        }
    }

    crossings
}
