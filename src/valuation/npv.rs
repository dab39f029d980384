//! Net present value of a cash-flow series and its rate sensitivity
//!
//! Flow `t` is discounted by `(1 + rate)^t`. At `rate == -1` the discount
//! factor for every `t >= 1` is zero, so the results come back infinite or
//! NaN; nothing here panics or errors, and callers check `is_finite()`.

/// Present value of flow `t` and that value's rate sensitivity
///
/// `d/dr [cf / (1+r)^t] = -t * pv / (1+r)`. Period 0 is skipped in the
/// derivative since its term is identically zero.
fn discounted_term(t: usize, cf: f64, growth: f64) -> (f64, f64) {
    let pv = cf / growth.powi(t as i32);
    let dpv = if t == 0 { 0.0 } else { -(t as f64) * pv / growth };
    (pv, dpv)
}

/// NPV of `cashflows` at `rate` together with `dNPV/drate`
pub fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let growth = 1.0 + rate;
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| discounted_term(t, cf, growth))
        .fold((0.0, 0.0), |(npv, dnpv), (pv, dpv)| (npv + pv, dnpv + dpv))
}

/// NPV alone; same arithmetic as `npv_and_derivative`
pub fn npv_at_rate(cashflows: &[f64], rate: f64) -> f64 {
    npv_and_derivative(cashflows, rate).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_zero_rate_is_plain_sum() {
        let flows = [-100.0, 30.0, 40.0, 50.0];
        let (npv, dnpv) = npv_and_derivative(&flows, 0.0);
        assert_abs_diff_eq!(npv, 20.0, epsilon = 1e-12);
        // -(1*30 + 2*40 + 3*50)
        assert_abs_diff_eq!(dnpv, -260.0, epsilon = 1e-12);
    }

    #[test]
    fn test_single_period_discounting() {
        let (npv, dnpv) = npv_and_derivative(&[-100_000.0, 110_000.0], 0.10);
        assert_abs_diff_eq!(npv, 0.0, epsilon = 1e-6);
        assert_relative_eq!(dnpv, -110_000.0 / 1.21, max_relative = 1e-12);
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let flows = [-100_000.0, 25_000.0, 30_000.0, 35_000.0, 40_000.0, 45_000.0];
        let rate = 0.12;
        let h = 1e-6;
        let numerical = (npv_at_rate(&flows, rate + h) - npv_at_rate(&flows, rate - h)) / (2.0 * h);
        let (_, analytic) = npv_and_derivative(&flows, rate);
        assert_relative_eq!(analytic, numerical, max_relative = 1e-6);
    }

    #[test]
    fn test_npv_helpers_agree() {
        let flows = [-500.0, 100.0, 200.0, 300.0];
        for rate in [-0.3, 0.0, 0.07, 0.5] {
            let (npv, _) = npv_and_derivative(&flows, rate);
            assert_eq!(npv.to_bits(), npv_at_rate(&flows, rate).to_bits());
        }
    }

    #[test]
    fn test_matches_closed_form() {
        // Level annuity of 100 for 3 periods at 5%, less a 250 outlay
        let rate = 0.05;
        let annuity = 100.0 * (1.0 - 1.05_f64.powi(-3)) / rate;
        let npv = npv_at_rate(&[-250.0, 100.0, 100.0, 100.0], rate);
        assert_relative_eq!(npv, annuity - 250.0, max_relative = 1e-12);
    }

    #[test]
    fn test_single_flow_has_zero_derivative() {
        let (npv, dnpv) = npv_and_derivative(&[-250.0], 0.25);
        assert_eq!(npv, -250.0);
        assert_eq!(dnpv, 0.0);
    }

    #[test]
    fn test_rate_of_minus_one_is_not_finite() {
        let (npv, dnpv) = npv_and_derivative(&[-100.0, 50.0, 60.0], -1.0);
        assert!(!npv.is_finite());
        assert!(!dnpv.is_finite());
    }
}
