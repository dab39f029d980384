//! Internal Rate of Return (IRR) calculation
//!
//! Newton-Raphson on the NPV function. Each step is checked for a usable
//! derivative and a rate above -100%; any numerical breakdown comes back as
//! a typed `IrrError` instead of a NaN rate.

use super::npv::npv_and_derivative;
use crate::cashflow::{has_sign_change, validate_flows};
use crate::config::SolverConfig;
use crate::error::{IrrError, IrrResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::ControlFlow;

/// Whether the iteration met its tolerance before the iteration cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Convergence {
    Converged,
    /// Iteration cap reached; the rate is the last estimate
    NotConverged,
}

/// Solved rate plus diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrrSolution {
    /// Periodic rate as a decimal (0.05 = 5%)
    pub rate: f64,
    /// Newton steps taken
    pub iterations: u32,
    /// NPV of the series at `rate`
    pub npv: f64,
    pub convergence: Convergence,
}

impl IrrSolution {
    pub fn is_converged(&self) -> bool {
        self.convergence == Convergence::Converged
    }

    pub fn rate_pct(&self) -> f64 {
        self.rate * 100.0
    }
}

impl fmt::Display for IrrSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.rate_pct())?;
        if !self.is_converged() {
            write!(f, " (not converged after {} iterations)", self.iterations)?;
        }
        Ok(())
    }
}

enum Step {
    Converged(f64),
    Continue(f64),
}

/// One Newton update from `rate`
fn newton_step(cashflows: &[f64], rate: f64, tolerance: f64) -> IrrResult<Step> {
    if !rate.is_finite() || rate <= -1.0 {
        return Err(IrrError::DivergedOrInvalidRate { rate });
    }

    let (npv, dnpv) = npv_and_derivative(cashflows, rate);

    if !npv.is_finite() {
        return Err(IrrError::DivergedOrInvalidRate { rate });
    }
    if dnpv == 0.0 || !dnpv.is_finite() {
        return Err(IrrError::DegenerateDerivative { rate, derivative: dnpv });
    }

    let new_rate = rate - npv / dnpv;
    log::trace!("newton step: rate={} npv={} dnpv={} -> {}", rate, npv, dnpv, new_rate);

    if !new_rate.is_finite() {
        return Err(IrrError::DivergedOrInvalidRate { rate: new_rate });
    }

    if (new_rate - rate).abs() < tolerance {
        if new_rate <= -1.0 {
            return Err(IrrError::DivergedOrInvalidRate { rate: new_rate });
        }
        return Ok(Step::Converged(new_rate));
    }

    Ok(Step::Continue(new_rate))
}

/// Calculate the Internal Rate of Return (IRR) for a series of cash flows
/// using the Newton-Raphson method.
///
/// # Arguments
/// * `cashflows` - Cash flows by period, index 0 = time 0 (positive = inflow, negative = outflow)
/// * `config` - Starting guess, iteration cap and tolerance
///
/// # Returns
/// * `Ok(IrrSolution)` - The rate; check `convergence` to see if the cap was hit first
/// * `Err(IrrError)` - Input has no root to find, or the iteration broke down
pub fn calculate_irr(cashflows: &[f64], config: &SolverConfig) -> IrrResult<IrrSolution> {
    config.validate()?;
    validate_flows(cashflows)?;

    // A lone flow has no rate sensitivity at all
    if cashflows.len() == 1 {
        return Err(IrrError::DegenerateDerivative {
            rate: config.initial_guess,
            derivative: 0.0,
        });
    }

    if !has_sign_change(cashflows) {
        log::warn!("cash flows have no sign change; refusing to solve for IRR");
        return Err(IrrError::NoSignChange);
    }

    let outcome = (1..=config.max_iterations).try_fold(config.initial_guess, |rate, iteration| {
        match newton_step(cashflows, rate, config.tolerance) {
            Ok(Step::Continue(new_rate)) => ControlFlow::Continue(new_rate),
            Ok(Step::Converged(new_rate)) => ControlFlow::Break(Ok((new_rate, iteration))),
            Err(e) => ControlFlow::Break(Err(e)),
        }
    });

    match outcome {
        ControlFlow::Break(Ok((rate, iterations))) => {
            log::debug!("IRR converged to {} after {} iterations", rate, iterations);
            Ok(solution(cashflows, rate, iterations, Convergence::Converged))
        }
        ControlFlow::Break(Err(e)) => {
            log::debug!("IRR iteration failed: {}", e);
            Err(e)
        }
        ControlFlow::Continue(rate) => {
            if !rate.is_finite() || rate <= -1.0 {
                return Err(IrrError::DivergedOrInvalidRate { rate });
            }
            log::warn!(
                "IRR did not converge within {} iterations; returning last estimate {}",
                config.max_iterations,
                rate
            );
            Ok(solution(cashflows, rate, config.max_iterations, Convergence::NotConverged))
        }
    }
}

fn solution(cashflows: &[f64], rate: f64, iterations: u32, convergence: Convergence) -> IrrSolution {
    let (npv, _) = npv_and_derivative(cashflows, rate);
    IrrSolution { rate, iterations, npv, convergence }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::{prop_assert, prop_assume, proptest};

    const EXAMPLE_FLOWS: [f64; 6] = [-100_000.0, 25_000.0, 30_000.0, 35_000.0, 40_000.0, 45_000.0];

    fn irr(cashflows: &[f64]) -> IrrResult<IrrSolution> {
        calculate_irr(cashflows, &SolverConfig::default())
    }

    #[test]
    fn test_example_project_converges() {
        let result = irr(&EXAMPLE_FLOWS).unwrap();
        assert!(result.is_converged());
        assert_abs_diff_eq!(result.rate, 0.197_111, epsilon = 1e-5);

        let (npv, _) = npv_and_derivative(&EXAMPLE_FLOWS, result.rate);
        assert!(npv.abs() < 1.0, "NPV at IRR was {}", npv);
        assert_eq!(result.npv, npv);
    }

    #[test]
    fn test_simple_irr() {
        // Invest 100k, get 110k back one period later
        let result = irr(&[-100_000.0, 110_000.0]).unwrap();
        assert!(result.is_converged());
        assert_abs_diff_eq!(result.rate, 0.10, epsilon = 1e-9);
    }

    #[test]
    fn test_two_equal_returns() {
        // x^2 + x - 1 = 0 with x = 1/(1+r), so r = golden ratio - 1
        let result = irr(&[-100_000.0, 100_000.0, 100_000.0]).unwrap();
        assert!(result.is_converged());
        assert_abs_diff_eq!(result.rate, 0.618_033_988_749_895, epsilon = 1e-6);
    }

    #[test]
    fn test_level_loan_payments() {
        // Borrow 10000, repay 900 a period for 12 periods
        let mut cashflows = vec![10_000.0];
        cashflows.extend(vec![-900.0; 12]);

        let result = irr(&cashflows).unwrap();
        assert!(result.is_converged());
        assert!(result.rate > 0.0);
        assert!(result.npv.abs() < 1.0);
    }

    #[test]
    fn test_no_sign_change() {
        assert_eq!(irr(&[100_000.0, 200_000.0]), Err(IrrError::NoSignChange));
        assert_eq!(irr(&[-100.0, -5.0, 0.0]), Err(IrrError::NoSignChange));
        assert_eq!(irr(&[0.0, 0.0]), Err(IrrError::NoSignChange));
    }

    #[test]
    fn test_single_flow_is_degenerate() {
        assert_eq!(
            irr(&[-100_000.0]),
            Err(IrrError::DegenerateDerivative { rate: 0.10, derivative: 0.0 })
        );
    }

    #[test]
    fn test_empty_and_non_finite_input() {
        assert_eq!(irr(&[]), Err(IrrError::EmptySeries));
        assert!(matches!(
            irr(&[-100.0, f64::NAN]),
            Err(IrrError::NonFiniteCashFlow { period: 1, .. })
        ));
    }

    #[test]
    fn test_zero_derivative_at_guess() {
        // dnpv = -2/(1+r)^2 + 2/(1+r)^3, exactly zero at r = 0
        let config = SolverConfig { initial_guess: 0.0, ..Default::default() };
        let result = calculate_irr(&[1.0, 2.0, -1.0], &config);
        assert!(matches!(result, Err(IrrError::DegenerateDerivative { rate, .. }) if rate == 0.0));
    }

    #[test]
    fn test_overshoot_below_minus_one_is_reported() {
        // Far right of the root the NPV curve is nearly flat, so the first step
        // throws the rate far below -100%
        let mut cashflows = vec![-100.0];
        cashflows.extend(vec![0.0; 9]);
        cashflows.push(200.0);
        let config = SolverConfig { initial_guess: 2.0, ..Default::default() };

        let result = calculate_irr(&cashflows, &config);
        assert!(matches!(result, Err(IrrError::DivergedOrInvalidRate { rate }) if rate < -1.0));
    }

    #[test]
    fn test_iteration_cap_returns_estimate() {
        let config = SolverConfig { max_iterations: 1, tolerance: 1e-12, ..Default::default() };
        let result = calculate_irr(&EXAMPLE_FLOWS, &config).unwrap();
        assert_eq!(result.convergence, Convergence::NotConverged);
        assert_eq!(result.iterations, 1);
        assert!(result.rate.is_finite());
        assert!(result.to_string().contains("not converged"));
    }

    #[test]
    fn test_zero_iterations_returns_guess() {
        let config = SolverConfig { max_iterations: 0, ..Default::default() };
        let result = calculate_irr(&EXAMPLE_FLOWS, &config).unwrap();
        assert_eq!(result.rate, 0.10);
        assert!(!result.is_converged());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SolverConfig { tolerance: -1.0, ..Default::default() };
        assert!(matches!(
            calculate_irr(&EXAMPLE_FLOWS, &config),
            Err(IrrError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_repeat_calls_are_bit_identical() {
        let first = irr(&EXAMPLE_FLOWS).unwrap();
        let second = irr(&EXAMPLE_FLOWS).unwrap();
        assert_eq!(first.rate.to_bits(), second.rate.to_bits());
        assert_eq!(first.iterations, second.iterations);
    }

    #[test]
    fn test_display_as_percentage() {
        let result = irr(&[-100_000.0, 110_000.0]).unwrap();
        assert_eq!(result.to_string(), "10.00%");
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_converged_rate_zeroes_npv(
            outlay in 1_000u32..1_000_000,
            returns in proptest::collection::vec(0u32..500_000, 1..12)
        ) {
            prop_assume!(returns.iter().any(|&r| r > 0));

            let mut cashflows = vec![-(outlay as f64)];
            cashflows.extend(returns.iter().map(|&r| r as f64));

            let config = SolverConfig::default();
            match calculate_irr(&cashflows, &config) {
                Ok(solution) => {
                    prop_assert!(solution.rate.is_finite());
                    prop_assert!(solution.rate > -1.0);
                    if solution.is_converged() {
                        let (npv, dnpv) = npv_and_derivative(&cashflows, solution.rate);
                        prop_assert!(
                            npv.abs() <= config.tolerance * dnpv.abs(),
                            "npv {} at rate {} (dnpv {})", npv, solution.rate, dnpv
                        );
                    }
                }
                Err(e) => prop_assert!(
                    matches!(e, IrrError::DivergedOrInvalidRate { .. }),
                    "unexpected error {:?}", e
                ),
            }
        }
    }
}
