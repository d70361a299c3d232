//! Effective-rate (APR-equivalent) solve
//!
//! The effective rate is the IRR of the loan's cash-flow series: the net
//! disbursed amount at t=0 against the monthly outflows including insurance.
//! There is no closed form, so this solves with Newton-Raphson and falls
//! back to bisection when the derivative degenerates or Newton fails to
//! converge within the iteration cap.

use log::debug;

use crate::config::SolverSettings;
use crate::error::{Result, SimulatorError};

/// Fallback Newton seed when the caller has no nominal rate to offer
const DEFAULT_SEED: f64 = 0.05 / 12.0;

/// Solve the annual effective rate (decimal, e.g. 0.068 for 6.8%) for a
/// monthly cash-flow series.
///
/// `cashflows[0]` is the net amount disbursed to the borrower (positive);
/// subsequent entries are the monthly payments (negative). Periods are
/// months; the periodic IRR is annualized as `(1 + r)^12 - 1`.
/// `nominal_monthly_rate` seeds the Newton iteration: the effective rate
/// sits near the nominal rate for realistic fee loads, so the loan's own
/// rate is the best starting point.
pub fn effective_annual_rate(
    cashflows: &[f64],
    nominal_monthly_rate: f64,
    settings: &SolverSettings,
) -> Result<f64> {
    if cashflows.len() < 2 {
        return Err(SimulatorError::invalid(
            "effective rate needs at least one payment after disbursement",
        ));
    }

    // A rate only exists when the series changes sign
    let has_positive = cashflows.iter().any(|&cf| cf > 1e-10);
    let has_negative = cashflows.iter().any(|&cf| cf < -1e-10);
    if !has_positive || !has_negative {
        return Err(SimulatorError::invalid(
            "effective rate needs both an inflow and outflows",
        ));
    }

    // Newton-Raphson on the periodic rate
    let mut rate = if nominal_monthly_rate > 0.0 {
        nominal_monthly_rate
    } else {
        DEFAULT_SEED
    };
    for iteration in 0..settings.max_iterations {
        let (npv, dnpv) = npv_and_derivative(cashflows, rate);

        if dnpv.abs() < 1e-20 {
            debug!("degenerate NPV derivative at iteration {iteration}, switching to bisection");
            return bisect_rate(cashflows, settings);
        }

        let new_rate = (rate - npv / dnpv).clamp(-0.99, 10.0);

        if (new_rate - rate).abs() < settings.rate_tolerance {
            return Ok(annualize(new_rate));
        }

        rate = new_rate;
    }

    debug!(
        "Newton-Raphson exhausted {} iterations, switching to bisection",
        settings.max_iterations
    );
    bisect_rate(cashflows, settings)
}

/// Convert a periodic (monthly) rate to an annual effective rate
fn annualize(monthly_rate: f64) -> f64 {
    (1.0 + monthly_rate).powi(12) - 1.0
}

/// NPV and its derivative with respect to the periodic rate
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        let discount = (1.0 + rate).powi(t as i32);
        npv += cf / discount;
        if t > 0 {
            dnpv -= (t as f64) * cf / (1.0 + rate).powi(t as i32 + 1);
        }
    }

    (npv, dnpv)
}

/// Bisection fallback over a wide periodic-rate bracket
fn bisect_rate(cashflows: &[f64], settings: &SolverSettings) -> Result<f64> {
    let mut low = -0.99_f64;
    let mut high = 10.0_f64;

    // The NPV early-exit is in currency units, not rate units, so scale its
    // tolerance by the disbursed amount
    let npv_tolerance = cashflows[0].abs().max(1.0) * settings.rate_tolerance;

    let npv_low = npv_at_rate(cashflows, low);
    let npv_high = npv_at_rate(cashflows, high);

    if npv_low * npv_high > 0.0 {
        // No sign change in the bracket: no root to find
        return Err(SimulatorError::Convergence {
            context: "effective rate solve",
            iterations: 0,
        });
    }

    for _ in 0..settings.max_iterations {
        let mid = (low + high) / 2.0;
        let npv_mid = npv_at_rate(cashflows, mid);

        if npv_mid.abs() < npv_tolerance || (high - low) / 2.0 < settings.rate_tolerance {
            return Ok(annualize(mid));
        }

        if npv_mid * npv_at_rate(cashflows, low) < 0.0 {
            high = mid;
        } else {
            low = mid;
        }
    }

    Err(SimulatorError::Convergence {
        context: "effective rate solve",
        iterations: settings.max_iterations,
    })
}

/// NPV at a given periodic rate
fn npv_at_rate(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}
