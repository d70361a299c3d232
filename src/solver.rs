//! Reverse solvers: recover the principal or the duration from a target
//! monthly payment, and derive budget-mode repayment capacity
//!
//! Principal-from-payment inverts the annuity formula in closed form. The
//! duration solve uses the logarithmic closed form rounded up to whole
//! months; an integer bisection would be strictly slower for no precision
//! gain.

use log::debug;

use crate::error::{Result, SimulatorError};

/// Largest principal a fixed monthly payment can amortize
///
/// Closed-form annuity inversion: `P = m * (1 - (1+r)^-n) / r`. Zero-rate
/// loans degenerate to `m * n`.
pub fn principal_for_payment(payment: f64, annual_rate: f64, months: u32) -> Result<f64> {
    if payment <= 0.0 {
        return Err(SimulatorError::invalid(format!(
            "target payment must be positive, got {payment}"
        )));
    }
    if months == 0 {
        return Err(SimulatorError::invalid("duration must be at least 1 month"));
    }
    if annual_rate < 0.0 {
        return Err(SimulatorError::invalid(format!(
            "annual rate cannot be negative, got {annual_rate}"
        )));
    }

    let r = annual_rate / 12.0 / 100.0;
    let principal = if r > 0.0 {
        payment * (1.0 - (1.0 + r).powi(-(months as i32))) / r
    } else {
        payment * months as f64
    };

    debug!("payment {payment:.2} over {months} months at {annual_rate}% finances {principal:.2}");
    Ok(principal)
}

/// Number of months needed to amortize a principal with a fixed payment
///
/// `n = -ln(1 - r*P/m) / ln(1+r)`, rounded up to a whole month. A payment at
/// or below the first month's interest (`P * r`) never amortizes the loan.
pub fn duration_for_payment(principal: f64, payment: f64, annual_rate: f64) -> Result<u32> {
    if principal <= 0.0 {
        return Err(SimulatorError::invalid(format!(
            "principal must be positive, got {principal}"
        )));
    }
    if payment <= 0.0 {
        return Err(SimulatorError::invalid(format!(
            "target payment must be positive, got {payment}"
        )));
    }
    if annual_rate < 0.0 {
        return Err(SimulatorError::invalid(format!(
            "annual rate cannot be negative, got {annual_rate}"
        )));
    }

    let r = annual_rate / 12.0 / 100.0;
    if r == 0.0 {
        return Ok((principal / payment).ceil() as u32);
    }

    let minimum = principal * r;
    if payment <= minimum {
        return Err(SimulatorError::Unaffordable {
            payment,
            principal,
            annual_rate,
            minimum,
        });
    }

    let months = -(1.0 - r * principal / payment).ln() / (1.0 + r).ln();
    // A payment that amortizes in a whole number of months must not round up
    // an extra month on floating-point noise
    let rounded = months.round();
    if (months - rounded).abs() < 1e-9 {
        Ok(rounded as u32)
    } else {
        Ok(months.ceil() as u32)
    }
}

/// Budget mode: the payment a borrower can carry given income, existing
/// debts, and a maximum debt ratio (percent of income)
pub fn max_affordable_payment(
    monthly_income: f64,
    current_debts: f64,
    max_debt_ratio: f64,
) -> Result<f64> {
    if monthly_income <= 0.0 {
        return Err(SimulatorError::invalid(format!(
            "monthly income must be positive, got {monthly_income}"
        )));
    }
    if current_debts < 0.0 {
        return Err(SimulatorError::invalid("current debts cannot be negative"));
    }
    if max_debt_ratio <= 0.0 || max_debt_ratio >= 100.0 {
        return Err(SimulatorError::invalid(format!(
            "max debt ratio must be between 0 and 100, got {max_debt_ratio}"
        )));
    }

    let capacity = monthly_income * max_debt_ratio / 100.0 - current_debts;
    if capacity <= 0.0 {
        return Err(SimulatorError::Unaffordable {
            payment: capacity.max(0.0),
            principal: 0.0,
            annual_rate: 0.0,
            minimum: current_debts,
        });
    }

    Ok(capacity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::{compute_amortization, CalculationParams};
    use crate::config::SolverSettings;
    use approx::assert_relative_eq;

    #[test]
    fn test_principal_payment_round_trip() {
        let params = CalculationParams::new(10_000_000.0, 6.0, 120);
        let result = compute_amortization(&params, &SolverSettings::default()).unwrap();

        let recovered = principal_for_payment(result.monthly_payment, 6.0, 120).unwrap();
        assert_relative_eq!(recovered, 10_000_000.0, epsilon = 1e-3);
    }

    #[test]
    fn test_zero_rate_principal() {
        let principal = principal_for_payment(100_000.0, 0.0, 12).unwrap();
        assert_relative_eq!(principal, 1_200_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_duration_round_trip() {
        // The exact annuity payment for 60 months must solve back to 60
        let params = CalculationParams::new(5_000_000.0, 9.0, 60);
        let result = compute_amortization(&params, &SolverSettings::default()).unwrap();

        let months = duration_for_payment(5_000_000.0, result.monthly_payment, 9.0).unwrap();
        assert_eq!(months, 60);
    }

    #[test]
    fn test_duration_rounds_up() {
        // A payment slightly under the 60-month annuity needs one more month
        let params = CalculationParams::new(5_000_000.0, 9.0, 60);
        let result = compute_amortization(&params, &SolverSettings::default()).unwrap();

        let months =
            duration_for_payment(5_000_000.0, result.monthly_payment - 100.0, 9.0).unwrap();
        assert_eq!(months, 61);
    }

    #[test]
    fn test_unaffordable_payment_rejected() {
        // First month's interest on 10M at 6% is 50,000: anything at or
        // below that never amortizes
        let err = duration_for_payment(10_000_000.0, 50_000.0, 6.0).unwrap_err();
        assert!(matches!(err, SimulatorError::Unaffordable { .. }));

        let err = duration_for_payment(10_000_000.0, 40_000.0, 6.0).unwrap_err();
        assert!(matches!(err, SimulatorError::Unaffordable { .. }));

        assert!(duration_for_payment(10_000_000.0, 50_001.0, 6.0).is_ok());
    }

    #[test]
    fn test_affordable_payment_from_budget() {
        let capacity = max_affordable_payment(900_000.0, 100_000.0, 33.0).unwrap();
        assert_relative_eq!(capacity, 900_000.0 * 0.33 - 100_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_budget_exhausted_by_existing_debts() {
        let err = max_affordable_payment(500_000.0, 200_000.0, 33.0).unwrap_err();
        assert!(matches!(err, SimulatorError::Unaffordable { .. }));
    }
}
