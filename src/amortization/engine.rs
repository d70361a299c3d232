//! Fixed-payment amortization engine
//!
//! Computes the monthly annuity payment, splits each month into interest and
//! capital, and produces the full schedule. The final month absorbs the
//! floating-point residue so the remaining capital lands on exactly zero.

use log::debug;
use serde::{Deserialize, Serialize};

use super::schedule::{AmortizationPayment, CalculationResult};
use crate::amortization::effective_rate::effective_annual_rate;
use crate::config::SolverSettings;
use crate::error::{Result, SimulatorError};

/// Inputs to one amortization computation
///
/// `principal` in FCFA, `annual_rate` and `insurance_rate` in annual percent,
/// `processing_fees` and `down_payment` in FCFA.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationParams {
    pub principal: f64,
    pub annual_rate: f64,
    pub duration_months: u32,
    pub insurance_rate: Option<f64>,
    pub processing_fees: Option<f64>,
    pub down_payment: Option<f64>,
}

impl CalculationParams {
    /// Bare loan with no insurance, fees, or down payment
    pub fn new(principal: f64, annual_rate: f64, duration_months: u32) -> Self {
        Self {
            principal,
            annual_rate,
            duration_months,
            insurance_rate: None,
            processing_fees: None,
            down_payment: None,
        }
    }

    /// Principal actually financed, net of the down payment
    pub fn financed_amount(&self) -> f64 {
        self.principal - self.down_payment.unwrap_or(0.0)
    }

    fn validate(&self) -> Result<()> {
        if self.principal <= 0.0 {
            return Err(SimulatorError::invalid(format!(
                "principal must be positive, got {}",
                self.principal
            )));
        }
        if self.duration_months == 0 {
            return Err(SimulatorError::invalid("duration must be at least 1 month"));
        }
        if self.annual_rate < 0.0 {
            return Err(SimulatorError::invalid(format!(
                "annual rate cannot be negative, got {}",
                self.annual_rate
            )));
        }
        if self.insurance_rate.is_some_and(|r| r < 0.0) {
            return Err(SimulatorError::invalid("insurance rate cannot be negative"));
        }
        if self.processing_fees.is_some_and(|f| f < 0.0) {
            return Err(SimulatorError::invalid("processing fees cannot be negative"));
        }
        let down = self.down_payment.unwrap_or(0.0);
        if down < 0.0 {
            return Err(SimulatorError::invalid("down payment cannot be negative"));
        }
        if down >= self.principal {
            return Err(SimulatorError::invalid(
                "down payment must be smaller than the principal",
            ));
        }
        let fees = self.processing_fees.unwrap_or(0.0);
        if fees >= self.financed_amount() {
            return Err(SimulatorError::invalid(
                "processing fees cannot exceed the financed amount",
            ));
        }
        Ok(())
    }
}

/// Fixed monthly annuity payment for a principal at a monthly rate
///
/// Zero-rate loans degenerate to straight-line repayment; the annuity
/// formula would divide by zero there.
pub fn annuity_payment(principal: f64, monthly_rate: f64, months: u32) -> f64 {
    if monthly_rate > 0.0 {
        principal * monthly_rate / (1.0 - (1.0 + monthly_rate).powi(-(months as i32)))
    } else {
        principal / months as f64
    }
}

/// Compute the full amortization result for the given parameters
pub fn compute_amortization(
    params: &CalculationParams,
    settings: &SolverSettings,
) -> Result<CalculationResult> {
    params.validate()?;

    let principal = params.financed_amount();
    let months = params.duration_months;
    let monthly_rate = params.annual_rate / 12.0 / 100.0;
    let fees = params.processing_fees.unwrap_or(0.0);

    let monthly_payment = annuity_payment(principal, monthly_rate, months);

    // Flat premium on the initial capital, the regional bancassurance
    // convention; excluded from the principal amortization.
    let monthly_insurance = params
        .insurance_rate
        .map(|rate| rate / 12.0 / 100.0 * principal)
        .unwrap_or(0.0);

    let mut schedule = Vec::with_capacity(months as usize);
    let mut remaining = principal;
    let mut cumulative_interest = 0.0;
    let mut cumulative_capital = 0.0;

    for month in 1..=months {
        let interest = remaining * monthly_rate;
        let capital = if month == months {
            // Absorb the rounding residue so the loan closes at exactly zero
            remaining
        } else {
            monthly_payment - interest
        };

        remaining -= capital;
        if month == months {
            remaining = 0.0;
        }
        cumulative_interest += interest;
        cumulative_capital += capital;

        schedule.push(AmortizationPayment {
            month,
            payment: capital + interest + monthly_insurance,
            capital,
            interest,
            insurance: params.insurance_rate.map(|_| monthly_insurance),
            remaining_capital: remaining,
            cumulative_interest,
            cumulative_capital,
        });
    }

    let total_interest = cumulative_interest;
    let total_insurance = monthly_insurance * months as f64;
    let total_cost = total_interest + total_insurance + fees;

    // APR: IRR of net disbursement vs the all-in monthly outflows
    let mut cashflows = Vec::with_capacity(schedule.len() + 1);
    cashflows.push(principal - fees);
    cashflows.extend(schedule.iter().map(|row| -row.payment));
    let effective = effective_annual_rate(&cashflows, monthly_rate, settings)?;

    debug!(
        "amortized {principal:.2} over {months} months: payment {monthly_payment:.2}, effective rate {:.4}%",
        effective * 100.0
    );

    Ok(CalculationResult {
        principal,
        duration_months: months,
        nominal_annual_rate: params.annual_rate,
        monthly_payment,
        monthly_insurance,
        total_monthly_payment: monthly_payment + monthly_insurance,
        total_interest,
        total_insurance,
        processing_fees: fees,
        total_cost,
        effective_annual_rate: effective * 100.0,
        schedule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn settings() -> SolverSettings {
        SolverSettings::default()
    }

    #[test]
    fn test_reference_scenario() {
        // 10,000,000 FCFA at 6% over 120 months
        let params = CalculationParams::new(10_000_000.0, 6.0, 120);
        let result = compute_amortization(&params, &settings()).unwrap();

        // Standard annuity formula output
        let r = 0.06 / 12.0;
        let expected = 10_000_000.0 * r / (1.0 - (1.0_f64 + r).powi(-120));
        assert_relative_eq!(result.monthly_payment, expected, epsilon = 1e-6);
        assert!((result.monthly_payment - 111_020.0).abs() < 10.0);
        assert!((result.total_interest - (expected * 120.0 - 10_000_000.0)).abs() < 0.5);
    }

    #[test]
    fn test_capital_sums_to_principal() {
        let params = CalculationParams::new(7_350_000.0, 11.9, 60);
        let result = compute_amortization(&params, &settings()).unwrap();

        let capital_sum: f64 = result.schedule.iter().map(|r| r.capital).sum();
        assert!((capital_sum - 7_350_000.0).abs() < 0.5);
        assert_eq!(result.schedule.last().unwrap().remaining_capital, 0.0);
    }

    #[test]
    fn test_summary_totals() {
        let mut params = CalculationParams::new(3_000_000.0, 9.5, 48);
        params.processing_fees = Some(50_000.0);
        let result = compute_amortization(&params, &settings()).unwrap();

        let summary = result.summary();
        assert_eq!(summary.months, 48);
        assert!((summary.total_capital - 3_000_000.0).abs() < 0.5);
        assert_eq!(summary.final_remaining, 0.0);
        assert_relative_eq!(
            summary.total_paid,
            3_000_000.0 + result.total_cost,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_remaining_capital_decreases() {
        let params = CalculationParams::new(5_000_000.0, 8.0, 36);
        let result = compute_amortization(&params, &settings()).unwrap();

        for pair in result.schedule.windows(2) {
            assert!(pair[1].remaining_capital < pair[0].remaining_capital);
        }
    }

    #[test]
    fn test_zero_rate_loan() {
        let params = CalculationParams::new(1_200_000.0, 0.0, 12);
        let result = compute_amortization(&params, &settings()).unwrap();

        assert_relative_eq!(result.monthly_payment, 100_000.0, epsilon = 1e-9);
        assert!(result.total_interest.abs() < 1e-9);
        assert!(result.effective_annual_rate.abs() < 1e-4);
    }

    #[test]
    fn test_rate_monotonicity() {
        let low = compute_amortization(&CalculationParams::new(10_000_000.0, 5.0, 120), &settings())
            .unwrap();
        let high =
            compute_amortization(&CalculationParams::new(10_000_000.0, 7.0, 120), &settings())
                .unwrap();

        assert!(high.monthly_payment > low.monthly_payment);
        assert!(high.total_interest > low.total_interest);
    }

    #[test]
    fn test_insurance_excluded_from_amortization() {
        let mut params = CalculationParams::new(10_000_000.0, 6.0, 120);
        params.insurance_rate = Some(0.36);
        let result = compute_amortization(&params, &settings()).unwrap();

        // Insurance rides on top of the annuity payment
        let expected_insurance = 0.36 / 12.0 / 100.0 * 10_000_000.0;
        assert_relative_eq!(result.monthly_insurance, expected_insurance, epsilon = 1e-9);

        // Capital amortization is unchanged by insurance
        let bare = compute_amortization(&CalculationParams::new(10_000_000.0, 6.0, 120), &settings())
            .unwrap();
        assert_relative_eq!(result.monthly_payment, bare.monthly_payment, epsilon = 1e-9);
        assert!(result.effective_annual_rate > bare.effective_annual_rate);
    }

    #[test]
    fn test_down_payment_reduces_financed_amount() {
        let mut params = CalculationParams::new(10_000_000.0, 6.0, 120);
        params.down_payment = Some(2_000_000.0);
        let result = compute_amortization(&params, &settings()).unwrap();

        assert_relative_eq!(result.principal, 8_000_000.0, epsilon = 1e-9);
        let capital_sum: f64 = result.schedule.iter().map(|r| r.capital).sum();
        assert!((capital_sum - 8_000_000.0).abs() < 0.5);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let settings = settings();

        let zero_principal = CalculationParams::new(0.0, 6.0, 12);
        assert!(compute_amortization(&zero_principal, &settings).is_err());

        let zero_duration = CalculationParams::new(1_000_000.0, 6.0, 0);
        assert!(compute_amortization(&zero_duration, &settings).is_err());

        let negative_rate = CalculationParams::new(1_000_000.0, -1.0, 12);
        assert!(compute_amortization(&negative_rate, &settings).is_err());
    }
}
