//! Amortization schedule output structures

use serde::{Deserialize, Serialize};

/// One row of the amortization schedule, one per month
///
/// Amounts are unrounded FCFA; currency rounding is a presentation concern
/// left to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationPayment {
    /// Month index, 1-based
    pub month: u32,

    /// Total payment for the month (capital + interest + insurance)
    pub payment: f64,

    /// Capital portion of the payment
    pub capital: f64,

    /// Interest portion of the payment
    pub interest: f64,

    /// Insurance portion, when borrower insurance applies
    pub insurance: Option<f64>,

    /// Principal still owed after this payment
    pub remaining_capital: f64,

    /// Interest paid since inception, inclusive of this month
    pub cumulative_interest: f64,

    /// Capital repaid since inception, inclusive of this month
    pub cumulative_capital: f64,
}

/// Result of one amortization computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Principal actually amortized (net of any down payment)
    pub principal: f64,

    /// Duration in months
    pub duration_months: u32,

    /// Nominal annual rate, percent
    pub nominal_annual_rate: f64,

    /// Fixed monthly payment (capital + interest, insurance excluded)
    pub monthly_payment: f64,

    /// Flat monthly insurance premium, 0 when no insurance
    pub monthly_insurance: f64,

    /// Monthly outflow including insurance
    pub total_monthly_payment: f64,

    /// Interest paid over the life of the loan
    pub total_interest: f64,

    /// Insurance paid over the life of the loan
    pub total_insurance: f64,

    /// One-off processing fees
    pub processing_fees: f64,

    /// Total cost of credit: interest + insurance + fees
    pub total_cost: f64,

    /// APR-equivalent annual rate (percent) including fees and insurance
    pub effective_annual_rate: f64,

    /// Full month-by-month schedule
    pub schedule: Vec<AmortizationPayment>,
}

impl CalculationResult {
    /// Summary statistics over the schedule
    pub fn summary(&self) -> ScheduleSummary {
        let total_paid: f64 = self.schedule.iter().map(|r| r.payment).sum();
        let total_capital: f64 = self.schedule.iter().map(|r| r.capital).sum();
        let final_remaining = self
            .schedule
            .last()
            .map(|r| r.remaining_capital)
            .unwrap_or(0.0);

        ScheduleSummary {
            months: self.schedule.len() as u32,
            total_paid: total_paid + self.processing_fees,
            total_capital,
            total_interest: self.total_interest,
            total_insurance: self.total_insurance,
            final_remaining,
        }
    }
}

/// Aggregates over a full schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub months: u32,
    /// Everything paid out: schedule payments plus processing fees
    pub total_paid: f64,
    pub total_capital: f64,
    pub total_interest: f64,
    pub total_insurance: f64,
    pub final_remaining: f64,
}
