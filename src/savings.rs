//! Savings growth projection
//!
//! Compounds an initial deposit plus periodic contributions at a periodic
//! rate over a horizon. Order of operations is fixed: interest accrues on
//! the running balance first, the period's contribution lands second
//! (end-of-period compounding). Swapping the two changes the final amount,
//! so the convention is part of the contract.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulatorError};

/// How often interest is calculated and credited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompoundingFrequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Annually,
}

impl CompoundingFrequency {
    /// Compounding periods per year
    pub fn periods_per_year(self) -> f64 {
        match self {
            Self::Daily => 365.0,
            Self::Weekly => 52.0,
            Self::Monthly => 12.0,
            Self::Quarterly => 4.0,
            Self::Annually => 1.0,
        }
    }
}

/// One month of the savings projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsRow {
    /// Month index, 1-based
    pub month: u32,
    /// Contribution deposited this month
    pub deposit: f64,
    /// Interest credited this month
    pub interest: f64,
    /// Balance at end of month
    pub balance: f64,
}

/// Outcome of a savings projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsProjection {
    pub final_amount: f64,
    /// Initial deposit plus every monthly contribution
    pub total_contributions: f64,
    pub total_interest: f64,
    /// Display rate: `(1 + r/n)^n - 1`, percent
    pub effective_annual_rate: f64,
    pub schedule: Vec<SavingsRow>,
}

/// Project a savings balance month by month
///
/// `annual_rate` is in percent. Compounding at a non-monthly frequency is
/// expressed as the equivalent monthly factor so the schedule stays one row
/// per month.
pub fn project_savings(
    initial_deposit: f64,
    monthly_contribution: f64,
    annual_rate: f64,
    frequency: CompoundingFrequency,
    duration_months: u32,
) -> Result<SavingsProjection> {
    if initial_deposit < 0.0 {
        return Err(SimulatorError::invalid("initial deposit cannot be negative"));
    }
    if monthly_contribution < 0.0 {
        return Err(SimulatorError::invalid(
            "monthly contribution cannot be negative",
        ));
    }
    if annual_rate < 0.0 {
        return Err(SimulatorError::invalid(format!(
            "annual rate cannot be negative, got {annual_rate}"
        )));
    }
    if duration_months == 0 {
        return Err(SimulatorError::invalid("duration must be at least 1 month"));
    }
    if initial_deposit == 0.0 && monthly_contribution == 0.0 {
        return Err(SimulatorError::invalid(
            "either an initial deposit or a monthly contribution is required",
        ));
    }

    let n = frequency.periods_per_year();
    let periodic_rate = annual_rate / 100.0 / n;
    let effective_annual = (1.0 + periodic_rate).powf(n) - 1.0;
    // Equivalent growth factor for one month
    let monthly_factor = (1.0 + periodic_rate).powf(n / 12.0);

    let mut schedule = Vec::with_capacity(duration_months as usize);
    let mut balance = initial_deposit;
    let mut total_interest = 0.0;

    for month in 1..=duration_months {
        // Growth first, contribution second
        let interest = balance * (monthly_factor - 1.0);
        balance += interest + monthly_contribution;
        total_interest += interest;

        schedule.push(SavingsRow {
            month,
            deposit: monthly_contribution,
            interest,
            balance,
        });
    }

    let total_contributions = initial_deposit + monthly_contribution * duration_months as f64;

    Ok(SavingsProjection {
        final_amount: balance,
        total_contributions,
        total_interest,
        effective_annual_rate: effective_annual * 100.0,
        schedule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_scenario() {
        // 1,000,000 initial, 50,000/month, 4% annual, monthly compounding,
        // 24 months, growth-then-contribute order
        let projection = project_savings(
            1_000_000.0,
            50_000.0,
            4.0,
            CompoundingFrequency::Monthly,
            24,
        )
        .unwrap();

        // Reference loop locking in the order of operations
        let mut expected = 1_000_000.0;
        for _ in 0..24 {
            expected *= 1.0 + 0.04 / 12.0;
            expected += 50_000.0;
        }
        assert_relative_eq!(projection.final_amount, expected, epsilon = 1e-6);
        assert_relative_eq!(projection.total_contributions, 2_200_000.0, epsilon = 1e-9);
        assert_eq!(projection.schedule.len(), 24);
    }

    #[test]
    fn test_final_amount_covers_contributions() {
        let projection = project_savings(
            500_000.0,
            25_000.0,
            3.5,
            CompoundingFrequency::Quarterly,
            60,
        )
        .unwrap();

        assert!(projection.final_amount >= projection.total_contributions);
        assert!(projection.total_interest > 0.0);
        assert_relative_eq!(
            projection.final_amount,
            projection.total_contributions + projection.total_interest,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_zero_rate_accumulates_deposits_only() {
        let projection =
            project_savings(100_000.0, 10_000.0, 0.0, CompoundingFrequency::Monthly, 12).unwrap();

        assert_relative_eq!(projection.final_amount, 220_000.0, epsilon = 1e-9);
        assert!(projection.total_interest.abs() < 1e-9);
        assert!(projection.effective_annual_rate.abs() < 1e-9);
    }

    #[test]
    fn test_effective_rate_increases_with_frequency() {
        let annual =
            project_savings(1_000_000.0, 0.0, 5.0, CompoundingFrequency::Annually, 12).unwrap();
        let monthly =
            project_savings(1_000_000.0, 0.0, 5.0, CompoundingFrequency::Monthly, 12).unwrap();
        let daily =
            project_savings(1_000_000.0, 0.0, 5.0, CompoundingFrequency::Daily, 12).unwrap();

        assert!(monthly.effective_annual_rate > annual.effective_annual_rate);
        assert!(daily.effective_annual_rate > monthly.effective_annual_rate);
        assert_relative_eq!(annual.effective_annual_rate, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_one_year_monthly_matches_effective_rate() {
        // With no contributions, 12 months of monthly compounding is exactly
        // one effective year
        let projection =
            project_savings(1_000_000.0, 0.0, 6.0, CompoundingFrequency::Monthly, 12).unwrap();

        let expected = 1_000_000.0 * (1.0 + 0.06 / 12.0_f64).powi(12);
        assert_relative_eq!(projection.final_amount, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert!(project_savings(-1.0, 0.0, 4.0, CompoundingFrequency::Monthly, 12).is_err());
        assert!(project_savings(0.0, 0.0, 4.0, CompoundingFrequency::Monthly, 12).is_err());
        assert!(project_savings(100.0, 0.0, -4.0, CompoundingFrequency::Monthly, 12).is_err());
        assert!(project_savings(100.0, 0.0, 4.0, CompoundingFrequency::Monthly, 0).is_err());
    }
}
