//! Engine configuration: debt-ratio thresholds, per-credit-type bounds,
//! and solver settings
//!
//! All configuration is plain values passed into the engine, never
//! module-level mutable state, so the engine stays pure and testable.

use serde::{Deserialize, Serialize};

/// Product family a simulation is run against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreditType {
    /// Consumer credit (crédit à la consommation)
    Consumer,
    /// Vehicle financing
    Vehicle,
    /// Mortgage / real-estate credit
    RealEstate,
    /// Professional equipment financing
    Equipment,
}

/// Bounds and reference pricing for one credit type
///
/// Amounts are in FCFA, durations in months, rates in annual percent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditTypeConfig {
    pub min_amount: f64,
    pub max_amount: f64,
    pub min_duration_months: u32,
    pub max_duration_months: u32,
    /// Reference annual nominal rate used when the request does not carry one
    pub reference_annual_rate: f64,
    /// Default borrower-insurance rate (annual % of initial capital)
    pub default_insurance_rate: f64,
}

impl CreditTypeConfig {
    /// Check an amount against this type's bounds
    pub fn amount_in_bounds(&self, amount: f64) -> bool {
        amount >= self.min_amount && amount <= self.max_amount
    }

    /// Check a duration against this type's bounds
    pub fn duration_in_bounds(&self, months: u32) -> bool {
        months >= self.min_duration_months && months <= self.max_duration_months
    }
}

/// Debt-ratio thresholds driving the affordability score and warnings
///
/// Values are percentages of monthly income.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtRatioThresholds {
    /// Below this the situation is rated excellent
    pub excellent: f64,
    /// Below this (and above `excellent`) the situation is rated good.
    /// Also the recommended ceiling: crossing it emits a warning.
    pub recommended: f64,
    /// Regulatory/underwriting maximum used by budget-mode capacity
    pub maximum: f64,
    /// Above `maximum` but below this is rated risky; beyond is critical
    pub critical: f64,
}

impl Default for DebtRatioThresholds {
    fn default() -> Self {
        Self {
            excellent: 20.0,
            recommended: 33.0,
            maximum: 40.0,
            critical: 50.0,
        }
    }
}

/// Iteration caps and tolerances for the iterative solvers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Convergence tolerance on the periodic rate
    pub rate_tolerance: f64,
    /// Iteration cap for Newton-Raphson and bisection alike
    pub max_iterations: u32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            rate_tolerance: 1e-9,
            max_iterations: 100,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    pub debt_ratio: DebtRatioThresholds,
    pub solver: SolverSettings,
    consumer: CreditTypeConfig,
    vehicle: CreditTypeConfig,
    real_estate: CreditTypeConfig,
    equipment: CreditTypeConfig,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            debt_ratio: DebtRatioThresholds::default(),
            solver: SolverSettings::default(),
            consumer: CreditTypeConfig {
                min_amount: 100_000.0,
                max_amount: 50_000_000.0,
                min_duration_months: 6,
                max_duration_months: 84,
                reference_annual_rate: 12.5,
                default_insurance_rate: 0.36,
            },
            vehicle: CreditTypeConfig {
                min_amount: 1_000_000.0,
                max_amount: 100_000_000.0,
                min_duration_months: 12,
                max_duration_months: 84,
                reference_annual_rate: 9.75,
                default_insurance_rate: 0.36,
            },
            real_estate: CreditTypeConfig {
                min_amount: 5_000_000.0,
                max_amount: 500_000_000.0,
                min_duration_months: 24,
                max_duration_months: 300,
                reference_annual_rate: 6.5,
                default_insurance_rate: 0.45,
            },
            equipment: CreditTypeConfig {
                min_amount: 500_000.0,
                max_amount: 200_000_000.0,
                min_duration_months: 12,
                max_duration_months: 120,
                reference_annual_rate: 8.25,
                default_insurance_rate: 0.36,
            },
        }
    }
}

impl SimulatorConfig {
    /// Get the bounds/pricing block for a credit type
    pub fn credit_type(&self, credit_type: CreditType) -> &CreditTypeConfig {
        match credit_type {
            CreditType::Consumer => &self.consumer,
            CreditType::Vehicle => &self.vehicle,
            CreditType::RealEstate => &self.real_estate,
            CreditType::Equipment => &self.equipment,
        }
    }

    /// Replace the bounds/pricing block for a credit type
    pub fn set_credit_type(&mut self, credit_type: CreditType, config: CreditTypeConfig) {
        match credit_type {
            CreditType::Consumer => self.consumer = config,
            CreditType::Vehicle => self.vehicle = config,
            CreditType::RealEstate => self.real_estate = config,
            CreditType::Equipment => self.equipment = config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bounds() {
        let config = SimulatorConfig::default();
        let consumer = config.credit_type(CreditType::Consumer);

        assert!(consumer.amount_in_bounds(5_000_000.0));
        assert!(!consumer.amount_in_bounds(50_000.0));
        assert!(consumer.duration_in_bounds(48));
        assert!(!consumer.duration_in_bounds(120));
    }

    #[test]
    fn test_thresholds_ordered() {
        let t = DebtRatioThresholds::default();
        assert!(t.excellent < t.recommended);
        assert!(t.recommended < t.maximum);
        assert!(t.maximum < t.critical);
    }

    #[test]
    fn test_override_credit_type() {
        let mut config = SimulatorConfig::default();
        let mut custom = config.credit_type(CreditType::Vehicle).clone();
        custom.max_duration_months = 96;
        config.set_credit_type(CreditType::Vehicle, custom);

        assert_eq!(
            config.credit_type(CreditType::Vehicle).max_duration_months,
            96
        );
    }
}
