//! Simulation facade: validates mode-specific inputs, dispatches to the
//! amortization engine and solvers, and assembles the full result
//!
//! The facade holds a pre-built [`SimulatorConfig`] so many simulations can
//! run against the same thresholds and product bounds without rebuilding
//! them, in the style of a batch runner.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::affordability::{evaluate_affordability, AffordabilityScore};
use crate::amortization::engine::annuity_payment;
use crate::amortization::{compute_amortization, AmortizationPayment, CalculationParams};
use crate::config::{CreditType, SimulatorConfig};
use crate::error::{Result, SimulatorError};
use crate::solver::{duration_for_payment, max_affordable_payment, principal_for_payment};

/// Per-process sequence keeping simulation ids unique within a millisecond
static SIMULATION_SEQ: AtomicU64 = AtomicU64::new(0);

/// What the borrower is solving for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationMode {
    /// Known amount, compute the payment
    Amount,
    /// Known target payment, compute the amount (or the duration)
    Payment,
    /// Known income, compute what the borrower can afford
    Budget,
}

/// One simulation request
///
/// Only the fields required by the active mode are read; the rest are
/// ignored. Amounts in FCFA, rates in annual percent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationInput {
    pub credit_type: CreditType,
    pub mode: SimulationMode,

    /// Required in amount mode; in payment mode only with
    /// `optimize_duration`
    pub requested_amount: Option<f64>,

    /// Requested duration in months (ignored when `optimize_duration` holds)
    pub duration_months: u32,

    /// Required in payment mode
    pub target_payment: Option<f64>,

    /// Required in budget mode; optional elsewhere (enables affordability
    /// output)
    pub monthly_income: Option<f64>,

    /// Existing monthly debt payments, defaults to 0
    pub current_debts: Option<f64>,

    /// Nominal annual rate; falls back to the credit type's reference rate
    pub annual_rate: Option<f64>,

    /// Borrower-insurance rate; falls back to the credit type's default when
    /// `include_insurance` holds
    pub insurance_rate: Option<f64>,

    /// One-off processing fees, counted when `include_fees` holds
    pub processing_fees: Option<f64>,

    pub include_insurance: bool,
    pub include_fees: bool,

    /// Payment mode: solve for the duration at `requested_amount` instead of
    /// solving for the amount at `duration_months`
    pub optimize_duration: bool,
}

impl SimulationInput {
    /// Amount-mode request with everything else off
    pub fn for_amount(credit_type: CreditType, amount: f64, duration_months: u32) -> Self {
        Self {
            credit_type,
            mode: SimulationMode::Amount,
            requested_amount: Some(amount),
            duration_months,
            target_payment: None,
            monthly_income: None,
            current_debts: None,
            annual_rate: None,
            insurance_rate: None,
            processing_fees: None,
            include_insurance: false,
            include_fees: false,
            optimize_duration: false,
        }
    }
}

/// Complete simulation outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub simulation_id: String,
    pub calculated_at: DateTime<Utc>,

    pub credit_type: CreditType,
    pub mode: SimulationMode,

    /// Amount the borrower asked about, when one was given
    pub requested_amount: Option<f64>,
    /// Principal the engine amortized
    pub calculated_amount: f64,
    /// Principal plus processing fees
    pub total_financed: f64,

    /// Capital + interest part of the monthly payment
    pub monthly_payment: f64,
    pub monthly_insurance: f64,
    /// All-in monthly outflow
    pub total_monthly_payment: f64,

    pub total_interest: f64,
    pub total_insurance: f64,
    pub processing_fees: f64,
    /// Interest + insurance + fees
    pub total_cost: f64,

    /// Nominal annual rate, percent
    pub nominal_rate: f64,
    /// APR-equivalent annual rate, percent
    pub effective_rate: f64,

    pub duration_months: u32,

    pub debt_ratio: Option<f64>,
    pub remaining_income: Option<f64>,
    pub affordability: Option<AffordabilityScore>,

    pub schedule: Vec<AmortizationPayment>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Simulation runner holding a pre-built configuration
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SimulatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Run one simulation
    pub fn simulate(&self, input: &SimulationInput) -> Result<SimulationResult> {
        let mut warnings = Vec::new();

        let annual_rate = self.resolve_rate(input)?;
        let insurance_rate = self.resolve_insurance(input)?;
        let fees = self.resolve_fees(input)?;
        let monthly_insurance_rate = insurance_rate.unwrap_or(0.0) / 12.0 / 100.0;

        let (principal, duration) = match input.mode {
            SimulationMode::Amount => self.solve_amount_mode(input)?,
            SimulationMode::Payment => self.solve_payment_mode(
                input,
                annual_rate,
                monthly_insurance_rate,
                &mut warnings,
            )?,
            SimulationMode::Budget => self.solve_budget_mode(
                input,
                annual_rate,
                monthly_insurance_rate,
                &mut warnings,
            )?,
        };

        self.check_bounds(input.credit_type, principal, duration, &mut warnings);

        let params = CalculationParams {
            principal,
            annual_rate,
            duration_months: duration,
            insurance_rate,
            processing_fees: fees,
            down_payment: None,
        };
        let calc = compute_amortization(&params, &self.config.solver)?;

        // Affordability is evaluated whenever income is known, not only in
        // budget mode
        let mut debt_ratio = None;
        let mut remaining_income = None;
        let mut affordability = None;
        if let Some(income) = input.monthly_income {
            let assessment = evaluate_affordability(
                calc.total_monthly_payment,
                income,
                input.current_debts.unwrap_or(0.0),
                &self.config.debt_ratio,
            )?;
            warnings.extend(assessment.warnings.iter().cloned());
            debt_ratio = Some(assessment.debt_ratio);
            remaining_income = Some(assessment.remaining_income);
            affordability = Some(assessment.score);
        }

        let recommendations = self.recommendations(input, &calc, affordability);

        let calculated_at = Utc::now();
        let sequence = SIMULATION_SEQ.fetch_add(1, Ordering::Relaxed);
        Ok(SimulationResult {
            simulation_id: format!("SIM-{}-{}", calculated_at.timestamp_millis(), sequence),
            calculated_at,
            credit_type: input.credit_type,
            mode: input.mode,
            requested_amount: input.requested_amount,
            calculated_amount: calc.principal,
            total_financed: calc.principal + calc.processing_fees,
            monthly_payment: calc.monthly_payment,
            monthly_insurance: calc.monthly_insurance,
            total_monthly_payment: calc.total_monthly_payment,
            total_interest: calc.total_interest,
            total_insurance: calc.total_insurance,
            processing_fees: calc.processing_fees,
            total_cost: calc.total_cost,
            nominal_rate: calc.nominal_annual_rate,
            effective_rate: calc.effective_annual_rate,
            duration_months: calc.duration_months,
            debt_ratio,
            remaining_income,
            affordability,
            schedule: calc.schedule,
            warnings,
            recommendations,
        })
    }

    fn resolve_rate(&self, input: &SimulationInput) -> Result<f64> {
        let rate = input
            .annual_rate
            .unwrap_or_else(|| self.config.credit_type(input.credit_type).reference_annual_rate);
        if rate < 0.0 {
            return Err(SimulatorError::invalid(format!(
                "annual rate cannot be negative, got {rate}"
            )));
        }
        Ok(rate)
    }

    fn resolve_insurance(&self, input: &SimulationInput) -> Result<Option<f64>> {
        if !input.include_insurance {
            return Ok(None);
        }
        let rate = input
            .insurance_rate
            .unwrap_or_else(|| self.config.credit_type(input.credit_type).default_insurance_rate);
        if rate < 0.0 {
            return Err(SimulatorError::invalid("insurance rate cannot be negative"));
        }
        Ok(Some(rate))
    }

    fn resolve_fees(&self, input: &SimulationInput) -> Result<Option<f64>> {
        if !input.include_fees {
            return Ok(None);
        }
        let fees = input.processing_fees.unwrap_or(0.0);
        if fees < 0.0 {
            return Err(SimulatorError::invalid("processing fees cannot be negative"));
        }
        Ok(Some(fees))
    }

    fn solve_amount_mode(&self, input: &SimulationInput) -> Result<(f64, u32)> {
        let amount = input.requested_amount.ok_or_else(|| {
            SimulatorError::invalid("amount mode requires a requested amount")
        })?;
        Ok((amount, input.duration_months))
    }

    fn solve_payment_mode(
        &self,
        input: &SimulationInput,
        annual_rate: f64,
        monthly_insurance_rate: f64,
        warnings: &mut Vec<String>,
    ) -> Result<(f64, u32)> {
        let target = input.target_payment.ok_or_else(|| {
            SimulatorError::invalid("payment mode requires a target monthly payment")
        })?;

        if input.optimize_duration {
            let amount = input.requested_amount.ok_or_else(|| {
                SimulatorError::invalid(
                    "duration optimization requires a requested amount alongside the target payment",
                )
            })?;
            // The duration solve runs on the capital+interest budget, net of
            // the flat insurance premium on the requested amount
            let budget = target - amount * monthly_insurance_rate;
            let months = duration_for_payment(amount, budget, annual_rate)?;
            let max = self
                .config
                .credit_type(input.credit_type)
                .max_duration_months;
            if months > max {
                warn!("optimized duration {months} clamped to product maximum {max}");
                warnings.push(format!(
                    "a duration of {months} months would be needed; capped at the product maximum of {max}"
                ));
                return Ok((amount, max));
            }
            return Ok((amount, months));
        }

        let principal = self.principal_for_budget(
            target,
            annual_rate,
            input.duration_months,
            monthly_insurance_rate,
        )?;
        Ok((principal, input.duration_months))
    }

    fn solve_budget_mode(
        &self,
        input: &SimulationInput,
        annual_rate: f64,
        monthly_insurance_rate: f64,
        warnings: &mut Vec<String>,
    ) -> Result<(f64, u32)> {
        let income = input.monthly_income.ok_or_else(|| {
            SimulatorError::invalid("budget mode requires the monthly income")
        })?;
        let debts = input.current_debts.unwrap_or(0.0);

        let capacity =
            max_affordable_payment(income, debts, self.config.debt_ratio.maximum)?;
        warnings.push(format!(
            "repayment capacity of {capacity:.0} FCFA/month at a {:.0}% maximum debt ratio",
            self.config.debt_ratio.maximum
        ));

        let principal = self.principal_for_budget(
            capacity,
            annual_rate,
            input.duration_months,
            monthly_insurance_rate,
        )?;
        Ok((principal, input.duration_months))
    }

    /// Largest principal whose all-in payment (annuity plus flat insurance on
    /// initial capital) fits the given monthly budget
    fn principal_for_budget(
        &self,
        budget: f64,
        annual_rate: f64,
        months: u32,
        monthly_insurance_rate: f64,
    ) -> Result<f64> {
        let bare = principal_for_payment(budget, annual_rate, months)?;
        if monthly_insurance_rate == 0.0 {
            return Ok(bare);
        }
        // payment(P) = P * unit_annuity + P * ins_rate, linear in P
        let unit_annuity = annuity_payment(1.0, annual_rate / 12.0 / 100.0, months);
        Ok(budget / (unit_annuity + monthly_insurance_rate))
    }

    fn check_bounds(
        &self,
        credit_type: CreditType,
        principal: f64,
        duration: u32,
        warnings: &mut Vec<String>,
    ) {
        let bounds = self.config.credit_type(credit_type);
        if !bounds.amount_in_bounds(principal) {
            warnings.push(format!(
                "amount {principal:.0} FCFA is outside the product range {:.0}-{:.0}",
                bounds.min_amount, bounds.max_amount
            ));
        }
        if !bounds.duration_in_bounds(duration) {
            warnings.push(format!(
                "duration of {duration} months is outside the product range {}-{} months",
                bounds.min_duration_months, bounds.max_duration_months
            ));
        }
    }

    fn recommendations(
        &self,
        input: &SimulationInput,
        calc: &crate::amortization::CalculationResult,
        affordability: Option<AffordabilityScore>,
    ) -> Vec<String> {
        let mut recommendations = Vec::new();

        if matches!(
            affordability,
            Some(AffordabilityScore::Risky | AffordabilityScore::Critical)
        ) {
            recommendations.push(
                "reduce the requested amount or extend the duration to lower the monthly payment"
                    .to_string(),
            );
        }

        if !input.include_insurance {
            recommendations.push(
                "borrower insurance is not included; most lenders require it for this product"
                    .to_string(),
            );
        }

        if calc.total_interest > calc.principal * 0.5 {
            recommendations.push(format!(
                "interest amounts to {:.0}% of the borrowed capital; a shorter duration would cut the total cost",
                calc.total_interest / calc.principal * 100.0
            ));
        }

        recommendations
    }
}
