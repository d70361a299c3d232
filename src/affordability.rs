//! Debt-ratio evaluation and qualitative affordability scoring

use serde::{Deserialize, Serialize};

use crate::config::DebtRatioThresholds;
use crate::error::{Result, SimulatorError};

/// Slack on threshold comparisons: a ratio derived from a capacity sized at
/// the maximum comes back from the annuity round-trip a few ulps off, and
/// that noise must not read as a breach
const THRESHOLD_EPSILON: f64 = 1e-9;

/// Ordered qualitative rating of a borrower's debt load
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AffordabilityScore {
    Excellent,
    Good,
    Acceptable,
    Risky,
    Critical,
}

impl AffordabilityScore {
    /// Band a debt ratio (percent of income) against the configured
    /// thresholds
    pub fn from_debt_ratio(debt_ratio: f64, thresholds: &DebtRatioThresholds) -> Self {
        // Upper band edges are inclusive: a loan sized at exactly the
        // maximum ratio is still acceptable, not risky
        if debt_ratio < thresholds.excellent {
            Self::Excellent
        } else if debt_ratio < thresholds.recommended {
            Self::Good
        } else if debt_ratio <= thresholds.maximum + THRESHOLD_EPSILON {
            Self::Acceptable
        } else if debt_ratio <= thresholds.critical + THRESHOLD_EPSILON {
            Self::Risky
        } else {
            Self::Critical
        }
    }
}

/// Outcome of an affordability evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityAssessment {
    /// (payment + current debts) / income, percent
    pub debt_ratio: f64,
    /// Income left after the new payment and existing debts
    pub remaining_income: f64,
    pub score: AffordabilityScore,
    /// Non-fatal findings, e.g. ratio above the recommended ceiling
    pub warnings: Vec<String>,
}

/// Evaluate a payment against a borrower's income and existing debts
///
/// Warnings fire when the ratio crosses the recommended or maximum
/// thresholds; only non-positive income or negative amounts are hard errors.
pub fn evaluate_affordability(
    monthly_payment: f64,
    monthly_income: f64,
    current_debts: f64,
    thresholds: &DebtRatioThresholds,
) -> Result<AffordabilityAssessment> {
    if monthly_income <= 0.0 {
        return Err(SimulatorError::invalid(format!(
            "monthly income must be positive, got {monthly_income}"
        )));
    }
    if monthly_payment <= 0.0 {
        return Err(SimulatorError::invalid(format!(
            "monthly payment must be positive, got {monthly_payment}"
        )));
    }
    if current_debts < 0.0 {
        return Err(SimulatorError::invalid("current debts cannot be negative"));
    }

    let committed = monthly_payment + current_debts;
    let debt_ratio = committed / monthly_income * 100.0;
    let remaining_income = monthly_income - committed;
    let score = AffordabilityScore::from_debt_ratio(debt_ratio, thresholds);

    // Exceeds means strictly above: a ratio sitting exactly on a threshold
    // does not breach it
    let mut warnings = Vec::new();
    if debt_ratio > thresholds.maximum + THRESHOLD_EPSILON {
        warnings.push(format!(
            "debt ratio {debt_ratio:.1}% exceeds the maximum threshold of {:.0}%",
            thresholds.maximum
        ));
    } else if debt_ratio > thresholds.recommended {
        warnings.push(format!(
            "debt ratio {debt_ratio:.1}% exceeds the recommended threshold of {:.0}%",
            thresholds.recommended
        ));
    }
    if remaining_income < 0.0 {
        warnings.push("committed payments exceed monthly income".to_string());
    }

    Ok(AffordabilityAssessment {
        debt_ratio,
        remaining_income,
        score,
        warnings,
    })
}
