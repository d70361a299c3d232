//! Side-by-side comparison of bank loan offers
//!
//! Runs the same amortization request through every offer's pricing and
//! ranks the outcomes by effective rate, so offers with different fee and
//! insurance structures compare on a like-for-like basis.

use serde::{Deserialize, Serialize};

use crate::amortization::{compute_amortization, CalculationParams};
use crate::config::{CreditType, SolverSettings};
use crate::error::Result;

/// One bank's pricing for a credit product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanOffer {
    pub bank: String,
    pub product: String,
    pub credit_type: CreditType,
    /// Nominal annual rate, percent
    pub annual_rate: f64,
    /// Borrower-insurance rate, annual percent of initial capital
    pub insurance_rate: Option<f64>,
    /// One-off processing fees, FCFA
    pub processing_fees: Option<f64>,
}

/// The principal and duration every offer is evaluated against
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ComparisonRequest {
    pub amount: f64,
    pub duration_months: u32,
}

/// One offer's evaluated outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparedOffer {
    pub bank: String,
    pub product: String,
    pub monthly_payment: f64,
    pub total_monthly_payment: f64,
    pub total_interest: f64,
    pub total_cost: f64,
    /// APR-equivalent rate, percent; the ranking key
    pub effective_rate: f64,
    /// 1-based position after ranking
    pub rank: u32,
}

/// Evaluate and rank offers for a request, cheapest effective rate first
///
/// Offers that fail to price (e.g. fee structure invalid for the amount)
/// propagate their error rather than being silently dropped.
pub fn compare_offers(
    offers: &[LoanOffer],
    request: &ComparisonRequest,
    settings: &SolverSettings,
) -> Result<Vec<ComparedOffer>> {
    let mut compared = Vec::with_capacity(offers.len());

    for offer in offers {
        let params = CalculationParams {
            principal: request.amount,
            annual_rate: offer.annual_rate,
            duration_months: request.duration_months,
            insurance_rate: offer.insurance_rate,
            processing_fees: offer.processing_fees,
            down_payment: None,
        };
        let calc = compute_amortization(&params, settings)?;

        compared.push(ComparedOffer {
            bank: offer.bank.clone(),
            product: offer.product.clone(),
            monthly_payment: calc.monthly_payment,
            total_monthly_payment: calc.total_monthly_payment,
            total_interest: calc.total_interest,
            total_cost: calc.total_cost,
            effective_rate: calc.effective_annual_rate,
            rank: 0,
        });
    }

    compared.sort_by(|a, b| {
        a.effective_rate
            .partial_cmp(&b.effective_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for (i, offer) in compared.iter_mut().enumerate() {
        offer.rank = i as u32 + 1;
    }

    Ok(compared)
}
