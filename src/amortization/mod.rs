//! Loan amortization: schedule types, the amortization engine, and the
//! effective-rate (APR) solver

pub mod effective_rate;
pub mod engine;
pub mod schedule;

pub use effective_rate::effective_annual_rate;
pub use engine::{compute_amortization, CalculationParams};
pub use schedule::{AmortizationPayment, CalculationResult, ScheduleSummary};
