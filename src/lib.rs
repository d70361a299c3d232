//! Credit Simulator - Amortization and savings simulation engine for FCFA banking products
//!
//! This library provides:
//! - Fixed-payment loan amortization schedules with interest/capital splits
//! - Effective-rate (APR-equivalent) computation over fee- and insurance-inclusive cashflows
//! - Reverse solvers (principal from payment, duration from payment, budget capacity)
//! - Savings growth projections with configurable compounding
//! - Debt-ratio evaluation and qualitative affordability scoring
//! - Side-by-side comparison of bank offers

pub mod affordability;
pub mod amortization;
pub mod comparison;
pub mod config;
pub mod error;
pub mod savings;
pub mod simulator;
pub mod solver;

// Re-export commonly used types
pub use affordability::{evaluate_affordability, AffordabilityAssessment, AffordabilityScore};
pub use amortization::{compute_amortization, AmortizationPayment, CalculationParams, CalculationResult};
pub use comparison::{compare_offers, ComparedOffer, ComparisonRequest, LoanOffer};
pub use config::{CreditType, CreditTypeConfig, DebtRatioThresholds, SimulatorConfig, SolverSettings};
pub use error::{Result, SimulatorError};
pub use savings::{project_savings, CompoundingFrequency, SavingsProjection, SavingsRow};
pub use simulator::{SimulationInput, SimulationMode, SimulationResult, Simulator};
pub use solver::{duration_for_payment, max_affordable_payment, principal_for_payment};
