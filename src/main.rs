//! Credit Simulator CLI
//!
//! Command-line interface for running credit simulations

use anyhow::Context;
use clap::{Parser, ValueEnum};
use credit_simulator::{
    CreditType, SimulationInput, SimulationMode, SimulationResult, Simulator,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Known amount, compute the payment
    Amount,
    /// Known target payment, compute the amount
    Payment,
    /// Known income, compute what is affordable
    Budget,
}

impl From<ModeArg> for SimulationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Amount => SimulationMode::Amount,
            ModeArg::Payment => SimulationMode::Payment,
            ModeArg::Budget => SimulationMode::Budget,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CreditTypeArg {
    Consumer,
    Vehicle,
    RealEstate,
    Equipment,
}

impl From<CreditTypeArg> for CreditType {
    fn from(credit_type: CreditTypeArg) -> Self {
        match credit_type {
            CreditTypeArg::Consumer => CreditType::Consumer,
            CreditTypeArg::Vehicle => CreditType::Vehicle,
            CreditTypeArg::RealEstate => CreditType::RealEstate,
            CreditTypeArg::Equipment => CreditType::Equipment,
        }
    }
}

/// Simulate a credit: amortization schedule, total cost, effective rate,
/// and affordability
#[derive(Debug, Parser)]
#[command(name = "credit_simulator", version)]
struct Args {
    /// What to solve for
    #[arg(long, value_enum, default_value = "amount")]
    mode: ModeArg,

    /// Credit product family
    #[arg(long, value_enum, default_value = "consumer")]
    credit_type: CreditTypeArg,

    /// Requested amount in FCFA
    #[arg(long)]
    amount: Option<f64>,

    /// Duration in months
    #[arg(long, default_value_t = 48)]
    duration: u32,

    /// Target monthly payment in FCFA (payment mode)
    #[arg(long)]
    target_payment: Option<f64>,

    /// Net monthly income in FCFA (budget mode, or to rate affordability)
    #[arg(long)]
    income: Option<f64>,

    /// Existing monthly debt payments in FCFA
    #[arg(long)]
    debts: Option<f64>,

    /// Nominal annual rate in percent; defaults to the product's reference rate
    #[arg(long)]
    rate: Option<f64>,

    /// Include borrower insurance at the product's default rate
    #[arg(long)]
    insurance: bool,

    /// Processing fees in FCFA
    #[arg(long)]
    fees: Option<f64>,

    /// In payment mode, solve for the duration instead of the amount
    #[arg(long)]
    optimize_duration: bool,

    /// Print the full result as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Write the full schedule to a CSV file
    #[arg(long)]
    csv: Option<std::path::PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let input = SimulationInput {
        credit_type: args.credit_type.into(),
        mode: args.mode.into(),
        requested_amount: args.amount,
        duration_months: args.duration,
        target_payment: args.target_payment,
        monthly_income: args.income,
        current_debts: args.debts,
        annual_rate: args.rate,
        insurance_rate: None,
        processing_fees: args.fees,
        include_insurance: args.insurance,
        include_fees: args.fees.is_some(),
        optimize_duration: args.optimize_duration,
    };

    let simulator = Simulator::new();
    let result = simulator.simulate(&input)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }

    if let Some(path) = &args.csv {
        write_schedule_csv(&result, path)
            .with_context(|| format!("writing schedule to {}", path.display()))?;
        println!("\nFull schedule written to: {}", path.display());
    }

    Ok(())
}

fn print_result(result: &SimulationResult) {
    println!("Credit Simulator v0.1.0");
    println!("=======================\n");

    println!("Simulation {} ({:?} mode, {:?})", result.simulation_id, result.mode, result.credit_type);
    println!("  Amount financed:  {:>15.0} FCFA", result.calculated_amount);
    println!("  Duration:         {:>15} months", result.duration_months);
    println!("  Nominal rate:     {:>15.2} %", result.nominal_rate);
    println!("  Effective rate:   {:>15.2} %", result.effective_rate);
    println!("  Monthly payment:  {:>15.0} FCFA", result.monthly_payment);
    if result.monthly_insurance > 0.0 {
        println!("  Insurance:        {:>15.0} FCFA/month", result.monthly_insurance);
        println!("  All-in payment:   {:>15.0} FCFA", result.total_monthly_payment);
    }
    println!("  Total interest:   {:>15.0} FCFA", result.total_interest);
    println!("  Total cost:       {:>15.0} FCFA", result.total_cost);

    if let (Some(ratio), Some(remaining)) = (result.debt_ratio, result.remaining_income) {
        println!("  Debt ratio:       {:>15.1} %", ratio);
        println!("  Remaining income: {:>15.0} FCFA", remaining);
    }
    if let Some(score) = result.affordability {
        println!("  Affordability:    {:>15}", format!("{score:?}"));
    }

    for warning in &result.warnings {
        println!("  ! {warning}");
    }
    for recommendation in &result.recommendations {
        println!("  > {recommendation}");
    }

    println!("\nAmortization schedule ({} months):", result.schedule.len());
    println!(
        "{:>5} {:>14} {:>12} {:>12} {:>12} {:>15}",
        "Month", "Payment", "Capital", "Interest", "Insurance", "Remaining"
    );
    println!("{}", "-".repeat(75));

    for row in result.schedule.iter().take(24) {
        println!(
            "{:>5} {:>14.2} {:>12.2} {:>12.2} {:>12.2} {:>15.2}",
            row.month,
            row.payment,
            row.capital,
            row.interest,
            row.insurance.unwrap_or(0.0),
            row.remaining_capital,
        );
    }
    if result.schedule.len() > 24 {
        println!("... ({} more months)", result.schedule.len() - 24);
    }
}

fn write_schedule_csv(result: &SimulationResult, path: &std::path::Path) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "month",
        "payment",
        "capital",
        "interest",
        "insurance",
        "remaining_capital",
        "cumulative_interest",
        "cumulative_capital",
    ])?;

    for row in &result.schedule {
        writer.write_record([
            row.month.to_string(),
            format!("{:.2}", row.payment),
            format!("{:.2}", row.capital),
            format!("{:.2}", row.interest),
            format!("{:.2}", row.insurance.unwrap_or(0.0)),
            format!("{:.2}", row.remaining_capital),
            format!("{:.2}", row.cumulative_interest),
            format!("{:.2}", row.cumulative_capital),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
