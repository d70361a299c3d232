//! Rank a demo set of bank offers across several durations
//!
//! Outputs one ranked table per duration for comparison with the rates
//! published by the banks.

use credit_simulator::{
    compare_offers, ComparisonRequest, CreditType, LoanOffer, SolverSettings,
};
use rayon::prelude::*;
use std::fs::File;
use std::io::Write;
use std::time::Instant;

fn demo_offers() -> Vec<LoanOffer> {
    vec![
        LoanOffer {
            bank: "BGFI Bank".to_string(),
            product: "Crédit Habitat".to_string(),
            credit_type: CreditType::RealEstate,
            annual_rate: 6.90,
            insurance_rate: Some(0.45),
            processing_fees: Some(150_000.0),
        },
        LoanOffer {
            bank: "UGB".to_string(),
            product: "Prêt Immobilier".to_string(),
            credit_type: CreditType::RealEstate,
            annual_rate: 6.50,
            insurance_rate: Some(0.45),
            processing_fees: Some(250_000.0),
        },
        LoanOffer {
            bank: "Orabank".to_string(),
            product: "Immo Plus".to_string(),
            credit_type: CreditType::RealEstate,
            annual_rate: 7.20,
            insurance_rate: Some(0.36),
            processing_fees: None,
        },
        LoanOffer {
            bank: "BICIG".to_string(),
            product: "Logement Confort".to_string(),
            credit_type: CreditType::RealEstate,
            annual_rate: 6.75,
            insurance_rate: Some(0.50),
            processing_fees: Some(100_000.0),
        },
    ]
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let amount = 25_000_000.0;
    let durations = [120_u32, 180, 240];
    let offers = demo_offers();
    let settings = SolverSettings::default();

    println!("Comparing {} offers on {:.0} FCFA...", offers.len(), amount);
    let start = Instant::now();

    // One ranking per duration, evaluated in parallel
    let rankings: Vec<_> = durations
        .par_iter()
        .map(|&duration_months| {
            let request = ComparisonRequest {
                amount,
                duration_months,
            };
            compare_offers(&offers, &request, &settings).map(|ranked| (duration_months, ranked))
        })
        .collect::<Result<_, _>>()?;

    println!("Evaluated in {:?}\n", start.elapsed());

    for (duration, ranked) in &rankings {
        println!("Duration: {duration} months");
        println!(
            "{:>4} {:<12} {:<20} {:>12} {:>12} {:>14} {:>9}",
            "Rank", "Bank", "Product", "Payment", "All-in", "Total cost", "APR"
        );
        println!("{}", "-".repeat(90));
        for offer in ranked {
            println!(
                "{:>4} {:<12} {:<20} {:>12.0} {:>12.0} {:>14.0} {:>8.2}%",
                offer.rank,
                offer.bank,
                offer.product,
                offer.monthly_payment,
                offer.total_monthly_payment,
                offer.total_cost,
                offer.effective_rate,
            );
        }
        println!();
    }

    // Write all rankings to CSV
    let csv_path = "offer_comparison.csv";
    let mut file = File::create(csv_path)?;
    writeln!(
        file,
        "duration_months,rank,bank,product,monthly_payment,total_monthly_payment,total_interest,total_cost,effective_rate"
    )?;
    for (duration, ranked) in &rankings {
        for offer in ranked {
            writeln!(
                file,
                "{},{},{},{},{:.2},{:.2},{:.2},{:.2},{:.4}",
                duration,
                offer.rank,
                offer.bank,
                offer.product,
                offer.monthly_payment,
                offer.total_monthly_payment,
                offer.total_interest,
                offer.total_cost,
                offer.effective_rate,
            )?;
        }
    }
    println!("Full comparison written to: {csv_path}");

    Ok(())
}
