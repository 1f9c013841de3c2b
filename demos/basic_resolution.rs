//! Basic effective-ownership resolution example.
//!
//! Demonstrates how the engine turns a raw ownership ledger into the
//! resolved, multi-level effective ownership timeline.

use chrono::NaiveDate;
use ownership_engine::core::edge::{OwnershipEdge, OwnershipLedger};
use ownership_engine::core::entity::EntityId;
use ownership_engine::engine::compress::compress;
use ownership_engine::engine::densify::densify;
use ownership_engine::engine::resolve::resolve;
use ownership_engine::engine::validate::{validate, ValidationMode};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn main() {
    println!("╔═══════════════════════════════════════════════╗");
    println!("║  ownership-engine: Basic Resolution Example   ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    // --- Scenario 1: Direct and indirect ownership ---
    println!("━━━ Scenario 1: Two-level ownership ━━━\n");

    let mut ledger = OwnershipLedger::new();
    let trust = EntityId::new("FAM-TRUST");
    let holdco = EntityId::new("HOLDCO");
    let partner = EntityId::new("PARTNER");
    let account = EntityId::new("ACC-1");

    ledger.add(OwnershipEdge::new(trust.clone(), account.clone(), date(2020, 1, 1), 0.6));
    ledger.add(OwnershipEdge::new(holdco.clone(), account.clone(), date(2020, 1, 1), 0.4));
    ledger.add(OwnershipEdge::new(trust.clone(), holdco.clone(), date(2020, 1, 1), 0.5));
    ledger.add(OwnershipEdge::new(partner.clone(), holdco.clone(), date(2020, 1, 1), 0.5));

    println!("Ledger:");
    for edge in ledger.edges() {
        println!(
            "  {} owns {:>6.2}% of {} as of {}",
            edge.owner(),
            edge.percentage() * 100.0,
            edge.owned(),
            edge.date()
        );
    }
    println!();

    let validated = validate(&ledger, ValidationMode::Strict).expect("ledger is valid");
    let densified = densify(&validated);
    let matrix = resolve(&densified, date(2020, 1, 1));

    println!("Effective ownership of {}:", account);
    for (owner, stake) in matrix.owners_of(&account) {
        println!("  {:<10} {:>6.2}%", owner.to_string(), stake * 100.0);
    }
    println!("\nThe trust's 60% direct stake gains another 20% through its");
    println!("half of HOLDCO (50% x 40%), for 80% effective ownership.\n");

    // --- Scenario 2: Ownership changing over time ---
    println!("━━━ Scenario 2: Change timeline ━━━\n");

    ledger.add(OwnershipEdge::new(trust.clone(), account.clone(), date(2020, 3, 1), 1.0));
    // HOLDCO is absent from the March snapshot; densification records
    // its exit automatically.

    let validated = validate(&ledger, ValidationMode::Strict).expect("ledger is valid");
    let timeline = compress(&densify(&validated));

    println!("Compressed timeline ({} rows):", timeline.len());
    for record in timeline.records() {
        println!(
            "  {}  {} -> {}  {:>6.2}%",
            record.date,
            record.owner,
            record.owned,
            record.percentage * 100.0
        );
    }
    println!("\nOnly changed pairs are re-emitted on later dates.");
}
