//! Split-account generation example.
//!
//! Demonstrates collapsing an ownership timeline at a cutoff date and
//! generating the proportional split accounts for a jointly-owned
//! account.

use chrono::NaiveDate;
use ownership_engine::accounts::metadata::{AccountBook, AccountRecord};
use ownership_engine::accounts::splits::generate_splits;
use ownership_engine::core::edge::{OwnershipEdge, OwnershipLedger};
use ownership_engine::core::entity::EntityId;
use ownership_engine::engine::compress::compress;
use ownership_engine::engine::cutoff::collapse;
use ownership_engine::engine::densify::densify;
use ownership_engine::engine::validate::{validate, ValidationMode};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn edge(owner: &str, owned: &str, d: NaiveDate, pct: f64) -> OwnershipEdge {
    OwnershipEdge::new(EntityId::new(owner), EntityId::new(owned), d, pct)
}

fn main() {
    println!("╔═══════════════════════════════════════════════╗");
    println!("║  ownership-engine: Split Accounts Example     ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    // A jointly-owned account whose split shifts over two years.
    let ledger: OwnershipLedger = vec![
        edge("FAM-TRUST", "ACC-1", date(2019, 3, 1), 0.5),
        edge("PARTNER", "ACC-1", date(2019, 3, 1), 0.5),
        edge("FAM-TRUST", "ACC-1", date(2019, 9, 1), 0.7),
        edge("PARTNER", "ACC-1", date(2019, 9, 1), 0.3),
        edge("FAM-TRUST", "ACC-1", date(2020, 6, 1), 0.8),
        edge("PARTNER", "ACC-1", date(2020, 6, 1), 0.2),
    ]
    .into_iter()
    .collect();

    let book: AccountBook = vec![AccountRecord {
        account_id: "ACC-1".to_string(),
        account_name: "Shared Venture".to_string(),
        currency: "USD".to_string(),
        opened_date: date(2018, 5, 1),
        rep_code: Some("R-100".to_string()),
        custodian: Some("Pershing".to_string()),
        advisory_scope: Some("Discretionary".to_string()),
    }]
    .into_iter()
    .collect();

    let validated = validate(&ledger, ValidationMode::Strict).expect("ledger is valid");
    let timeline = compress(&densify(&validated));

    let cutoff = date(2020, 1, 1);
    let collapsed = collapse(&timeline, cutoff);

    println!("Cutoff: {}\n", cutoff);
    println!("Collapsed timeline:");
    for record in collapsed.current.records() {
        println!(
            "  {}  {} -> {}  {:>6.2}%",
            record.date,
            record.owner,
            record.owned,
            record.percentage * 100.0
        );
    }
    println!("\nPre-cutoff history collapses to one row per pair at the");
    println!("cutoff; the June 2020 change passes through untouched.\n");

    let splits = generate_splits(&collapsed.current, &timeline, &book);

    println!("Generated split accounts:");
    for split in &splits {
        println!("  {} ({})", split.account_id, split.account_name);
        println!("    currency:        {}", split.currency);
        println!("    date opened:     {}", split.date_opened);
        println!("    first ownership: {}", split.first_ownership_date);
        println!("    history:");
        for (d, pct) in &split.percentage_history {
            println!("      {}  {:>6.2}%", d, pct * 100.0);
        }
    }
}
