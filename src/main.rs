//! ownership-engine CLI
//!
//! Run ownership resolution from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Validate a raw ownership ledger
//! ownership-engine validate --ledger ownership.csv
//!
//! # Resolve the effective-ownership timeline, collapsed at a cutoff
//! ownership-engine resolve --ledger ownership.csv --cutoff 2020-01-01
//!
//! # Generate split accounts from a ledger plus account metadata
//! ownership-engine splits --ledger ownership.csv --accounts accounts.csv \
//!     --cutoff 2020-01-01 --out-dir out/
//!
//! # Generate a random ledger for testing
//! ownership-engine generate --accounts 20 --snapshots 4
//! ```

use chrono::NaiveDate;
use ownership_engine::accounts::splits::generate_splits;
use ownership_engine::core::timeline::{OwnershipRecord, OwnershipTimeline};
use ownership_engine::engine::compress::compress;
use ownership_engine::engine::cutoff::collapse;
use ownership_engine::engine::densify::densify;
use ownership_engine::engine::validate::{validate, ValidationMode};
use ownership_engine::io::tabular;
use ownership_engine::simulation::generator::{generate_random_ledger, LedgerConfig};
use std::path::Path;
use std::process;

fn print_usage() {
    eprintln!(
        r#"ownership-engine — effective-ownership resolution for split account structures

USAGE:
    ownership-engine <COMMAND> [OPTIONS]

COMMANDS:
    validate    Validate a raw ownership ledger
    resolve     Compute the effective-ownership timeline
    splits      Generate split accounts from a ledger and account metadata
    generate    Generate a random ownership ledger (for testing)
    help        Show this message

OPTIONS (validate, resolve, splits):
    --ledger <FILE>     Path to the ownership CSV (Owner, Owned, Date, Percentage)
    --mode <MODE>       Validation mode: strict (default) or lenient

OPTIONS (resolve):
    --cutoff <DATE>     Collapse history at this date (YYYY-MM-DD)
    --format <FORMAT>   Output format: csv (default) or json
    --output <FILE>     Write to file instead of stdout

OPTIONS (splits):
    --accounts <FILE>   Path to the account metadata CSV
    --cutoff <DATE>     Cutoff date (YYYY-MM-DD), required
    --out-dir <DIR>     Output directory (default: current directory)

OPTIONS (generate):
    --accounts <N>      Number of owned accounts (default: 10)
    --owners <N>        Number of root owners (default: 6)
    --snapshots <N>     Number of snapshot dates (default: 3)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    ownership-engine validate --ledger ownership.csv --mode lenient
    ownership-engine resolve --ledger ownership.csv --cutoff 2020-01-01
    ownership-engine splits --ledger ownership.csv --accounts accounts.csv --cutoff 2020-01-01
    ownership-engine generate --accounts 20 --snapshots 4 --output test.csv"#
    );
}

fn parse_mode(value: &str) -> ValidationMode {
    match value {
        "strict" => ValidationMode::Strict,
        "lenient" => ValidationMode::Lenient,
        other => {
            eprintln!("Unknown validation mode '{}': expected strict or lenient", other);
            process::exit(1);
        }
    }
}

fn parse_date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap_or_else(|e| {
        eprintln!("Invalid date '{}': {} (expected YYYY-MM-DD)", value, e);
        process::exit(1);
    })
}

fn require(option: Option<String>, flag: &str) -> String {
    option.unwrap_or_else(|| {
        eprintln!("Error: {} is required", flag);
        process::exit(1);
    })
}

/// Load, validate, densify and compress a ledger file.
fn load_timeline(path: &str, mode: ValidationMode) -> OwnershipTimeline {
    let ledger = tabular::read_ledger_file(path).unwrap_or_else(|e| {
        eprintln!("Error reading '{}': {}", path, e);
        process::exit(1);
    });
    let validated = validate(&ledger, mode).unwrap_or_else(|e| {
        eprintln!("Validation failed: {}", e);
        process::exit(1);
    });
    compress(&densify(&validated))
}

fn cmd_validate(args: &[String]) {
    let mut ledger_path = None;
    let mut mode = ValidationMode::Strict;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--ledger" => {
                i += 1;
                ledger_path = args.get(i).cloned();
            }
            "--mode" => {
                i += 1;
                mode = parse_mode(args.get(i).map(String::as_str).unwrap_or(""));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = require(ledger_path, "--ledger <FILE>");
    let ledger = tabular::read_ledger_file(&path).unwrap_or_else(|e| {
        eprintln!("Error reading '{}': {}", path, e);
        process::exit(1);
    });

    match validate(&ledger, mode) {
        Ok(validated) => {
            println!(
                "OK: {} edges across {} entities and {} dates",
                validated.ledger().len(),
                validated.ledger().entities().len(),
                validated.ledger().dates().len()
            );
        }
        Err(e) => {
            eprintln!("Validation failed: {}", e);
            process::exit(1);
        }
    }
}

#[derive(serde::Serialize)]
struct TimelineRowOutput {
    owner: String,
    owned: String,
    date: String,
    percentage: f64,
}

fn cmd_resolve(args: &[String]) {
    let mut ledger_path = None;
    let mut cutoff = None;
    let mut mode = ValidationMode::Strict;
    let mut format = "csv".to_string();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--ledger" => {
                i += 1;
                ledger_path = args.get(i).cloned();
            }
            "--cutoff" => {
                i += 1;
                cutoff = args.get(i).map(|s| parse_date(s));
            }
            "--mode" => {
                i += 1;
                mode = parse_mode(args.get(i).map(String::as_str).unwrap_or(""));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'csv' or 'json'");
                    process::exit(1);
                });
            }
            "--output" => {
                i += 1;
                output_path = args.get(i).cloned();
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = require(ledger_path, "--ledger <FILE>");
    let timeline = load_timeline(&path, mode);
    let timeline = match cutoff {
        Some(cutoff) => collapse(&timeline, cutoff).current,
        None => timeline,
    };

    match format.as_str() {
        "json" => {
            let rows: Vec<TimelineRowOutput> = timeline
                .records()
                .iter()
                .map(|r| TimelineRowOutput {
                    owner: r.owner.to_string(),
                    owned: r.owned.to_string(),
                    date: r.date.to_string(),
                    percentage: r.percentage,
                })
                .collect();
            let json = serde_json::to_string_pretty(&rows).unwrap_or_else(|e| {
                eprintln!("Error serializing timeline: {}", e);
                process::exit(1);
            });
            match output_path {
                Some(out) => std::fs::write(&out, json).unwrap_or_else(|e| {
                    eprintln!("Error writing to '{}': {}", out, e);
                    process::exit(1);
                }),
                None => println!("{}", json),
            }
        }
        "csv" => match output_path {
            Some(out) => tabular::write_timeline_file(&out, &timeline).unwrap_or_else(|e| {
                eprintln!("Error writing to '{}': {}", out, e);
                process::exit(1);
            }),
            None => tabular::write_timeline(std::io::stdout(), &timeline).unwrap_or_else(|e| {
                eprintln!("Error writing timeline: {}", e);
                process::exit(1);
            }),
        },
        other => {
            eprintln!("Unknown format '{}': expected csv or json", other);
            process::exit(1);
        }
    }
}

fn cmd_splits(args: &[String]) {
    let mut ledger_path = None;
    let mut accounts_path = None;
    let mut cutoff = None;
    let mut mode = ValidationMode::Strict;
    let mut out_dir = ".".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--ledger" => {
                i += 1;
                ledger_path = args.get(i).cloned();
            }
            "--accounts" => {
                i += 1;
                accounts_path = args.get(i).cloned();
            }
            "--cutoff" => {
                i += 1;
                cutoff = args.get(i).map(|s| parse_date(s));
            }
            "--mode" => {
                i += 1;
                mode = parse_mode(args.get(i).map(String::as_str).unwrap_or(""));
            }
            "--out-dir" => {
                i += 1;
                out_dir = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--out-dir requires a directory path");
                    process::exit(1);
                });
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let ledger_path = require(ledger_path, "--ledger <FILE>");
    let accounts_path = require(accounts_path, "--accounts <FILE>");
    let cutoff = cutoff.unwrap_or_else(|| {
        eprintln!("Error: --cutoff <DATE> is required");
        process::exit(1);
    });

    let book = tabular::read_accounts_file(&accounts_path).unwrap_or_else(|e| {
        eprintln!("Error reading '{}': {}", accounts_path, e);
        process::exit(1);
    });

    let timeline = load_timeline(&ledger_path, mode);
    let collapsed = collapse(&timeline, cutoff);
    let splits = generate_splits(&collapsed.current, &timeline, &book);

    let dir = Path::new(&out_dir);
    let check = |name: &str, result: Result<(), tabular::TabularError>| {
        if let Err(e) = result {
            eprintln!("Error writing {}: {}", name, e);
            process::exit(1);
        }
    };
    check(
        "Timeline.csv",
        tabular::write_timeline_file(dir.join("Timeline.csv"), &collapsed.current),
    );
    check(
        "SplitAccounts.csv",
        tabular::write_splits_file(dir.join("SplitAccounts.csv"), &splits),
    );
    check(
        "SplitOwnership.csv",
        tabular::write_split_history_file(dir.join("SplitOwnership.csv"), &splits),
    );

    println!(
        "Wrote {} splits for {} timeline rows to {}",
        splits.len(),
        collapsed.current.len(),
        out_dir
    );
}

fn cmd_generate(args: &[String]) {
    let mut config = LedgerConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--accounts" => {
                i += 1;
                config.account_count =
                    args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                        eprintln!("--accounts requires a number");
                        process::exit(1);
                    });
            }
            "--owners" => {
                i += 1;
                config.owner_count = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--owners requires a number");
                    process::exit(1);
                });
            }
            "--snapshots" => {
                i += 1;
                config.snapshot_count =
                    args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                        eprintln!("--snapshots requires a number");
                        process::exit(1);
                    });
            }
            "--output" => {
                i += 1;
                output_path = args.get(i).cloned();
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let ledger = generate_random_ledger(&config);
    // Raw edges share the timeline schema, so the timeline writer
    // serves here too.
    let timeline: OwnershipTimeline = ledger
        .edges()
        .iter()
        .map(|e| {
            OwnershipRecord::new(e.owner().clone(), e.owned().clone(), e.date(), e.percentage())
        })
        .collect();

    match output_path {
        Some(out) => {
            tabular::write_timeline_file(&out, &timeline).unwrap_or_else(|e| {
                eprintln!("Error writing to '{}': {}", out, e);
                process::exit(1);
            });
            println!(
                "Generated {} edges across {} entities: {}",
                ledger.len(),
                ledger.entities().len(),
                out
            );
        }
        None => {
            tabular::write_timeline(std::io::stdout(), &timeline).unwrap_or_else(|e| {
                eprintln!("Error writing ledger: {}", e);
                process::exit(1);
            });
        }
    }
}

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "validate" => cmd_validate(rest),
        "resolve" => cmd_resolve(rest),
        "splits" => cmd_splits(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
