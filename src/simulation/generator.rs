//! Random ledger generation for stress testing.
//!
//! Produces layered, acyclic ownership ledgers whose per-date totals sum
//! to 1.0, so generated data always passes strict validation.

use crate::core::edge::{OwnershipEdge, OwnershipLedger};
use crate::core::entity::EntityId;
use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;

/// Configuration for generating a random ownership ledger.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Number of owned (account) entities.
    pub account_count: usize,
    /// Number of root owner entities (never themselves owned).
    pub owner_count: usize,
    /// Number of snapshot dates.
    pub snapshot_count: usize,
    /// First snapshot date.
    pub start_date: NaiveDate,
    /// Days between consecutive snapshots.
    pub snapshot_spacing_days: i64,
    /// Maximum owners per account at any snapshot.
    pub max_owners_per_account: usize,
    /// Probability that an account's structure changes at each later
    /// snapshot.
    pub reshuffle_probability: f64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            account_count: 10,
            owner_count: 6,
            snapshot_count: 3,
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            snapshot_spacing_days: 30,
            max_owners_per_account: 3,
            reshuffle_probability: 0.3,
        }
    }
}

/// Generate a random ownership ledger.
///
/// Accounts may be owned by root owners or by lower-indexed accounts,
/// which yields multi-level chains while staying acyclic. Every owned
/// entity's percentages sum to exactly 1.0 at each snapshot it appears
/// in.
pub fn generate_random_ledger(config: &LedgerConfig) -> OwnershipLedger {
    let mut rng = rand::thread_rng();
    let mut ledger = OwnershipLedger::new();

    let owners: Vec<EntityId> = (0..config.owner_count)
        .map(|i| EntityId::new(format!("OWN-{:03}", i)))
        .collect();
    let accounts: Vec<EntityId> = (0..config.account_count)
        .map(|i| EntityId::new(format!("ACC-{:03}", i)))
        .collect();

    for account_idx in 0..accounts.len() {
        let mut date = config.start_date;
        for snapshot in 0..config.snapshot_count {
            let unchanged = snapshot > 0 && rng.gen::<f64>() >= config.reshuffle_probability;
            if !unchanged {
                // Candidates: the owner pool plus lower-indexed accounts
                // (keeps the graph acyclic).
                let mut candidates: Vec<EntityId> = owners.clone();
                candidates.extend(accounts[..account_idx].iter().cloned());
                candidates.shuffle(&mut rng);

                let owner_count = rng
                    .gen_range(1..=config.max_owners_per_account)
                    .min(candidates.len());
                let weights = random_weights(&mut rng, owner_count);
                for (owner, weight) in candidates.into_iter().zip(weights) {
                    ledger.add(OwnershipEdge::new(
                        owner,
                        accounts[account_idx].clone(),
                        date,
                        weight,
                    ));
                }
            }
            date += Duration::days(config.snapshot_spacing_days);
        }
    }

    ledger.sort();
    ledger
}

/// `count` positive weights summing to exactly 1.0. Empty for zero
/// owners, which happens when an account has no candidate pool at all.
fn random_weights<R: Rng>(rng: &mut R, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let raw: Vec<f64> = (0..count).map(|_| rng.gen_range(0.5..1.0)).collect();
    let total: f64 = raw.iter().sum();
    let mut weights: Vec<f64> = raw
        .iter()
        .take(count - 1)
        .map(|w| ((w / total) * 10_000.0).round() / 10_000.0)
        .collect();
    let allocated: f64 = weights.iter().sum();
    weights.push(((1.0 - allocated) * 10_000.0).round() / 10_000.0);
    weights
}
