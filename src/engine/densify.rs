use crate::core::edge::{OwnershipEdge, OwnershipLedger};
use crate::core::entity::EntityId;
use crate::engine::validate::ValidatedLedger;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// A ledger extended with explicit zero-percentage termination edges.
///
/// Invariant: for every `(owner, owned)` pair present at some snapshot of
/// `owned` and absent from the next, a zero edge exists at the date of
/// disappearance. Later as-of resolution then sees an explicit "ownership
/// ended" event instead of carrying the stale percentage forward — absence
/// alone would be ambiguous with "unchanged".
#[derive(Debug, Clone)]
pub struct DensifiedLedger(OwnershipLedger);

impl DensifiedLedger {
    pub fn ledger(&self) -> &OwnershipLedger {
        &self.0
    }
}

/// Densify a validated ledger.
pub fn densify(ledger: &ValidatedLedger) -> DensifiedLedger {
    DensifiedLedger(densify_edges(ledger.ledger()))
}

/// Insert zero-percentage edges for owners that disappear between
/// consecutive snapshots of the same owned entity.
///
/// Idempotent: a second pass finds no new disappearances, because the
/// synthesized zero edges keep every once-seen owner present at the
/// snapshot where it vanished.
pub fn densify_edges(ledger: &OwnershipLedger) -> OwnershipLedger {
    // owned -> date -> owners present at that snapshot
    let mut snapshots: BTreeMap<&EntityId, BTreeMap<NaiveDate, BTreeSet<&EntityId>>> =
        BTreeMap::new();
    for edge in ledger.edges() {
        snapshots
            .entry(edge.owned())
            .or_default()
            .entry(edge.date())
            .or_default()
            .insert(edge.owner());
    }

    let mut densified = ledger.clone();
    for (owned, by_date) in &snapshots {
        // A single observed date has no "next" snapshot to compare against.
        let mut previous: Option<&BTreeSet<&EntityId>> = None;
        for (date, owners) in by_date {
            if let Some(prev_owners) = previous {
                for owner in prev_owners.difference(owners) {
                    densified.add(OwnershipEdge::new(
                        (*owner).clone(),
                        (*owned).clone(),
                        *date,
                        0.0,
                    ));
                }
            }
            previous = Some(owners);
        }
    }
    densified.sort();
    densified
}
