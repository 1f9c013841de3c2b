use crate::core::edge::OwnershipLedger;
use crate::core::entity::EntityId;
use crate::engine::densify::DensifiedLedger;
use chrono::NaiveDate;
use log::warn;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Direct stakes below this are dropped at as-of selection: they would
/// contribute nothing and pollute the node set.
pub const DIRECT_STAKE_FLOOR: f64 = 1e-6;

/// Effective stakes below this are treated as accumulated floating noise
/// and omitted from the reported matrix.
pub const REPORT_FLOOR: f64 = 1e-7;

/// The power iteration stops once the largest entry of the next term
/// falls below this residual.
pub const RESIDUAL_FLOOR: f64 = 1e-9;

/// Effective stakes are rounded to this many decimal places for
/// reporting stability.
const REPORT_DECIMALS: i32 = 6;

/// The effective (direct + indirect) ownership matrix for one as-of date.
///
/// Sparse: only pairs with a stake above [`REPORT_FLOOR`] are stored,
/// keyed by entity id directly — ownership graphs are sparse relative to
/// the entity universe, so no dense index is built.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnershipMatrix {
    as_of: NaiveDate,
    stakes: BTreeMap<(EntityId, EntityId), f64>,
    capped: bool,
}

impl OwnershipMatrix {
    /// The date this matrix was resolved for.
    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    /// Effective stake `owner` holds in `owned`, zero if absent.
    pub fn stake(&self, owner: &EntityId, owned: &EntityId) -> f64 {
        self.stakes
            .get(&(owner.clone(), owned.clone()))
            .copied()
            .unwrap_or(0.0)
    }

    /// All `(owner, owned) -> stake` entries, in deterministic order.
    pub fn entries(&self) -> impl Iterator<Item = (&(EntityId, EntityId), f64)> {
        self.stakes.iter().map(|(k, &v)| (k, v))
    }

    /// All owners of `owned` with their effective stakes.
    pub fn owners_of(&self, owned: &EntityId) -> Vec<(&EntityId, f64)> {
        self.stakes
            .iter()
            .filter(|((_, d), _)| d == owned)
            .map(|((o, _), &v)| (o, v))
            .collect()
    }

    /// Entities that own at least one other entity but are owned by none.
    ///
    /// These are the ultimate beneficial owners; on an acyclic fully-owned
    /// graph their stakes in any entity sum to ~1.
    pub fn root_owners(&self) -> Vec<&EntityId> {
        let owned: BTreeSet<&EntityId> = self.stakes.keys().map(|(_, d)| d).collect();
        let mut roots: Vec<&EntityId> = self
            .stakes
            .keys()
            .map(|(o, _)| o)
            .filter(|o| !owned.contains(*o))
            .collect();
        roots.sort();
        roots.dedup();
        roots
    }

    pub fn len(&self) -> usize {
        self.stakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stakes.is_empty()
    }

    /// True if the power iteration hit its node-count cap while the
    /// residual term was still above [`RESIDUAL_FLOOR`]. Indicates a
    /// modeling error or an extreme ownership cycle in the input; the
    /// reported stakes are the bounded accumulation up to the cap.
    pub fn hit_iteration_cap(&self) -> bool {
        self.capped
    }
}

/// Resolve the effective ownership matrix for one as-of date.
///
/// 1. As-of selection: per `(owner, owned)` pair, the latest edge with
///    `date <= as_of` wins; pairs resolving below [`DIRECT_STAKE_FLOOR`]
///    are dropped.
/// 2. Closure: accumulate `M1 + M1^2 + ...` over the sparse direct
///    matrix. All ownership paths contribute additively — owning 10% of a
///    10%-owner is a 1% stake on top of any direct holding — which is why
///    this is a summed closure, not a shortest-path search.
///
/// Cycles are legal: the iteration count is capped at the node count, so
/// the computation always terminates. See
/// [`OwnershipMatrix::hit_iteration_cap`].
pub fn resolve(ledger: &DensifiedLedger, as_of: NaiveDate) -> OwnershipMatrix {
    resolve_edges(ledger.ledger(), as_of)
}

pub(crate) fn resolve_edges(ledger: &OwnershipLedger, as_of: NaiveDate) -> OwnershipMatrix {
    // Last-write-wins selection per pair.
    let mut selected: HashMap<(EntityId, EntityId), (NaiveDate, f64)> = HashMap::new();
    for edge in ledger.edges() {
        if edge.date() > as_of {
            continue;
        }
        let key = (edge.owner().clone(), edge.owned().clone());
        let candidate = (edge.date(), edge.percentage());
        match selected.get(&key) {
            Some(&(existing_date, _)) if existing_date > candidate.0 => {}
            _ => {
                selected.insert(key, candidate);
            }
        }
    }

    // Sparse direct matrix: owner -> owned -> percentage.
    let mut direct: BTreeMap<EntityId, BTreeMap<EntityId, f64>> = BTreeMap::new();
    let mut nodes: BTreeSet<EntityId> = BTreeSet::new();
    for ((owner, owned), (_, percentage)) in selected {
        if percentage <= DIRECT_STAKE_FLOOR {
            continue;
        }
        nodes.insert(owner.clone());
        nodes.insert(owned.clone());
        direct.entry(owner).or_default().insert(owned, percentage);
    }

    let node_count = nodes.len();
    let mut result: BTreeMap<(EntityId, EntityId), f64> = BTreeMap::new();
    for (owner, row) in &direct {
        for (owned, &pct) in row {
            result.insert((owner.clone(), owned.clone()), pct);
        }
    }

    // Power accumulation: each round extends every chain by one hop.
    let mut capped = false;
    let mut current = direct.clone();
    for round in 0..node_count {
        let next = compose(&current, &direct);
        let residual = next
            .values()
            .flat_map(|row| row.values())
            .fold(0.0f64, |acc, &v| acc.max(v));
        if residual < RESIDUAL_FLOOR {
            break;
        }
        for (owner, row) in &next {
            for (owned, &pct) in row {
                *result
                    .entry((owner.clone(), owned.clone()))
                    .or_insert(0.0) += pct;
            }
        }
        current = next;
        if round + 1 == node_count {
            capped = true;
            warn!(
                "ownership closure hit the {}-iteration cap as of {} with residual {:.3e}",
                node_count, as_of, residual
            );
        }
    }

    let stakes: BTreeMap<(EntityId, EntityId), f64> = result
        .into_iter()
        .filter(|&(_, pct)| pct > REPORT_FLOOR)
        .map(|(key, pct)| (key, round_to_decimals(pct, REPORT_DECIMALS)))
        .collect();

    OwnershipMatrix {
        as_of,
        stakes,
        capped,
    }
}

/// One composition step: `next[a][c] = sum_b current[a][b] * direct[b][c]`.
fn compose(
    current: &BTreeMap<EntityId, BTreeMap<EntityId, f64>>,
    direct: &BTreeMap<EntityId, BTreeMap<EntityId, f64>>,
) -> BTreeMap<EntityId, BTreeMap<EntityId, f64>> {
    let mut next: BTreeMap<EntityId, BTreeMap<EntityId, f64>> = BTreeMap::new();
    for (owner, row) in current {
        for (middle, &through) in row {
            if let Some(onward) = direct.get(middle) {
                let target = next.entry(owner.clone()).or_default();
                for (owned, &stake) in onward {
                    *target.entry(owned.clone()).or_insert(0.0) += through * stake;
                }
            }
        }
    }
    next
}

fn round_to_decimals(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
