use crate::core::entity::EntityId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single asserted ownership fact: `owner` holds `percentage` of `owned`
/// as of `date`.
///
/// This is the atomic unit of the ownership ledger. Edges are immutable
/// facts read from the input table; the engine never mutates an edge, it
/// only derives new rows from them.
///
/// Range and structural invariants (`percentage` in `[0, 1]`, no
/// self-ownership, per-date totals near 1.0) are enforced by the validator
/// stage, not by this constructor, so raw input rows can be represented
/// faithfully before being checked.
///
/// # Examples
///
/// ```
/// use ownership_engine::core::edge::OwnershipEdge;
/// use ownership_engine::core::entity::EntityId;
/// use chrono::NaiveDate;
///
/// let edge = OwnershipEdge::new(
///     EntityId::new("FAM-TRUST"),
///     EntityId::new("HOLDCO-01"),
///     NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
///     0.6,
/// );
///
/// assert_eq!(edge.percentage(), 0.6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipEdge {
    /// The owning entity.
    owner: EntityId,
    /// The owned entity.
    owned: EntityId,
    /// The date as of which this percentage is asserted.
    date: NaiveDate,
    /// Fraction of ownership, expected in `[0, 1]`.
    percentage: f64,
}

impl OwnershipEdge {
    /// Create a new ownership edge.
    pub fn new(owner: EntityId, owned: EntityId, date: NaiveDate, percentage: f64) -> Self {
        Self {
            owner,
            owned,
            date,
            percentage,
        }
    }

    // --- Accessors ---

    pub fn owner(&self) -> &EntityId {
        &self.owner
    }

    pub fn owned(&self) -> &EntityId {
        &self.owned
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    /// True if this edge records the end of an ownership relationship.
    ///
    /// The densifier synthesizes these when an owner disappears between
    /// two consecutive snapshots of the same owned entity.
    pub fn is_termination(&self) -> bool {
        self.percentage == 0.0
    }
}

/// The raw ownership ledger: an ordered collection of edges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OwnershipLedger {
    edges: Vec<OwnershipEdge>,
}

impl OwnershipLedger {
    pub fn new() -> Self {
        Self { edges: Vec::new() }
    }

    pub fn add(&mut self, edge: OwnershipEdge) {
        self.edges.push(edge);
    }

    pub fn edges(&self) -> &[OwnershipEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// All unique entities referenced in this ledger, as owner or owned.
    pub fn entities(&self) -> Vec<EntityId> {
        let mut entities: Vec<EntityId> = self
            .edges
            .iter()
            .flat_map(|e| vec![e.owner().clone(), e.owned().clone()])
            .collect();
        entities.sort();
        entities.dedup();
        entities
    }

    /// All distinct dates observed in this ledger, ascending.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.edges.iter().map(|e| e.date()).collect();
        dates.sort();
        dates.dedup();
        dates
    }

    /// Sort edges by (owned, date, owner) for deterministic output.
    pub fn sort(&mut self) {
        self.edges.sort_by(|a, b| {
            (a.owned(), a.date(), a.owner()).cmp(&(b.owned(), b.date(), b.owner()))
        });
    }
}

impl FromIterator<OwnershipEdge> for OwnershipLedger {
    fn from_iter<T: IntoIterator<Item = OwnershipEdge>>(iter: T) -> Self {
        Self {
            edges: iter.into_iter().collect(),
        }
    }
}
