use crate::core::entity::EntityId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of the effective-ownership timeline.
///
/// Field names serialize to the tabular column names used by the
/// surrounding import/export shims (`Owner`, `Owned`, `Date`, `Percentage`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipRecord {
    #[serde(rename = "Owner")]
    pub owner: EntityId,
    #[serde(rename = "Owned")]
    pub owned: EntityId,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Percentage")]
    pub percentage: f64,
}

impl OwnershipRecord {
    pub fn new(owner: EntityId, owned: EntityId, date: NaiveDate, percentage: f64) -> Self {
        Self {
            owner,
            owned,
            date,
            percentage,
        }
    }
}

/// The change-compressed effective-ownership time series.
///
/// Each row represents either a newly appeared relationship or a changed
/// percentage relative to the previous resolved snapshot for that pair.
/// Unchanged relationships emit no row, so the timeline is proportional to
/// the number of changes in the ownership structure, not `dates × pairs`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OwnershipTimeline {
    records: Vec<OwnershipRecord>,
}

impl OwnershipTimeline {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: OwnershipRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[OwnershipRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest date at which each `(owner, owned)` pair appears.
    ///
    /// The split-account generator consults this on the pre-collapse
    /// timeline, since collapsing rewrites dates to the cutoff.
    pub fn first_seen(&self) -> HashMap<(EntityId, EntityId), NaiveDate> {
        let mut first: HashMap<(EntityId, EntityId), NaiveDate> = HashMap::new();
        for record in &self.records {
            let key = (record.owner.clone(), record.owned.clone());
            first
                .entry(key)
                .and_modify(|d| {
                    if record.date < *d {
                        *d = record.date;
                    }
                })
                .or_insert(record.date);
        }
        first
    }

    /// Sort rows by (owned, date, owner) for deterministic output.
    pub fn sort(&mut self) {
        self.records.sort_by(|a, b| {
            (&a.owned, a.date, &a.owner).cmp(&(&b.owned, b.date, &b.owner))
        });
    }
}

impl FromIterator<OwnershipRecord> for OwnershipTimeline {
    fn from_iter<T: IntoIterator<Item = OwnershipRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
