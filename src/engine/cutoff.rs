use crate::core::entity::EntityId;
use crate::core::timeline::{OwnershipRecord, OwnershipTimeline};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Result of collapsing a timeline at a cutoff date.
#[derive(Debug, Clone, Default)]
pub struct CollapsedTimeline {
    /// Post-cutoff rows unchanged, plus one collapsed row per pair for
    /// everything at or before the cutoff, dated exactly at the cutoff.
    pub current: OwnershipTimeline,
    /// Rows strictly before the cutoff, kept for audit and traceability.
    /// Not consumed by the split generator.
    pub historical: OwnershipTimeline,
}

/// Collapse all history at or before `cutoff` into a single known state.
///
/// Rows dated after the cutoff pass through untouched. Rows at or before
/// it are grouped by `(owner, owned)`; the latest row per pair survives
/// with its date rewritten to exactly `cutoff`. Applying the collapse a
/// second time at the same cutoff is a no-op.
pub fn collapse(timeline: &OwnershipTimeline, cutoff: NaiveDate) -> CollapsedTimeline {
    let mut latest_prior: BTreeMap<(EntityId, EntityId), (NaiveDate, f64)> = BTreeMap::new();
    let mut current = OwnershipTimeline::new();
    let mut historical = OwnershipTimeline::new();

    for record in timeline.records() {
        if record.date > cutoff {
            current.push(record.clone());
            continue;
        }
        if record.date < cutoff {
            historical.push(record.clone());
        }
        let key = (record.owner.clone(), record.owned.clone());
        match latest_prior.get(&key) {
            Some(&(existing, _)) if existing > record.date => {}
            _ => {
                latest_prior.insert(key, (record.date, record.percentage));
            }
        }
    }

    for ((owner, owned), (_, percentage)) in latest_prior {
        current.push(OwnershipRecord::new(owner, owned, cutoff, percentage));
    }

    current.sort();
    historical.sort();
    CollapsedTimeline {
        current,
        historical,
    }
}
