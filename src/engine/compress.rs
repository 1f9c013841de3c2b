use crate::core::timeline::{OwnershipRecord, OwnershipTimeline};
use crate::engine::densify::DensifiedLedger;
use crate::engine::resolve::{resolve, OwnershipMatrix};

/// Tolerance for deciding that a pair's effective percentage changed
/// between consecutive snapshots. Absolute, tolerant comparison — exact
/// float equality would re-emit rows purely from noise accumulated
/// through repeated matrix products.
pub const CHANGE_TOLERANCE: f64 = 1e-6;

/// Compress the per-date snapshot sequence into a sparse change timeline.
///
/// For each distinct ledger date in ascending order, the full effective
/// matrix is resolved and diffed against the previous date's *full*
/// matrix (not the previous compressed output — full state must be
/// retained across iterations for correct comparison). A pair is emitted
/// when it is new or its percentage moved by more than
/// [`CHANGE_TOLERANCE`]. The first date emits its entire resolved state.
pub fn compress(ledger: &DensifiedLedger) -> OwnershipTimeline {
    let mut timeline = OwnershipTimeline::new();
    let mut previous: Option<OwnershipMatrix> = None;

    for date in ledger.ledger().dates() {
        let matrix = resolve(ledger, date);
        if matrix.is_empty() {
            continue;
        }

        for ((owner, owned), percentage) in matrix.entries() {
            let changed = match &previous {
                None => true,
                Some(prev) => {
                    let before = prev.stake(owner, owned);
                    (percentage - before).abs() > CHANGE_TOLERANCE
                }
            };
            if changed {
                timeline.push(OwnershipRecord::new(
                    owner.clone(),
                    owned.clone(),
                    date,
                    percentage,
                ));
            }
        }

        previous = Some(matrix);
    }

    timeline.sort();
    timeline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::edge::{OwnershipEdge, OwnershipLedger};
    use crate::core::entity::EntityId;
    use crate::engine::densify::densify;
    use crate::engine::validate::{validate, ValidationMode};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn edge(owner: &str, owned: &str, d: NaiveDate, pct: f64) -> OwnershipEdge {
        OwnershipEdge::new(EntityId::new(owner), EntityId::new(owned), d, pct)
    }

    fn pipeline(edges: Vec<OwnershipEdge>) -> DensifiedLedger {
        let ledger: OwnershipLedger = edges.into_iter().collect();
        let validated = validate(&ledger, ValidationMode::Lenient).unwrap();
        densify(&validated)
    }

    #[test]
    fn test_first_date_emits_full_state() {
        let densified = pipeline(vec![
            edge("A", "B", date(2020, 1, 1), 0.6),
            edge("C", "B", date(2020, 1, 1), 0.4),
        ]);
        let timeline = compress(&densified);
        assert_eq!(timeline.len(), 2);
    }

    #[test]
    fn test_unchanged_pairs_emit_nothing() {
        // The same structure restated across three dates compresses to
        // exactly the first date's rows.
        let densified = pipeline(vec![
            edge("A", "B", date(2020, 1, 1), 0.6),
            edge("C", "B", date(2020, 1, 1), 0.4),
            edge("A", "B", date(2020, 2, 1), 0.6),
            edge("C", "B", date(2020, 2, 1), 0.4),
            edge("A", "B", date(2020, 3, 1), 0.6),
            edge("C", "B", date(2020, 3, 1), 0.4),
        ]);
        let timeline = compress(&densified);
        assert_eq!(timeline.len(), 2);
        assert!(timeline.records().iter().all(|r| r.date == date(2020, 1, 1)));
    }

    #[test]
    fn test_changed_percentage_is_emitted() {
        let densified = pipeline(vec![
            edge("A", "B", date(2020, 1, 1), 0.6),
            edge("C", "B", date(2020, 1, 1), 0.4),
            edge("A", "B", date(2020, 2, 1), 0.7),
            edge("C", "B", date(2020, 2, 1), 0.3),
        ]);
        let timeline = compress(&densified);
        assert_eq!(timeline.len(), 4);
        let february: Vec<_> = timeline
            .records()
            .iter()
            .filter(|r| r.date == date(2020, 2, 1))
            .collect();
        assert_eq!(february.len(), 2);
    }

    #[test]
    fn test_indirect_change_propagates() {
        // D's stake in A changes in February; only the derived D rows
        // and the changed direct edge are re-emitted.
        let densified = pipeline(vec![
            edge("A", "B", date(2020, 1, 1), 1.0),
            edge("D", "A", date(2020, 1, 1), 0.5),
            edge("E", "A", date(2020, 1, 1), 0.5),
            edge("D", "A", date(2020, 2, 1), 0.6),
            edge("E", "A", date(2020, 2, 1), 0.4),
        ]);
        let timeline = compress(&densified);
        let february: Vec<_> = timeline
            .records()
            .iter()
            .filter(|r| r.date == date(2020, 2, 1))
            .collect();
        // D->A, E->A (direct changes) plus D->B, E->B (derived changes);
        // A->B is untouched and not re-emitted.
        assert_eq!(february.len(), 4);
        assert!(february
            .iter()
            .all(|r| !(r.owner.as_str() == "A" && r.owned.as_str() == "B")));
    }

    #[test]
    fn test_terminated_pair_vanishes_from_later_snapshots() {
        // After densification A's stake resolves to zero in February and
        // the pair simply leaves the matrix; no zero row is emitted.
        let densified = pipeline(vec![
            edge("A", "B", date(2020, 1, 1), 0.5),
            edge("C", "B", date(2020, 1, 1), 0.5),
            edge("C", "B", date(2020, 2, 1), 1.0),
        ]);
        let timeline = compress(&densified);
        let a_rows: Vec<_> = timeline
            .records()
            .iter()
            .filter(|r| r.owner.as_str() == "A")
            .collect();
        assert_eq!(a_rows.len(), 1);
        assert_eq!(a_rows[0].date, date(2020, 1, 1));
    }

    #[test]
    fn test_empty_ledger_compresses_empty() {
        let densified = pipeline(vec![]);
        let timeline = compress(&densified);
        assert!(timeline.is_empty());
    }
}
