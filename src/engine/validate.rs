use crate::core::edge::{OwnershipEdge, OwnershipLedger};
use crate::core::entity::EntityId;
use chrono::NaiveDate;
use log::warn;
use std::collections::BTreeMap;
use thiserror::Error;

/// Allowed deviation of the per-(owned, date) percentage sum from 1.0.
pub const OWNERSHIP_SUM_TOLERANCE: f64 = 0.02;

/// Severity policy for the sum-to-100% checks.
///
/// Out-of-range percentages and self-ownership are always hard failures;
/// only over/under-ownership severity is configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Over/under-owned entities abort the run. The default.
    #[default]
    Strict,
    /// Over/under-owned entities are logged and the run continues.
    Lenient,
}

/// Errors raised by ledger validation.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("percentage {percentage} for {owner} -> {owned} on {date} is outside [0, 1]")]
    InvalidPercentage {
        owner: EntityId,
        owned: EntityId,
        date: NaiveDate,
        percentage: f64,
    },
    #[error("{entity} owns itself on {date}")]
    SelfOwnership { entity: EntityId, date: NaiveDate },
    #[error("{owned} is over-owned on {date}: total {total}")]
    OverOwned {
        owned: EntityId,
        date: NaiveDate,
        total: f64,
    },
    #[error("{owned} is under-owned on {date}: total {total}")]
    UnderOwned {
        owned: EntityId,
        date: NaiveDate,
        total: f64,
    },
}

/// A ledger that has passed validation.
///
/// Duplicate `(owner, owned, date)` rows have been aggregated, every edge
/// is structurally sound, and per-date totals are within tolerance (or
/// were waved through in lenient mode).
#[derive(Debug, Clone)]
pub struct ValidatedLedger(OwnershipLedger);

impl ValidatedLedger {
    pub fn ledger(&self) -> &OwnershipLedger {
        &self.0
    }
}

/// Validate a raw ownership ledger.
///
/// 1. Duplicate `(owner, owned, date)` rows are summed — a pair may be
///    reported as two partial stakes on the same date.
/// 2. Each aggregated edge must have `owner != owned` and a percentage
///    in `[0, 1]`.
/// 3. Per `(owned, date)`, percentages must sum to `1.0 ± 0.02`. In
///    `Strict` mode a violation aborts; in `Lenient` mode it is logged
///    and the run continues.
///
/// Pure: no I/O beyond the warning log in lenient mode.
pub fn validate(
    ledger: &OwnershipLedger,
    mode: ValidationMode,
) -> Result<ValidatedLedger, ValidationError> {
    // Aggregate duplicates. BTreeMap keeps the output deterministic.
    let mut aggregated: BTreeMap<(EntityId, EntityId, NaiveDate), f64> = BTreeMap::new();
    for edge in ledger.edges() {
        *aggregated
            .entry((edge.owner().clone(), edge.owned().clone(), edge.date()))
            .or_insert(0.0) += edge.percentage();
    }

    let mut totals: BTreeMap<(EntityId, NaiveDate), f64> = BTreeMap::new();
    for ((owner, owned, date), &percentage) in &aggregated {
        if owner == owned {
            return Err(ValidationError::SelfOwnership {
                entity: owner.clone(),
                date: *date,
            });
        }
        if !(0.0..=1.0).contains(&percentage) {
            return Err(ValidationError::InvalidPercentage {
                owner: owner.clone(),
                owned: owned.clone(),
                date: *date,
                percentage,
            });
        }
        *totals.entry((owned.clone(), *date)).or_insert(0.0) += percentage;
    }

    for ((owned, date), &total) in &totals {
        let violation = if total > 1.0 + OWNERSHIP_SUM_TOLERANCE {
            Some(ValidationError::OverOwned {
                owned: owned.clone(),
                date: *date,
                total,
            })
        } else if total < 1.0 - OWNERSHIP_SUM_TOLERANCE {
            Some(ValidationError::UnderOwned {
                owned: owned.clone(),
                date: *date,
                total,
            })
        } else {
            None
        };

        if let Some(violation) = violation {
            match mode {
                ValidationMode::Strict => return Err(violation),
                ValidationMode::Lenient => warn!("{}", violation),
            }
        }
    }

    let mut validated: OwnershipLedger = aggregated
        .into_iter()
        .map(|((owner, owned, date), percentage)| OwnershipEdge::new(owner, owned, date, percentage))
        .collect();
    validated.sort();
    Ok(ValidatedLedger(validated))
}
