use crate::accounts::metadata::AccountBook;
use crate::core::entity::EntityId;
use crate::core::timeline::OwnershipTimeline;
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Base account names longer than this are truncated before the
/// percentage suffix is appended, matching the downstream loader's
/// display-name limit.
const NAME_LIMIT: usize = 90;

/// One synthetic split account: an owner's proportional share of a
/// jointly-owned base account.
///
/// Regenerated from the timeline and account metadata on every run; the
/// deterministic `{base_account_id}_{owner}` id makes regeneration
/// idempotent across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitRecord {
    /// Deterministic split account id: `{base_account_id}_{owner}`.
    pub account_id: String,
    /// The jointly-owned base account.
    pub base_account_id: String,
    /// The owning entity this split belongs to.
    pub owner: EntityId,
    /// Display name: base account name plus the formatted percentage.
    pub account_name: String,
    pub currency: String,
    /// Later of the base account's opened date and the first ownership
    /// date — a split cannot open before either.
    pub date_opened: NaiveDate,
    pub rep_code: Option<String>,
    pub custodian: Option<String>,
    pub advisory_scope: Option<String>,
    /// Most recent effective ownership percentage for this pair.
    pub effective_percentage: f64,
    /// Earliest date the pair appeared in the pre-collapse timeline.
    pub first_ownership_date: NaiveDate,
    /// Full `(date, percentage)` history for the downstream
    /// ownership loader, ascending by date.
    pub percentage_history: Vec<(NaiveDate, f64)>,
}

/// Generate split accounts from collapsed ownership rows and account
/// metadata.
///
/// `current` is the cutoff-collapsed table and supplies the percentages;
/// `timeline` is the pre-collapse change timeline and supplies the true
/// first-seen date per pair, which collapsing intentionally discards.
/// Owned entities with no account metadata are skipped with a debug
/// notice — they are upstream entities (holding companies, trusts) that
/// have no account to split.
pub fn generate_splits(
    current: &OwnershipTimeline,
    timeline: &OwnershipTimeline,
    book: &AccountBook,
) -> Vec<SplitRecord> {
    let first_seen = timeline.first_seen();

    // Per-pair percentage history from the collapsed table, in date order.
    let mut history: BTreeMap<(EntityId, EntityId), Vec<(NaiveDate, f64)>> = BTreeMap::new();
    for record in current.records() {
        history
            .entry((record.owner.clone(), record.owned.clone()))
            .or_default()
            .push((record.date, record.percentage));
    }

    let mut splits = Vec::new();
    for ((owner, owned), mut rows) in history {
        let base = match book.get(&owned) {
            Some(base) => base,
            None => {
                debug!("no account metadata for {}, skipping split", owned);
                continue;
            }
        };

        rows.sort_by_key(|&(date, _)| date);
        let (latest_date, effective_percentage) = *rows.last().expect("history is non-empty");
        let first_ownership_date = first_seen
            .get(&(owner.clone(), owned.clone()))
            .copied()
            .unwrap_or(latest_date);

        let display_name: String = base.account_name.chars().take(NAME_LIMIT).collect();
        splits.push(SplitRecord {
            account_id: format!("{}_{}", base.account_id, owner),
            base_account_id: base.account_id.clone(),
            owner: owner.clone(),
            account_name: format!("{} - {:.2}%", display_name, effective_percentage * 100.0),
            currency: base.currency.clone(),
            date_opened: base.opened_date.max(first_ownership_date),
            rep_code: base.rep_code.clone(),
            custodian: base.custodian.clone(),
            advisory_scope: base.advisory_scope.clone(),
            effective_percentage,
            first_ownership_date,
            percentage_history: rows,
        });
    }

    splits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::metadata::AccountRecord;
    use crate::core::timeline::OwnershipRecord;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(owner: &str, owned: &str, d: NaiveDate, pct: f64) -> OwnershipRecord {
        OwnershipRecord::new(EntityId::new(owner), EntityId::new(owned), d, pct)
    }

    fn account(id: &str, name: &str, opened: NaiveDate) -> AccountRecord {
        AccountRecord {
            account_id: id.to_string(),
            account_name: name.to_string(),
            currency: "USD".to_string(),
            opened_date: opened,
            rep_code: Some("R-7".to_string()),
            custodian: None,
            advisory_scope: None,
        }
    }

    #[test]
    fn test_one_split_per_owner() {
        let current: OwnershipTimeline = vec![
            record("A", "ACC-1", date(2020, 1, 1), 0.6),
            record("C", "ACC-1", date(2020, 1, 1), 0.4),
        ]
        .into_iter()
        .collect();
        let book: AccountBook =
            vec![account("ACC-1", "Shared Venture", date(2018, 1, 1))].into_iter().collect();

        let splits = generate_splits(&current, &current, &book);
        assert_eq!(splits.len(), 2);
        assert_eq!(splits[0].account_id, "ACC-1_A");
        assert_eq!(splits[1].account_id, "ACC-1_C");
        assert_eq!(splits[0].account_name, "Shared Venture - 60.00%");
    }

    #[test]
    fn test_percentage_from_collapsed_first_date_from_timeline() {
        // Pre-collapse timeline saw the pair in 2019; the collapsed table
        // carries only the cutoff-dated row with the latest percentage.
        let timeline: OwnershipTimeline = vec![
            record("A", "ACC-1", date(2019, 3, 1), 0.5),
            record("A", "ACC-1", date(2019, 9, 1), 0.7),
        ]
        .into_iter()
        .collect();
        let current: OwnershipTimeline =
            vec![record("A", "ACC-1", date(2020, 1, 1), 0.7)].into_iter().collect();
        let book: AccountBook =
            vec![account("ACC-1", "Shared Venture", date(2018, 1, 1))].into_iter().collect();

        let splits = generate_splits(&current, &timeline, &book);
        assert_eq!(splits.len(), 1);
        assert_eq!(splits[0].effective_percentage, 0.7);
        assert_eq!(splits[0].first_ownership_date, date(2019, 3, 1));
    }

    #[test]
    fn test_date_opened_is_later_of_opened_and_first_ownership() {
        let current: OwnershipTimeline =
            vec![record("A", "ACC-1", date(2019, 6, 1), 1.0)].into_iter().collect();
        let book: AccountBook =
            vec![account("ACC-1", "Shared Venture", date(2020, 2, 1))].into_iter().collect();

        let splits = generate_splits(&current, &current, &book);
        assert_eq!(splits[0].date_opened, date(2020, 2, 1));
        assert_eq!(splits[0].first_ownership_date, date(2019, 6, 1));
    }

    #[test]
    fn test_unknown_owned_entity_is_skipped() {
        // HOLDCO-9 is an intermediate entity with no account to split.
        let current: OwnershipTimeline = vec![
            record("A", "ACC-1", date(2020, 1, 1), 1.0),
            record("A", "HOLDCO-9", date(2020, 1, 1), 1.0),
        ]
        .into_iter()
        .collect();
        let book: AccountBook =
            vec![account("ACC-1", "Shared Venture", date(2018, 1, 1))].into_iter().collect();

        let splits = generate_splits(&current, &current, &book);
        assert_eq!(splits.len(), 1);
        assert_eq!(splits[0].base_account_id, "ACC-1");
    }

    #[test]
    fn test_history_is_date_ordered() {
        let current: OwnershipTimeline = vec![
            record("A", "ACC-1", date(2020, 6, 1), 0.8),
            record("A", "ACC-1", date(2020, 1, 1), 0.6),
        ]
        .into_iter()
        .collect();
        let book: AccountBook =
            vec![account("ACC-1", "Shared Venture", date(2018, 1, 1))].into_iter().collect();

        let splits = generate_splits(&current, &current, &book);
        assert_eq!(
            splits[0].percentage_history,
            vec![(date(2020, 1, 1), 0.6), (date(2020, 6, 1), 0.8)]
        );
        assert_eq!(splits[0].effective_percentage, 0.8);
    }

    #[test]
    fn test_long_names_are_truncated() {
        let long_name = "X".repeat(120);
        let current: OwnershipTimeline =
            vec![record("A", "ACC-1", date(2020, 1, 1), 0.5)].into_iter().collect();
        let book: AccountBook =
            vec![account("ACC-1", &long_name, date(2018, 1, 1))].into_iter().collect();

        let splits = generate_splits(&current, &current, &book);
        assert_eq!(splits[0].account_name, format!("{} - 50.00%", "X".repeat(90)));
    }
}
