use crate::accounts::metadata::{AccountBook, AccountRecord};
use crate::accounts::splits::SplitRecord;
use crate::core::edge::{OwnershipEdge, OwnershipLedger};
use crate::core::timeline::{OwnershipRecord, OwnershipTimeline};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

/// Errors from tabular import/export.
#[derive(Debug, Error)]
pub enum TabularError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read a raw ownership ledger from CSV with columns
/// `Owner, Owned, Date, Percentage` (dates as `YYYY-MM-DD`, percentages
/// as decimal fractions).
pub fn read_ledger<R: Read>(reader: R) -> Result<OwnershipLedger, TabularError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut ledger = OwnershipLedger::new();
    for row in csv_reader.deserialize() {
        let row: OwnershipRecord = row?;
        ledger.add(OwnershipEdge::new(row.owner, row.owned, row.date, row.percentage));
    }
    Ok(ledger)
}

pub fn read_ledger_file(path: impl AsRef<Path>) -> Result<OwnershipLedger, TabularError> {
    read_ledger(File::open(path)?)
}

/// Read account metadata from CSV. Requires `Account ID, Account Name,
/// Currency, Opened Date`; `Rep Code`, `Custodian` and `Advisory Scope`
/// are optional columns.
pub fn read_accounts<R: Read>(reader: R) -> Result<AccountBook, TabularError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut book = AccountBook::new();
    for row in csv_reader.deserialize() {
        let record: AccountRecord = row?;
        book.insert(record);
    }
    Ok(book)
}

pub fn read_accounts_file(path: impl AsRef<Path>) -> Result<AccountBook, TabularError> {
    read_accounts(File::open(path)?)
}

/// Write the effective-ownership timeline as a flat CSV table.
pub fn write_timeline<W: Write>(
    writer: W,
    timeline: &OwnershipTimeline,
) -> Result<(), TabularError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in timeline.records() {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_timeline_file(
    path: impl AsRef<Path>,
    timeline: &OwnershipTimeline,
) -> Result<(), TabularError> {
    write_timeline(File::create(path)?, timeline)
}

#[derive(Serialize)]
struct SplitAccountRow<'a> {
    #[serde(rename = "Account ID")]
    account_id: &'a str,
    #[serde(rename = "Account Name")]
    account_name: &'a str,
    #[serde(rename = "Client ID")]
    client_id: &'a str,
    #[serde(rename = "Currency")]
    currency: &'a str,
    #[serde(rename = "Date Opened")]
    date_opened: NaiveDate,
    #[serde(rename = "Rep Code")]
    rep_code: Option<&'a str>,
    #[serde(rename = "Custodian")]
    custodian: Option<&'a str>,
    #[serde(rename = "Advisory Scope")]
    advisory_scope: Option<&'a str>,
    #[serde(rename = "Effective Percentage")]
    effective_percentage: f64,
    #[serde(rename = "First Ownership Date")]
    first_ownership_date: NaiveDate,
}

/// Write split-account rows for the downstream account-structure loader.
pub fn write_splits<W: Write>(writer: W, splits: &[SplitRecord]) -> Result<(), TabularError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for split in splits {
        csv_writer.serialize(SplitAccountRow {
            account_id: &split.account_id,
            account_name: &split.account_name,
            client_id: split.owner.as_str(),
            currency: &split.currency,
            date_opened: split.date_opened,
            rep_code: split.rep_code.as_deref(),
            custodian: split.custodian.as_deref(),
            advisory_scope: split.advisory_scope.as_deref(),
            effective_percentage: split.effective_percentage,
            first_ownership_date: split.first_ownership_date,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_splits_file(
    path: impl AsRef<Path>,
    splits: &[SplitRecord],
) -> Result<(), TabularError> {
    write_splits(File::create(path)?, splits)
}

#[derive(Serialize)]
struct SplitOwnershipRow<'a> {
    #[serde(rename = "Account ID")]
    account_id: &'a str,
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Percentage")]
    percentage: f64,
}

/// Write the per-date ownership history of each split account, the
/// input the downstream ownership loader replays.
pub fn write_split_history<W: Write>(
    writer: W,
    splits: &[SplitRecord],
) -> Result<(), TabularError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for split in splits {
        for &(date, percentage) in &split.percentage_history {
            csv_writer.serialize(SplitOwnershipRow {
                account_id: &split.account_id,
                date,
                percentage,
            })?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_split_history_file(
    path: impl AsRef<Path>,
    splits: &[SplitRecord],
) -> Result<(), TabularError> {
    write_split_history(File::create(path)?, splits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::EntityId;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_read_ledger_csv() {
        let input = "\
Owner,Owned,Date,Percentage
FAM-TRUST,ACC-1,2020-01-01,0.6
HOLDCO,ACC-1,2020-01-01,0.4
";
        let ledger = read_ledger(input.as_bytes()).unwrap();
        assert_eq!(ledger.len(), 2);
        let first = &ledger.edges()[0];
        assert_eq!(first.owner().as_str(), "FAM-TRUST");
        assert_eq!(first.date(), date(2020, 1, 1));
        assert_eq!(first.percentage(), 0.6);
    }

    #[test]
    fn test_read_ledger_rejects_bad_date() {
        let input = "\
Owner,Owned,Date,Percentage
A,B,01/02/2020,0.6
";
        assert!(read_ledger(input.as_bytes()).is_err());
    }

    #[test]
    fn test_read_accounts_with_optional_columns() {
        let input = "\
Account ID,Account Name,Currency,Opened Date
ACC-1,Shared Venture,USD,2018-05-01
";
        let book = read_accounts(input.as_bytes()).unwrap();
        let record = book.get(&EntityId::new("ACC-1")).unwrap();
        assert_eq!(record.currency, "USD");
        assert!(record.rep_code.is_none());
    }

    #[test]
    fn test_timeline_round_trip() {
        let timeline: OwnershipTimeline = vec![OwnershipRecord::new(
            EntityId::new("A"),
            EntityId::new("B"),
            date(2020, 1, 1),
            0.6,
        )]
        .into_iter()
        .collect();

        let mut buffer = Vec::new();
        write_timeline(&mut buffer, &timeline).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("Owner,Owned,Date,Percentage"));
        assert!(text.contains("A,B,2020-01-01,0.6"));

        let reread = read_ledger(text.as_bytes()).unwrap();
        assert_eq!(reread.len(), 1);
    }

    #[test]
    fn test_write_splits_and_history() {
        let split = SplitRecord {
            account_id: "ACC-1_FAM-TRUST".to_string(),
            base_account_id: "ACC-1".to_string(),
            owner: EntityId::new("FAM-TRUST"),
            account_name: "Shared Venture - 60.00%".to_string(),
            currency: "USD".to_string(),
            date_opened: date(2019, 3, 1),
            rep_code: None,
            custodian: None,
            advisory_scope: None,
            effective_percentage: 0.6,
            first_ownership_date: date(2019, 3, 1),
            percentage_history: vec![(date(2019, 3, 1), 0.5), (date(2020, 1, 1), 0.6)],
        };

        let mut buffer = Vec::new();
        write_splits(&mut buffer, std::slice::from_ref(&split)).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("ACC-1_FAM-TRUST"));
        assert!(text.contains("Shared Venture - 60.00%"));

        let mut buffer = Vec::new();
        write_split_history(&mut buffer, std::slice::from_ref(&split)).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 3); // header + two history rows
    }
}
