use crate::core::entity::EntityId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Display attributes of a base account, keyed by entity id.
///
/// Used only to decorate generated split accounts; the resolution engine
/// itself never reads account metadata. Field names serialize to the
/// column names of the account-metadata input table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    #[serde(rename = "Account ID")]
    pub account_id: String,
    #[serde(rename = "Account Name")]
    pub account_name: String,
    #[serde(rename = "Currency")]
    pub currency: String,
    #[serde(rename = "Opened Date")]
    pub opened_date: NaiveDate,
    #[serde(rename = "Rep Code", default)]
    pub rep_code: Option<String>,
    #[serde(rename = "Custodian", default)]
    pub custodian: Option<String>,
    #[serde(rename = "Advisory Scope", default)]
    pub advisory_scope: Option<String>,
}

/// Account metadata lookup, keyed by the entity id of the base account.
#[derive(Debug, Clone, Default)]
pub struct AccountBook {
    accounts: BTreeMap<EntityId, AccountRecord>,
}

impl AccountBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: AccountRecord) {
        self.accounts
            .insert(EntityId::new(record.account_id.clone()), record);
    }

    pub fn get(&self, entity: &EntityId) -> Option<&AccountRecord> {
        self.accounts.get(entity)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &AccountRecord)> {
        self.accounts.iter()
    }
}

impl FromIterator<AccountRecord> for AccountBook {
    fn from_iter<T: IntoIterator<Item = AccountRecord>>(iter: T) -> Self {
        let mut book = Self::new();
        for record in iter {
            book.insert(record);
        }
        book
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_account(id: &str) -> AccountRecord {
        AccountRecord {
            account_id: id.to_string(),
            account_name: format!("{} Holdings", id),
            currency: "USD".to_string(),
            opened_date: NaiveDate::from_ymd_opt(2018, 5, 1).unwrap(),
            rep_code: Some("R-100".to_string()),
            custodian: None,
            advisory_scope: None,
        }
    }

    #[test]
    fn test_book_lookup_by_entity() {
        let book: AccountBook = vec![sample_account("ACC-1"), sample_account("ACC-2")]
            .into_iter()
            .collect();
        assert_eq!(book.len(), 2);
        let found = book.get(&EntityId::new("ACC-1")).unwrap();
        assert_eq!(found.account_name, "ACC-1 Holdings");
        assert!(book.get(&EntityId::new("ACC-9")).is_none());
    }

    #[test]
    fn test_later_insert_replaces() {
        let mut book = AccountBook::new();
        book.insert(sample_account("ACC-1"));
        let mut updated = sample_account("ACC-1");
        updated.currency = "EUR".to_string();
        book.insert(updated);
        assert_eq!(book.len(), 1);
        assert_eq!(book.get(&EntityId::new("ACC-1")).unwrap().currency, "EUR");
    }
}
