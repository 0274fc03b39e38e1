//! User-controlled inclusion sets over categories and cover accounts, plus
//! free-text search, and the pure derivation that applies them.

use std::collections::HashMap;

use crate::categories::CategoryGroup;
use crate::model::{Account, Transaction};

/// Sentinel key for transactions without a category.
pub const UNCATEGORIZED_ID: &str = "uncategorized";
/// Sentinel key for transactions without a cover link.
pub const NOT_COVERED_ID: &str = "none";

/// Which categories and cover accounts are shown.
///
/// Keys absent from a map count as disabled. The version counter moves on
/// every mutation; derived views record it to know when to recompute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    categories: HashMap<String, bool>,
    cover_accounts: HashMap<String, bool>,
    version: u64,
}

impl Filters {
    /// The default filter set: every child category, every account, and both
    /// sentinels enabled. Built once the category tree and account list have
    /// resolved.
    pub fn all_enabled(tree: &[CategoryGroup], accounts: &[Account]) -> Self {
        let mut categories = HashMap::new();
        categories.insert(UNCATEGORIZED_ID.to_string(), true);
        for group in tree {
            for child in &group.children {
                categories.insert(child.id.clone(), true);
            }
        }

        let mut cover_accounts = HashMap::new();
        cover_accounts.insert(NOT_COVERED_ID.to_string(), true);
        for account in accounts {
            cover_accounts.insert(account.id.clone(), true);
        }

        Self {
            categories,
            cover_accounts,
            version: 0,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn category_enabled(&self, category_id: &str) -> bool {
        self.categories.get(category_id).copied().unwrap_or(false)
    }

    pub fn cover_account_enabled(&self, account_id: &str) -> bool {
        self.cover_accounts.get(account_id).copied().unwrap_or(false)
    }

    /// The group checkbox state: every child enabled.
    pub fn category_group_enabled(&self, group: &CategoryGroup) -> bool {
        group
            .children
            .iter()
            .all(|child| self.category_enabled(&child.id))
    }

    pub fn set_category(&mut self, category_id: &str, enabled: bool) {
        self.categories.insert(category_id.to_string(), enabled);
        self.version += 1;
    }

    /// Group-level toggle: sets every child of the parent at once.
    pub fn set_category_group(&mut self, group: &CategoryGroup, enabled: bool) {
        for child in &group.children {
            self.categories.insert(child.id.clone(), enabled);
        }
        self.version += 1;
    }

    pub fn set_cover_account(&mut self, account_id: &str, enabled: bool) {
        self.cover_accounts.insert(account_id.to_string(), enabled);
        self.version += 1;
    }
}

/// Applies filters and search to a pagination list.
///
/// Pure: same inputs, same output, input order preserved. A transaction is
/// kept only if its category, its cover account, and the search text all
/// match. Cover accounts are resolved through the list itself, following the
/// id back-reference to the matched cover and reading its transfer account;
/// a cover without one falls back to the "not covered" sentinel.
pub fn filter_transactions(
    list: &[Transaction],
    filters: &Filters,
    search: &str,
) -> Vec<Transaction> {
    let by_id: HashMap<&str, &Transaction> = list
        .iter()
        .map(|transaction| (transaction.id.as_str(), transaction))
        .collect();
    let needle = search.to_lowercase();

    list.iter()
        .filter(|transaction| {
            let category_match = match &transaction.category_id {
                Some(category_id) => filters.category_enabled(category_id),
                None => filters.category_enabled(UNCATEGORIZED_ID),
            };

            let cover_account = transaction
                .cover_transaction_id
                .as_deref()
                .and_then(|cover_id| by_id.get(cover_id))
                .and_then(|cover| cover.transfer_account_id.as_deref());
            let cover_match = match cover_account {
                Some(account_id) => filters.cover_account_enabled(account_id),
                None => filters.cover_account_enabled(NOT_COVERED_ID),
            };

            let search_match = needle.is_empty()
                || transaction.description.to_lowercase().contains(&needle)
                || transaction
                    .raw_text
                    .as_ref()
                    .is_some_and(|raw| raw.to_lowercase().contains(&needle));

            category_match && cover_match && search_match
        })
        .cloned()
        .collect()
}
