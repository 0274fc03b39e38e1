//! Per-account cache of loaded transaction pages.
//!
//! Entries are created lazily on first access and live for the session. All
//! three mutations (first page, append, replace) re-run the cover matcher,
//! and append runs it over the **whole** accumulated list, because a cover
//! and its match can land on different pages.

use std::collections::HashMap;

use crate::covers;
use crate::model::Transaction;

/// Fixed page size for every transactions request.
pub const PAGE_SIZE: u32 = 100;

/// Loaded transactions for one account plus the cursor for the next page.
#[derive(Debug, Clone, Default)]
pub struct PaginatedTransactions {
    pub list: Vec<Transaction>,
    /// Opaque `links.next` URL; `None` once the account is exhausted.
    pub next_cursor: Option<String>,
    version: u64,
}

impl PaginatedTransactions {
    /// Changes whenever the entry is mutated; derived views record it.
    pub fn version(&self) -> u64 {
        self.version
    }
}

#[derive(Debug, Default)]
pub struct PaginationStore {
    entries: HashMap<String, PaginatedTransactions>,
    // Survives `clear` so a reloaded entry never reuses an old version.
    next_version: u64,
}

impl PaginationStore {
    pub fn get(&self, account_id: &str) -> Option<&PaginatedTransactions> {
        self.entries.get(account_id)
    }

    pub fn is_loaded(&self, account_id: &str) -> bool {
        self.entries.contains_key(account_id)
    }

    pub fn next_cursor(&self, account_id: &str) -> Option<String> {
        self.entries
            .get(account_id)
            .and_then(|entry| entry.next_cursor.clone())
    }

    /// Ids and current list lengths of every loaded account, for
    /// post-mutation reconciliation.
    pub fn loaded_lengths(&self) -> Vec<(String, usize)> {
        self.entries
            .iter()
            .map(|(account_id, entry)| (account_id.clone(), entry.list.len()))
            .collect()
    }

    pub fn insert_first_page(
        &mut self,
        account_id: &str,
        mut page: Vec<Transaction>,
        next_cursor: Option<String>,
    ) {
        covers::find_covers(&mut page);
        self.put(account_id, page, next_cursor);
    }

    /// Concatenates one more page and re-matches covers across the full list.
    pub fn append_page(
        &mut self,
        account_id: &str,
        page: Vec<Transaction>,
        next_cursor: Option<String>,
    ) {
        let mut list = self
            .entries
            .remove(account_id)
            .map(|entry| entry.list)
            .unwrap_or_default();
        list.extend(page);
        covers::find_covers(&mut list);
        self.put(account_id, list, next_cursor);
    }

    /// Replaces an account's state wholesale, as a refresh does.
    pub fn replace(
        &mut self,
        account_id: &str,
        mut list: Vec<Transaction>,
        next_cursor: Option<String>,
    ) {
        covers::find_covers(&mut list);
        self.put(account_id, list, next_cursor);
    }

    /// Drops every entry; used when the credential changes.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn put(&mut self, account_id: &str, list: Vec<Transaction>, next_cursor: Option<String>) {
        self.next_version += 1;
        self.entries.insert(
            account_id.to_string(),
            PaginatedTransactions {
                list,
                next_cursor,
                version: self.next_version,
            },
        );
    }
}
