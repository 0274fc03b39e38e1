//! State/data layer for an Up Bank transaction tagger.
//!
//! Everything the presentation layer reads or writes goes through [`Store`]:
//! cached entity queries (accounts, categories, tags), a per-account
//! pagination cache with cover-matching, filter/search derivation,
//! multi-select, and tag mutation. Derived views are dependency-tracked:
//! each records the versions of its inputs and is recomputed only when one
//! of them moved.
//!
//! The store is single-consumer by construction: every operation takes
//! `&mut self`, so a load-more can never race a refresh on the same account
//! and a resolving fetch can never overwrite state mutated behind its back.

use std::collections::HashMap;

use tokio::task::JoinSet;

mod categories;
mod client;
pub mod config;
mod covers;
mod credentials;
mod error;
mod filters;
mod model;
mod pagination;
mod selection;

pub use categories::{Category, CategoryGroup, build_category_tree};
pub use client::Client;
pub use self::config::StoreConfig;
pub use covers::find_covers;
pub use credentials::ApiKeyStore;
pub use error::{ErrorDetail, Result, StoreError};
pub use filters::{Filters, NOT_COVERED_ID, UNCATEGORIZED_ID, filter_transactions};
pub use model::{Account, Amount, Tag, Transaction};
pub use pagination::{PAGE_SIZE, PaginatedTransactions, PaginationStore};
pub use selection::Selection;

/// An entity list cached under the credential generation it was fetched
/// with; a credential change makes it a miss without touching the data.
#[derive(Debug, Default)]
struct Cached<T> {
    value: Option<T>,
    generation: u64,
}

impl<T> Cached<T> {
    fn get(&self, generation: u64) -> Option<&T> {
        if self.generation == generation {
            self.value.as_ref()
        } else {
            None
        }
    }

    fn put(&mut self, generation: u64, value: T) {
        self.value = Some(value);
        self.generation = generation;
    }

    fn clear(&mut self) {
        self.value = None;
    }
}

/// Input versions a filtered view was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FilterInputs {
    list: u64,
    filters: u64,
    search: u64,
}

#[derive(Debug)]
struct FilteredView {
    inputs: FilterInputs,
    value: Vec<Transaction>,
}

#[derive(Debug)]
pub struct Store {
    client: Client,
    api_key: ApiKeyStore,
    accounts: Cached<Vec<Account>>,
    categories: Cached<Vec<CategoryGroup>>,
    tags: Cached<Vec<Tag>>,
    pagination: PaginationStore,
    filters: Option<Filters>,
    search: String,
    search_version: u64,
    filtered: HashMap<String, FilteredView>,
    selection: Selection,
}

impl Store {
    pub fn new(config: StoreConfig) -> Result<Self> {
        let client = Client::new(&config.base_url)?;
        let api_key = ApiKeyStore::load(&config.api_key_path)?;
        Ok(Self {
            client,
            api_key,
            accounts: Cached::default(),
            categories: Cached::default(),
            tags: Cached::default(),
            pagination: PaginationStore::default(),
            filters: None,
            search: String::new(),
            search_version: 0,
            filtered: HashMap::new(),
            selection: Selection::default(),
        })
    }

    // ---- credential ----

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.get()
    }

    /// Persists a new personal access token and drops every cache tied to
    /// the old one.
    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key.set(key)?;
        self.invalidate();
        Ok(())
    }

    pub fn clear_api_key(&mut self) -> Result<()> {
        self.api_key.clear()?;
        self.invalidate();
        Ok(())
    }

    fn invalidate(&mut self) {
        tracing::info!("credential changed, dropping cached api data");
        self.accounts.clear();
        self.categories.clear();
        self.tags.clear();
        self.pagination.clear();
        self.filters = None;
        self.filtered.clear();
    }

    fn token(&self) -> Result<String> {
        self.api_key
            .get()
            .map(str::to_string)
            .ok_or(StoreError::MissingApiKey)
    }

    // ---- entity queries ----

    /// All accounts, fetched once per credential.
    pub async fn accounts(&mut self) -> Result<Vec<Account>> {
        let generation = self.api_key.generation();
        if let Some(cached) = self.accounts.get(generation) {
            return Ok(cached.clone());
        }
        let token = self.token()?;
        let document = self.client.accounts(&token).await?;
        let accounts: Vec<Account> = document.data.into_iter().map(Account::from).collect();
        self.accounts.put(generation, accounts.clone());
        Ok(accounts)
    }

    /// The two-level category tree, fetched once per credential.
    pub async fn categories(&mut self) -> Result<Vec<CategoryGroup>> {
        let generation = self.api_key.generation();
        if let Some(cached) = self.categories.get(generation) {
            return Ok(cached.clone());
        }
        let token = self.token()?;
        let document = self.client.categories(&token).await?;
        let tree = build_category_tree(document.data);
        self.categories.put(generation, tree.clone());
        Ok(tree)
    }

    pub async fn tags(&mut self) -> Result<Vec<Tag>> {
        let generation = self.api_key.generation();
        if let Some(cached) = self.tags.get(generation) {
            return Ok(cached.clone());
        }
        let token = self.token()?;
        let document = self.client.tags(&token).await?;
        let tags: Vec<Tag> = document.data.into_iter().map(Tag::from).collect();
        self.tags.put(generation, tags.clone());
        Ok(tags)
    }

    pub async fn account_name(&mut self, account_id: &str) -> Result<Option<String>> {
        Ok(self
            .accounts()
            .await?
            .into_iter()
            .find(|account| account.id == account_id)
            .map(|account| account.display_name))
    }

    /// Looks a child category up in the tree.
    pub async fn category_name(&mut self, category_id: &str) -> Result<Option<String>> {
        Ok(self.categories().await?.into_iter().find_map(|group| {
            group
                .children
                .into_iter()
                .find(|child| child.id == category_id)
                .map(|child| child.name)
        }))
    }

    // ---- pagination ----

    /// Loads the first page for an account if nothing is cached yet.
    async fn ensure_transactions(&mut self, account_id: &str) -> Result<()> {
        if self.pagination.is_loaded(account_id) {
            return Ok(());
        }
        let token = self.token()?;
        tracing::debug!(account_id, "loading first transaction page");
        let document = self
            .client
            .transactions_first_page(&token, account_id, PAGE_SIZE)
            .await?;
        let page = document.data.into_iter().map(Transaction::from).collect();
        self.pagination
            .insert_first_page(account_id, page, document.links.next);
        Ok(())
    }

    /// Whether a further page exists for the account.
    pub async fn has_more(&mut self, account_id: &str) -> Result<bool> {
        self.ensure_transactions(account_id).await?;
        Ok(self.pagination.next_cursor(account_id).is_some())
    }

    /// Fetches the next page and re-matches covers over the accumulated
    /// list. A no-op once the account is exhausted.
    pub async fn load_more(&mut self, account_id: &str) -> Result<()> {
        self.ensure_transactions(account_id).await?;
        let Some(cursor) = self.pagination.next_cursor(account_id) else {
            return Ok(());
        };
        let token = self.token()?;
        tracing::debug!(account_id, "loading next transaction page");
        let document = self.client.transactions_page(&token, &cursor).await?;
        let page = document.data.into_iter().map(Transaction::from).collect();
        self.pagination
            .append_page(account_id, page, document.links.next);
        Ok(())
    }

    /// Re-fetches an account from the first page until at least
    /// `target_count` transactions are in hand or the account runs out, then
    /// replaces its cached state. Used after tag mutations instead of
    /// trusting partial in-place edits.
    pub async fn refresh(&mut self, account_id: &str, target_count: usize) -> Result<()> {
        let token = self.token()?;
        tracing::debug!(account_id, target_count, "refreshing transactions");

        let mut all: Vec<Transaction> = Vec::new();
        let mut next: Option<String> = None;
        loop {
            let document = match &next {
                Some(cursor) => self.client.transactions_page(&token, cursor).await?,
                None => {
                    self.client
                        .transactions_first_page(&token, account_id, PAGE_SIZE)
                        .await?
                }
            };
            all.extend(document.data.into_iter().map(Transaction::from));
            next = document.links.next;
            if all.len() >= target_count || next.is_none() {
                break;
            }
        }

        self.pagination.replace(account_id, all, next);
        Ok(())
    }

    // ---- filters & search ----

    pub async fn filters(&mut self) -> Result<&Filters> {
        self.ensure_filters().await?;
        Ok(self.filters.get_or_insert_with(Filters::default))
    }

    /// Mutable access for toggles; the filter's own version counter keeps
    /// derived views honest.
    pub async fn filters_mut(&mut self) -> Result<&mut Filters> {
        self.ensure_filters().await?;
        Ok(self.filters.get_or_insert_with(Filters::default))
    }

    async fn ensure_filters(&mut self) -> Result<()> {
        if self.filters.is_some() {
            return Ok(());
        }
        let tree = self.categories().await?;
        let accounts = self.accounts().await?;
        self.filters = Some(Filters::all_enabled(&tree, &accounts));
        Ok(())
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, text: String) {
        if text != self.search {
            self.search = text;
            self.search_version += 1;
        }
    }

    /// One account's transactions with filters and search applied.
    ///
    /// Memoized per account against the versions of its three inputs
    /// (pagination list, filters, search); a hit costs a clone, a miss one
    /// pass over the list.
    pub async fn filtered_transactions(&mut self, account_id: &str) -> Result<Vec<Transaction>> {
        self.ensure_transactions(account_id).await?;
        self.ensure_filters().await?;

        let inputs = {
            let (Some(entry), Some(filters)) = (self.pagination.get(account_id), &self.filters)
            else {
                return Ok(Vec::new());
            };
            FilterInputs {
                list: entry.version(),
                filters: filters.version(),
                search: self.search_version,
            }
        };

        if let Some(cached) = self.filtered.get(account_id) {
            if cached.inputs == inputs {
                return Ok(cached.value.clone());
            }
        }

        let value = {
            let (Some(entry), Some(filters)) = (self.pagination.get(account_id), &self.filters)
            else {
                return Ok(Vec::new());
            };
            filter_transactions(&entry.list, filters, &self.search)
        };
        self.filtered.insert(
            account_id.to_string(),
            FilteredView {
                inputs,
                value: value.clone(),
            },
        );
        Ok(value)
    }

    // ---- selection ----

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Resolves the selected ids to full transactions by scanning every
    /// account's filtered view, loading first pages lazily along the way.
    pub async fn selected_transactions(&mut self) -> Result<Vec<Transaction>> {
        let accounts = self.accounts().await?;
        let mut selected = Vec::new();
        for account in &accounts {
            let view = self.filtered_transactions(&account.id).await?;
            selected.extend(
                view.into_iter()
                    .filter(|transaction| self.selection.has(&transaction.id)),
            );
        }
        Ok(selected)
    }

    // ---- tag mutation ----

    /// Attaches one tag to each transaction, one concurrent request per id,
    /// then reconciles every loaded account by refreshing it to its current
    /// list length.
    ///
    /// Requests that already succeeded are not rolled back when a later one
    /// fails; the refresh is skipped and the first error surfaces instead.
    pub async fn tag_transactions(&mut self, transaction_ids: &[String], tag_id: &str) -> Result<()> {
        let token = self.token()?;
        tracing::info!(count = transaction_ids.len(), tag_id, "tagging transactions");

        let mut requests = JoinSet::new();
        for transaction_id in transaction_ids {
            let client = self.client.clone();
            let token = token.clone();
            let transaction_id = transaction_id.clone();
            let tag_id = tag_id.to_string();
            requests
                .spawn(async move { client.add_tag(&token, &transaction_id, &tag_id).await });
        }

        let mut first_error = None;
        while let Some(joined) = requests.join_next().await {
            let outcome = joined.map_err(|err| StoreError::Task(err.to_string()))?;
            if let Err(err) = outcome {
                tracing::warn!(error = %err, "tag request failed");
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
        if let Some(err) = first_error {
            return Err(err);
        }

        for (account_id, length) in self.pagination.loaded_lengths() {
            self.refresh(&account_id, length).await?;
        }
        Ok(())
    }
}
