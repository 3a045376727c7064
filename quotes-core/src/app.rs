/// Command handlers invoked by the UI collaborator.
///
/// Owns the shared store and the persistence adapter; every handler returns
/// a result instead of signalling through side channels.
use std::sync::{Arc, RwLockReadGuard, RwLockWriteGuard};

use crate::persistence::PersistenceAdapter;
use crate::select::select_random;
use crate::storage::PersistenceError;
use crate::store::{QuoteStore, SharedStore, ValidationError};
use crate::transfer::{self, TransferError};
use crate::types::{Quote, ALL_CATEGORIES};

#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub struct QuoteApp {
    store: SharedStore,
    persistence: Arc<PersistenceAdapter>,
}

impl QuoteApp {
    /// Hydrate the store from durable storage (seeding defaults if needed).
    pub fn open(persistence: Arc<PersistenceAdapter>) -> Result<Self, PersistenceError> {
        let quotes = persistence.load_quotes()?;
        log::info!(target: "quotes.store", "Loaded {} quotes", quotes.len());
        Ok(Self {
            store: QuoteStore::from_quotes(quotes).into_shared(),
            persistence,
        })
    }

    /// Store handle for the sync engine.
    pub fn store(&self) -> SharedStore {
        self.store.clone()
    }

    pub fn persistence(&self) -> Arc<PersistenceAdapter> {
        self.persistence.clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, QuoteStore> {
        self.store.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, QuoteStore> {
        self.store.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn quotes(&self) -> Vec<Quote> {
        self.read().quotes().to_vec()
    }

    pub fn categories(&self) -> Vec<String> {
        self.read().categories()
    }

    /// Category options for a filter dropdown: `"all"` first.
    pub fn category_options(&self) -> Vec<String> {
        std::iter::once(ALL_CATEGORIES.to_string())
            .chain(self.categories())
            .collect()
    }

    /// Validate, append and persist a new quote.
    /// A failed save rolls the in-memory store back.
    pub fn add_quote(&self, text: &str, category: &str) -> Result<Quote, QuoteError> {
        let mut store = self.write();
        let quote = store.add_quote(text, category)?;
        if let Err(e) = self.persistence.save_quotes(store.quotes()) {
            let mut quotes = store.quotes().to_vec();
            quotes.pop();
            store.replace_all(quotes);
            return Err(e.into());
        }
        Ok(quote)
    }

    /// Draw a random quote for `filter` and remember it as last viewed.
    pub fn show_random(&self, filter: &str) -> Result<Option<Quote>, QuoteError> {
        let picked = {
            let store = self.read();
            select_random(store.quotes(), filter, &mut rand::thread_rng()).cloned()
        };
        if let Some(quote) = &picked {
            self.persistence.save_last_viewed(quote)?;
        }
        Ok(picked)
    }

    /// Persist the new filter and show a quote for it.
    pub fn change_filter(&self, category: &str) -> Result<Option<Quote>, QuoteError> {
        self.persistence.save_selected_category(category)?;
        self.show_random(category)
    }

    pub fn selected_category(&self) -> Result<String, QuoteError> {
        Ok(self.persistence.load_selected_category()?)
    }

    pub fn last_viewed(&self) -> Result<Option<Quote>, QuoteError> {
        Ok(self.persistence.load_last_viewed()?)
    }

    pub fn export_quotes(&self) -> Result<Vec<u8>, QuoteError> {
        Ok(transfer::export_quotes(self.read().quotes())?)
    }

    /// Append every quote in the document (no deduplication) and persist.
    /// Returns the number of quotes appended.
    pub fn import_quotes(&self, bytes: &[u8]) -> Result<usize, QuoteError> {
        let imported = transfer::parse_import(bytes)?;
        let mut store = self.write();
        let mut next = store.quotes().to_vec();
        next.extend(imported.iter().cloned());
        self.persistence.save_quotes(&next)?;
        let count = store.append(imported);
        log::info!(target: "quotes.store", "Imported {} quotes", count);
        Ok(count)
    }
}
