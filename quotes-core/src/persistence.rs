/// Persistence adapter: quote list and category preference in durable
/// storage, last-viewed quote in session storage. Every value is a JSON
/// document.
use std::sync::Arc;

use crate::storage::{KeyValueStore, PersistenceError};
use crate::types::{default_quotes, Quote, ALL_CATEGORIES};

pub const QUOTES_KEY: &str = "quotes";
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";
pub const LAST_VIEWED_KEY: &str = "lastViewedQuote";

pub struct PersistenceAdapter {
    durable: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
}

impl PersistenceAdapter {
    pub fn new(durable: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        Self { durable, session }
    }

    /// Load the persisted quotes. Absent or unparseable data is replaced by
    /// the default set, which is saved right away.
    pub fn load_quotes(&self) -> Result<Vec<Quote>, PersistenceError> {
        if let Some(raw) = self.durable.get(QUOTES_KEY)? {
            match serde_json::from_str::<Vec<Quote>>(&raw) {
                Ok(quotes) => return Ok(quotes),
                Err(e) => {
                    log::warn!(
                        target: "quotes.storage",
                        "Stored quotes are unreadable, reseeding defaults: {}",
                        e
                    );
                }
            }
        }

        let defaults = default_quotes();
        self.save_quotes(&defaults)?;
        log::info!(target: "quotes.storage", "Seeded {} default quotes", defaults.len());
        Ok(defaults)
    }

    pub fn save_quotes(&self, quotes: &[Quote]) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(quotes)?;
        self.durable.set(QUOTES_KEY, &json)
    }

    pub fn save_selected_category(&self, category: &str) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(category)?;
        self.durable.set(SELECTED_CATEGORY_KEY, &json)
    }

    /// Saved filter, or `"all"` when none is stored.
    pub fn load_selected_category(&self) -> Result<String, PersistenceError> {
        let stored = self
            .durable
            .get(SELECTED_CATEGORY_KEY)?
            .and_then(|raw| serde_json::from_str::<String>(&raw).ok());
        Ok(stored.unwrap_or_else(|| ALL_CATEGORIES.to_string()))
    }

    pub fn save_last_viewed(&self, quote: &Quote) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(quote)?;
        self.session.set(LAST_VIEWED_KEY, &json)
    }

    pub fn load_last_viewed(&self) -> Result<Option<Quote>, PersistenceError> {
        Ok(self
            .session
            .get(LAST_VIEWED_KEY)?
            .and_then(|raw| serde_json::from_str::<Quote>(&raw).ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::local::FileKeyValueStore;
    use crate::storage::memory::MemoryKeyValueStore;

    fn memory_adapter() -> (PersistenceAdapter, Arc<MemoryKeyValueStore>) {
        let durable = Arc::new(MemoryKeyValueStore::new());
        let adapter = PersistenceAdapter::new(durable.clone(), Arc::new(MemoryKeyValueStore::new()));
        (adapter, durable)
    }

    #[test]
    fn test_load_seeds_defaults_when_absent() {
        let (adapter, durable) = memory_adapter();
        let quotes = adapter.load_quotes().unwrap();
        assert_eq!(quotes, default_quotes());
        // Seeded set was persisted
        assert!(durable.get(QUOTES_KEY).unwrap().is_some());
    }

    #[test]
    fn test_load_seeds_defaults_when_corrupt() {
        let (adapter, durable) = memory_adapter();
        durable.set(QUOTES_KEY, "{not json").unwrap();

        let quotes = adapter.load_quotes().unwrap();
        assert_eq!(quotes, default_quotes());

        let stored: Vec<Quote> =
            serde_json::from_str(&durable.get(QUOTES_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored, default_quotes());
    }

    #[test]
    fn test_save_then_load_quotes() {
        let (adapter, _) = memory_adapter();
        let quotes = vec![Quote::new(Some(1), "A", "X"), Quote::new(None, "B", "Y")];
        adapter.save_quotes(&quotes).unwrap();
        assert_eq!(adapter.load_quotes().unwrap(), quotes);
    }

    #[test]
    fn test_selected_category_defaults_to_all() {
        let (adapter, _) = memory_adapter();
        assert_eq!(adapter.load_selected_category().unwrap(), "all");
    }

    #[test]
    fn test_selected_category_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        {
            let adapter = PersistenceAdapter::new(
                Arc::new(FileKeyValueStore::open(dir.path()).unwrap()),
                Arc::new(MemoryKeyValueStore::new()),
            );
            adapter.save_selected_category("Life").unwrap();
        }
        let adapter = PersistenceAdapter::new(
            Arc::new(FileKeyValueStore::open(dir.path()).unwrap()),
            Arc::new(MemoryKeyValueStore::new()),
        );
        assert_eq!(adapter.load_selected_category().unwrap(), "Life");
    }

    #[test]
    fn test_last_viewed_is_session_scoped() {
        let dir = tempfile::tempdir().unwrap();
        let quote = Quote::new(Some(3), "Seen", "Life");
        {
            let adapter = PersistenceAdapter::new(
                Arc::new(FileKeyValueStore::open(dir.path()).unwrap()),
                Arc::new(MemoryKeyValueStore::new()),
            );
            assert_eq!(adapter.load_last_viewed().unwrap(), None);
            adapter.save_last_viewed(&quote).unwrap();
            assert_eq!(adapter.load_last_viewed().unwrap(), Some(quote.clone()));
        }
        // New session: durable dir reused, session storage fresh
        let adapter = PersistenceAdapter::new(
            Arc::new(FileKeyValueStore::open(dir.path()).unwrap()),
            Arc::new(MemoryKeyValueStore::new()),
        );
        assert_eq!(adapter.load_last_viewed().unwrap(), None);
    }
}
