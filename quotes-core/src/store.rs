/// In-memory quote store: the single source of truth for a session.
///
/// Order is kept stable for export and display. The store never deduplicates
/// on its own; only reconciliation collapses quotes by identity key.
use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use crate::types::Quote;

/// Store handle shared between the command handlers and the sync engine.
pub type SharedStore = Arc<RwLock<QuoteStore>>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Quote text must not be empty")]
    EmptyText,

    #[error("Quote category must not be empty")]
    EmptyCategory,

    /// The store already holds `i64::MAX`, so no larger id exists.
    #[error("No quote id left above {0}")]
    IdsExhausted(i64),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteStore {
    quotes: Vec<Quote>,
}

impl QuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_quotes(quotes: Vec<Quote>) -> Self {
        Self { quotes }
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Validate and append a new quote with a freshly generated id.
    pub fn add_quote(&mut self, text: &str, category: &str) -> Result<Quote, ValidationError> {
        let text = text.trim();
        let category = category.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText);
        }
        if category.is_empty() {
            return Err(ValidationError::EmptyCategory);
        }

        let quote = Quote::new(Some(self.next_local_id()?), text, category);
        self.quotes.push(quote.clone());
        log::debug!(target: "quotes.store", "Added quote {:?} in {}", quote.id, quote.category);
        Ok(quote)
    }

    /// Append quotes as-is (import path). Returns the number appended.
    pub fn append(&mut self, quotes: Vec<Quote>) -> usize {
        let count = quotes.len();
        self.quotes.extend(quotes);
        count
    }

    /// Full overwrite (hydration and merge).
    pub fn replace_all(&mut self, quotes: Vec<Quote>) {
        self.quotes = quotes;
    }

    pub fn find_by_id(&self, id: i64) -> Option<&Quote> {
        self.quotes.iter().find(|q| q.id == Some(id))
    }

    /// Unique categories, sorted ascending.
    pub fn categories(&self) -> Vec<String> {
        self.quotes
            .iter()
            .map(|q| q.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Timestamp-derived id, bumped past every id already in the store.
    fn next_local_id(&self) -> Result<i64, ValidationError> {
        let now = timestamp_millis();
        let max_existing = self.quotes.iter().filter_map(|q| q.id).max();
        match max_existing {
            Some(max) if max >= now => max
                .checked_add(1)
                .ok_or(ValidationError::IdsExhausted(max)),
            _ => Ok(now),
        }
    }
}

fn timestamp_millis() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::default_quotes;

    #[test]
    fn test_add_quote_grows_store_by_one() {
        let mut store = QuoteStore::from_quotes(default_quotes());
        let quote = store.add_quote("  Be curious.  ", " Life ").unwrap();

        assert_eq!(store.len(), 4);
        assert_eq!(quote.text, "Be curious.");
        assert_eq!(quote.category, "Life");
        let id = quote.id.expect("generated id");
        assert_eq!(store.find_by_id(id), Some(&quote));
    }

    #[test]
    fn test_add_quote_rejects_blank_input() {
        let mut store = QuoteStore::from_quotes(default_quotes());
        let before = store.clone();

        assert_eq!(store.add_quote("", "Life"), Err(ValidationError::EmptyText));
        assert_eq!(store.add_quote("   ", "Life"), Err(ValidationError::EmptyText));
        assert_eq!(store.add_quote("Text", ""), Err(ValidationError::EmptyCategory));
        assert_eq!(store.add_quote("Text", "\t\n"), Err(ValidationError::EmptyCategory));
        assert_eq!(store, before);
    }

    #[test]
    fn test_generated_ids_unique_and_increasing() {
        let mut store = QuoteStore::new();
        let a = store.add_quote("A", "X").unwrap().id.unwrap();
        let b = store.add_quote("B", "X").unwrap().id.unwrap();
        let c = store.add_quote("C", "X").unwrap().id.unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_generated_id_exceeds_existing_ids() {
        let far_future = i64::MAX / 2;
        let mut store = QuoteStore::from_quotes(vec![Quote::new(Some(far_future), "A", "X")]);
        let quote = store.add_quote("B", "X").unwrap();
        assert_eq!(quote.id, Some(far_future + 1));
    }

    #[test]
    fn test_add_quote_fails_when_ids_exhausted() {
        let mut store = QuoteStore::from_quotes(vec![Quote::new(Some(i64::MAX), "Big", "X")]);
        let before = store.clone();

        assert_eq!(
            store.add_quote("New", "X"),
            Err(ValidationError::IdsExhausted(i64::MAX))
        );
        assert_eq!(store, before);
    }

    #[test]
    fn test_categories_sorted_unique() {
        let store = QuoteStore::from_quotes(vec![
            Quote::new(None, "1", "Life"),
            Quote::new(None, "2", "Art"),
            Quote::new(None, "3", "Life"),
        ]);
        assert_eq!(store.categories(), vec!["Art".to_string(), "Life".to_string()]);
    }

    #[test]
    fn test_append_keeps_duplicates() {
        let mut store = QuoteStore::from_quotes(default_quotes());
        let appended = store.append(default_quotes());
        assert_eq!(appended, 3);
        assert_eq!(store.len(), 6);
    }
}
