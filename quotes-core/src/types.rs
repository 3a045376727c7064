use serde::{Deserialize, Serialize};

/// Filter value that matches every category.
pub const ALL_CATEGORIES: &str = "all";

/// Shown when the filtered subset is empty.
pub const NO_QUOTES_MESSAGE: &str = "No quotes available for this category.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Assigned by the remote source, or generated locally on creation.
    /// Legacy quotes have none and are identified by their text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub text: String,
    pub category: String,
}

impl Quote {
    pub fn new(id: Option<i64>, text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            category: category.into(),
        }
    }

    /// Merge identity: the id when present, else the text.
    pub fn key(&self) -> QuoteKey {
        match self.id {
            Some(id) => QuoteKey::Id(id),
            None => QuoteKey::Text(self.text.clone()),
        }
    }

    /// Display form used by the UI: quoted text, then the category.
    pub fn display(&self) -> String {
        format!("\"{}\" — {}", self.text, self.category)
    }
}

/// Identity key used to match local and remote quotes.
///
/// Ordering: ids ascend numerically and sort before all text keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QuoteKey {
    Id(i64),
    Text(String),
}

/// The built-in set seeded when durable storage holds no usable quotes.
pub fn default_quotes() -> Vec<Quote> {
    vec![
        Quote::new(
            None,
            "The only way to do great work is to love what you do.",
            "Motivation",
        ),
        Quote::new(
            None,
            "Life is what happens when you're busy making other plans.",
            "Life",
        ),
        Quote::new(
            None,
            "To be yourself in a world that is constantly trying to make you something else is the greatest accomplishment.",
            "Inspiration",
        ),
    ]
}
