/// JSON import/export of the quote list.
use crate::types::Quote;

/// Suggested file name for exported documents.
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// Failure reading an import document or writing an export.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("Import file is not valid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("Import file must contain a JSON array of quotes")]
    NotAnArray,

    #[error("Entry {index} is not a quote: {source}")]
    InvalidEntry {
        index: usize,
        source: serde_json::Error,
    },

    #[error("Failed to serialize quotes: {0}")]
    Serialize(serde_json::Error),
}

/// Pretty-printed JSON array of the full store.
pub fn export_quotes(quotes: &[Quote]) -> Result<Vec<u8>, TransferError> {
    serde_json::to_vec_pretty(quotes).map_err(TransferError::Serialize)
}

/// Parse an uploaded document. The top level must be an array; every element
/// must map to `{id?, text, category}` or nothing is imported.
pub fn parse_import(bytes: &[u8]) -> Result<Vec<Quote>, TransferError> {
    let value: serde_json::Value = serde_json::from_slice(bytes).map_err(TransferError::InvalidJson)?;
    let serde_json::Value::Array(items) = value else {
        return Err(TransferError::NotAnArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<Quote>(item)
                .map_err(|source| TransferError::InvalidEntry { index, source })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::default_quotes;

    #[test]
    fn test_export_is_pretty_array() {
        let bytes = export_quotes(&[Quote::new(Some(1), "A", "X")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with('['));
        assert!(text.contains('\n'));
        assert!(text.contains("\"text\": \"A\""));
    }

    #[test]
    fn test_export_import_preserves_fields() {
        let mut quotes = default_quotes();
        quotes.push(Quote::new(Some(1_700_000_000_000), "With id", "Life"));

        let bytes = export_quotes(&quotes).unwrap();
        assert_eq!(parse_import(&bytes).unwrap(), quotes);
    }

    #[test]
    fn test_import_rejects_non_array() {
        let err = parse_import(br#"{"text":"A","category":"X"}"#).unwrap_err();
        assert!(matches!(err, TransferError::NotAnArray));
    }

    #[test]
    fn test_import_rejects_invalid_json() {
        let err = parse_import(b"not json").unwrap_err();
        assert!(matches!(err, TransferError::InvalidJson(_)));
    }

    #[test]
    fn test_import_reports_bad_entry_index() {
        let err = parse_import(br#"[{"text":"A","category":"X"},{"title":"B"}]"#).unwrap_err();
        assert!(matches!(err, TransferError::InvalidEntry { index: 1, .. }));
    }

    #[test]
    fn test_import_empty_array() {
        assert!(parse_import(b"[]").unwrap().is_empty());
    }
}
