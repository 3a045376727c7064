/// Remote-wins merge of local and remote quote sets.
///
/// Quotes are matched by identity key (id, else text):
/// - In both, equal -> keep one copy
/// - In both, different -> keep remote, report a conflict
/// - Only remote -> include
/// - Only local -> include unchanged
///
/// Remote-derived entries come first, then local-only ones, each in
/// ascending key order. A key repeated within one side keeps its last record.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Quote, QuoteKey};

/// A shared key whose local and remote records differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub server_quote: Quote,
    pub local_quote: Quote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    pub quotes: Vec<Quote>,
    pub conflicts: Vec<Conflict>,
}

fn by_key(quotes: &[Quote]) -> BTreeMap<QuoteKey, &Quote> {
    quotes.iter().map(|q| (q.key(), q)).collect()
}

pub fn merge_remote_wins(local: &[Quote], remote: &[Quote]) -> MergeResult {
    let local_by_key = by_key(local);
    let remote_by_key = by_key(remote);

    let mut quotes = Vec::with_capacity(local_by_key.len() + remote_by_key.len());
    let mut conflicts = Vec::new();

    for (key, server_quote) in &remote_by_key {
        quotes.push((*server_quote).clone());
        if let Some(local_quote) = local_by_key.get(key) {
            if local_quote != server_quote {
                conflicts.push(Conflict {
                    server_quote: (*server_quote).clone(),
                    local_quote: (*local_quote).clone(),
                });
            }
        }
    }

    for (key, local_quote) in &local_by_key {
        if !remote_by_key.contains_key(key) {
            quotes.push((*local_quote).clone());
        }
    }

    MergeResult { quotes, conflicts }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_wins_on_conflict() {
        let local = vec![Quote::new(Some(1), "A", "X")];
        let remote = vec![Quote::new(Some(1), "B", "Y")];

        let result = merge_remote_wins(&local, &remote);
        assert_eq!(result.quotes, vec![Quote::new(Some(1), "B", "Y")]);
        assert_eq!(result.conflicts.len(), 1);
        assert_eq!(result.conflicts[0].server_quote, remote[0]);
        assert_eq!(result.conflicts[0].local_quote, local[0]);
    }

    #[test]
    fn test_disjoint_keys_union_without_conflict() {
        let local = vec![Quote::new(Some(2), "Local", "Z")];
        let remote = vec![Quote::new(Some(1), "Remote", "Server")];

        let result = merge_remote_wins(&local, &remote);
        assert_eq!(result.quotes, vec![remote[0].clone(), local[0].clone()]);
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn test_equal_records_are_not_conflicts() {
        let shared = Quote::new(Some(5), "Same", "Life");
        let result = merge_remote_wins(&[shared.clone()], &[shared.clone()]);
        assert_eq!(result.quotes, vec![shared]);
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn test_legacy_quotes_keyed_by_text() {
        let local = vec![Quote::new(None, "Text", "Old")];
        let remote = vec![Quote::new(None, "Text", "New")];

        let result = merge_remote_wins(&local, &remote);
        assert_eq!(result.quotes, vec![Quote::new(None, "Text", "New")]);
        assert_eq!(result.conflicts.len(), 1);
    }

    #[test]
    fn test_id_and_text_keys_do_not_collide() {
        // Same text, but one has an id: different identities
        let local = vec![Quote::new(None, "Text", "X")];
        let remote = vec![Quote::new(Some(1), "Text", "X")];

        let result = merge_remote_wins(&local, &remote);
        assert_eq!(result.quotes.len(), 2);
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn test_output_order_is_ascending_per_side() {
        let local = vec![
            Quote::new(None, "zeta", "L"),
            Quote::new(Some(30), "thirty", "L"),
            Quote::new(None, "alpha", "L"),
        ];
        let remote = vec![Quote::new(Some(9), "nine", "S"), Quote::new(Some(3), "three", "S")];

        let result = merge_remote_wins(&local, &remote);
        let texts: Vec<&str> = result.quotes.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["three", "nine", "thirty", "alpha", "zeta"]);
    }

    #[test]
    fn test_duplicate_key_keeps_last() {
        let local = vec![Quote::new(Some(1), "first", "X"), Quote::new(Some(1), "second", "X")];
        let result = merge_remote_wins(&local, &[]);
        assert_eq!(result.quotes, vec![Quote::new(Some(1), "second", "X")]);
    }
}
