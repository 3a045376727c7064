use rand::Rng;

use crate::types::{Quote, ALL_CATEGORIES};

/// Quotes matching `filter`; the `"all"` sentinel matches everything.
pub fn filter_quotes<'a>(quotes: &'a [Quote], filter: &str) -> Vec<&'a Quote> {
    quotes
        .iter()
        .filter(|q| filter == ALL_CATEGORIES || q.category == filter)
        .collect()
}

/// Draw one quote uniformly from the filtered subset.
/// Returns `None` when nothing matches.
pub fn select_random<'a, R: Rng + ?Sized>(
    quotes: &'a [Quote],
    filter: &str,
    rng: &mut R,
) -> Option<&'a Quote> {
    let subset = filter_quotes(quotes, filter);
    if subset.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..subset.len());
    Some(subset[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample() -> Vec<Quote> {
        vec![
            Quote::new(Some(1), "A", "Life"),
            Quote::new(Some(2), "B", "Art"),
            Quote::new(Some(3), "C", "Life"),
        ]
    }

    #[test]
    fn test_filter_respects_category() {
        let quotes = sample();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let q = select_random(&quotes, "Life", &mut rng).unwrap();
            assert_eq!(q.category, "Life");
        }
    }

    #[test]
    fn test_all_sentinel_reaches_every_quote() {
        let quotes = sample();
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(select_random(&quotes, ALL_CATEGORIES, &mut rng).unwrap().id);
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_empty_subset_returns_none() {
        let quotes = sample();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(select_random(&quotes, "Nope", &mut rng).is_none());
        assert!(select_random(&[], ALL_CATEGORIES, &mut rng).is_none());
    }

    #[test]
    fn test_filter_is_exact_match() {
        let quotes = sample();
        assert!(filter_quotes(&quotes, "life").is_empty());
        assert_eq!(filter_quotes(&quotes, "Art").len(), 1);
    }
}
