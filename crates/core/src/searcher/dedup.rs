//! Deduplication of search hits by id.

use std::collections::HashMap;

use super::SearchHit;

/// Collapse hits sharing an id into one, keeping the best-seeded listing.
///
/// The result is sorted by seeders (descending), then by id so that equal
/// seeders keep a stable order.
pub fn deduplicate_hits(hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut by_id: HashMap<String, SearchHit> = HashMap::new();

    for hit in hits {
        match by_id.get_mut(&hit.id) {
            Some(existing) if hit.seeders > existing.seeders => *existing = hit,
            Some(_) => {}
            None => {
                by_id.insert(hit.id.clone(), hit);
            }
        }
    }

    let mut deduped: Vec<SearchHit> = by_id.into_values().collect();
    deduped.sort_by(|a, b| b.seeders.cmp(&a.seeders).then_with(|| a.id.cmp(&b.id)));
    deduped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: &str, title: &str, seeders: u32) -> SearchHit {
        SearchHit {
            title: title.to_string(),
            size: "1.00 GB".to_string(),
            seeders,
            id: id.to_string(),
            category: "Movies".to_string(),
            sub_category: "HD".to_string(),
            magnet_link: format!("magnet:?xt=urn:btih:{}", id),
        }
    }

    #[test]
    fn test_duplicate_ids_keep_most_seeded() {
        let hits = vec![
            hit("aaa", "From indexer one", 5),
            hit("aaa", "From indexer two", 50),
            hit("aaa", "From indexer three", 20),
        ];

        let result = deduplicate_hits(hits);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "From indexer two");
        assert_eq!(result[0].seeders, 50);
    }

    #[test]
    fn test_sorted_by_seeders() {
        let hits = vec![hit("low", "Low", 1), hit("high", "High", 90), hit("mid", "Mid", 30)];

        let ids: Vec<String> = deduplicate_hits(hits).into_iter().map(|h| h.id).collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_ties_ordered_by_id() {
        let hits = vec![hit("b", "B", 10), hit("a", "A", 10)];

        let ids: Vec<String> = deduplicate_hits(hits).into_iter().map(|h| h.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_empty() {
        assert!(deduplicate_hits(Vec::new()).is_empty());
    }
}
