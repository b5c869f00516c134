//! Tiny embedding catalog with three well-separated clusters.
//!
//! Neighbourhoods (cosine similarity to `google.com`, descending):
//! `bing.com`, `duckduckgo.com`, `yahoo.com`, then the other clusters.

use serde_json::json;

/// `(domain, vector)` pairs, search cluster first.
pub fn sample_catalog() -> Vec<(String, Vec<f32>)> {
    [
        ("google.com", [1.0, 0.0, 0.0]),
        ("bing.com", [0.95, 0.05, 0.0]),
        ("duckduckgo.com", [0.9, 0.1, 0.0]),
        ("yahoo.com", [0.85, 0.15, 0.0]),
        ("youtube.com", [0.0, 1.0, 0.0]),
        ("vimeo.com", [0.05, 0.95, 0.0]),
        ("twitch.tv", [0.1, 0.9, 0.0]),
        ("cnn.com", [0.0, 0.0, 1.0]),
        ("bbc.co.uk", [0.0, 0.05, 0.95]),
        ("nytimes.com", [0.05, 0.0, 0.95]),
    ]
    .into_iter()
    .map(|(domain, vector)| (domain.to_string(), vector.to_vec()))
    .collect()
}

/// Domains of the search cluster other than `google.com`.
pub fn search_neighbours() -> Vec<String> {
    ["bing.com", "duckduckgo.com", "yahoo.com"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Entries in the embedding-file format: `[{"domain", "vector"}]`.
pub fn catalog_json(entries: &[(String, Vec<f32>)]) -> String {
    let items: Vec<_> = entries
        .iter()
        .map(|(domain, vector)| json!({ "domain": domain, "vector": vector }))
        .collect();
    serde_json::Value::Array(items).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_shape() {
        let catalog = sample_catalog();
        assert_eq!(catalog.len(), 10);
        assert!(catalog.iter().all(|(_, v)| v.len() == 3));
    }

    #[test]
    fn test_catalog_json_is_array_of_items() {
        let value: serde_json::Value = serde_json::from_str(&catalog_json(&sample_catalog())).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 10);
        assert_eq!(items[0]["domain"], "google.com");
    }
}
