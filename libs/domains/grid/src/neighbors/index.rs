use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::GridResult;

/// k-nearest-neighbour lookup over the embedding store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NeighborIndex: Send + Sync {
    /// One ranked list of domains per query vector, most similar first.
    ///
    /// `k` is clamped to the number of stored domains.
    async fn query(&self, vectors: Vec<Vec<f32>>, k: usize) -> GridResult<Vec<Vec<String>>>;

    /// Up to `top_n` domains related to `seeds`, skipping the seeds themselves
    /// and anything in `exclude`.
    ///
    /// Seeds unknown to the store are ignored. Each known seed's ranked list
    /// is walked in seed order until `top_n` domains have been collected.
    async fn related_domains(
        &self,
        seeds: Vec<String>,
        top_n: usize,
        exclude: HashSet<String>,
    ) -> GridResult<Vec<String>> {
        if top_n == 0 {
            return Ok(Vec::new());
        }

        let vectors: Vec<Vec<f32>> = seeds.iter().filter_map(|d| self.vector_for(d)).collect();
        if vectors.is_empty() {
            return Ok(Vec::new());
        }

        let k = top_n + seeds.len() + exclude.len();
        let ranked = self.query(vectors, k).await?;

        Ok(collect_related(&seeds, ranked, top_n, &exclude))
    }

    /// Embedding of `domain`, if it is in the store.
    fn vector_for(&self, domain: &str) -> Option<Vec<f32>>;

    fn contains(&self, domain: &str) -> bool;

    /// Every stored domain, in store order.
    fn domains(&self) -> Arc<[String]>;
}

/// Merge ranked neighbour lists into at most `top_n` fresh domains.
pub fn collect_related(
    seeds: &[String],
    ranked: Vec<Vec<String>>,
    top_n: usize,
    exclude: &HashSet<String>,
) -> Vec<String> {
    let mut related: Vec<String> = Vec::with_capacity(top_n);

    for domain in ranked.into_iter().flatten() {
        if related.len() >= top_n {
            break;
        }
        if seeds.contains(&domain) || exclude.contains(&domain) || related.contains(&domain) {
            continue;
        }
        related.push(domain);
    }

    related
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_collect_related_skips_seeds_and_excluded() {
        let seeds = strings(&["a.com"]);
        let exclude: HashSet<String> = strings(&["c.com"]).into_iter().collect();
        let ranked = vec![strings(&["a.com", "b.com", "c.com", "d.com", "e.com"])];

        let related = collect_related(&seeds, ranked, 5, &exclude);
        assert_eq!(related, strings(&["b.com", "d.com", "e.com"]));
    }

    #[test]
    fn test_collect_related_stops_at_top_n() {
        let seeds = strings(&["a.com", "x.com"]);
        let ranked = vec![
            strings(&["a.com", "b.com", "c.com"]),
            strings(&["x.com", "b.com", "y.com"]),
        ];

        let related = collect_related(&seeds, ranked.clone(), 3, &HashSet::new());
        assert_eq!(related, strings(&["b.com", "c.com", "y.com"]));

        let related = collect_related(&seeds, ranked, 1, &HashSet::new());
        assert_eq!(related, strings(&["b.com"]));
    }

    #[tokio::test]
    async fn test_related_domains_overfetches_and_skips_unknown_seeds() {
        let mut index = MockNeighborIndex::new();
        index
            .expect_vector_for()
            .returning(|d| (d == "a.com").then(|| vec![1.0, 0.0]));
        index
            .expect_query()
            .withf(|vectors, k| vectors.len() == 1 && *k == 2 + 2 + 1)
            .times(1)
            .returning(|_, _| Ok(vec![vec!["a.com".into(), "z.com".into(), "b.com".into()]]));

        let exclude: HashSet<String> = ["z.com".to_string()].into_iter().collect();
        let related = collect_via_default(&index, strings(&["a.com", "ghost.com"]), 2, exclude)
            .await
            .unwrap();

        assert_eq!(related, strings(&["b.com"]));
    }

    #[tokio::test]
    async fn test_related_domains_without_known_seeds_is_empty() {
        let mut index = MockNeighborIndex::new();
        index.expect_vector_for().returning(|_| None);
        index.expect_query().never();

        let related = collect_via_default(&index, strings(&["ghost.com"]), 5, HashSet::new())
            .await
            .unwrap();
        assert!(related.is_empty());
    }

    /// The mock replaces provided methods too, so drive the default body
    /// through a thin wrapper that only forwards the required ones.
    async fn collect_via_default(
        inner: &MockNeighborIndex,
        seeds: Vec<String>,
        top_n: usize,
        exclude: HashSet<String>,
    ) -> GridResult<Vec<String>> {
        struct Forward<'a>(&'a MockNeighborIndex);

        #[async_trait]
        impl NeighborIndex for Forward<'_> {
            async fn query(
                &self,
                vectors: Vec<Vec<f32>>,
                k: usize,
            ) -> GridResult<Vec<Vec<String>>> {
                self.0.query(vectors, k).await
            }

            fn vector_for(&self, domain: &str) -> Option<Vec<f32>> {
                self.0.vector_for(domain)
            }

            fn contains(&self, domain: &str) -> bool {
                self.0.contains(domain)
            }

            fn domains(&self) -> Arc<[String]> {
                self.0.domains()
            }
        }

        Forward(inner).related_domains(seeds, top_n, exclude).await
    }
}
