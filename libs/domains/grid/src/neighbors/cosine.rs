use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

use super::index::NeighborIndex;
use super::store::EmbeddingStore;
use crate::error::{GridError, GridResult};

/// Brute-force cosine-similarity index.
///
/// Norms are computed once at construction. A zero-norm vector, stored or
/// queried, has similarity 0 with everything. Scans run on the blocking pool.
#[derive(Debug, Clone)]
pub struct CosineIndex {
    store: Arc<EmbeddingStore>,
    norms: Arc<[f32]>,
    domains: Arc<[String]>,
}

impl CosineIndex {
    pub fn new(store: EmbeddingStore) -> Self {
        let norms = store.items().iter().map(|i| norm(&i.vector)).collect();
        let domains = store.items().iter().map(|i| i.domain.clone()).collect();

        Self {
            store: Arc::new(store),
            norms,
            domains,
        }
    }

    pub fn store(&self) -> &EmbeddingStore {
        &self.store
    }

    /// Store positions ranked by decreasing similarity to `query`.
    fn rank(&self, query: &[f32], k: usize) -> Vec<usize> {
        let query_norm = norm(query);

        let mut scored: Vec<(usize, f32)> = self
            .store
            .items()
            .iter()
            .zip(self.norms.iter())
            .enumerate()
            .map(|(idx, (item, item_norm))| {
                let denom = query_norm * item_norm;
                let similarity = dot(query, &item.vector) / denom;
                // Zero norms and overflowed products score 0; this also folds -0.0 into 0.0.
                if denom == 0.0 || similarity.is_nan() || similarity == 0.0 {
                    (idx, 0.0)
                } else {
                    (idx, similarity)
                }
            })
            .collect();

        // Stable sort keeps store order among equal similarities.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);
        scored.into_iter().map(|(idx, _)| idx).collect()
    }
}

#[async_trait]
impl NeighborIndex for CosineIndex {
    #[instrument(skip(self, vectors), fields(queries = vectors.len(), k))]
    async fn query(&self, vectors: Vec<Vec<f32>>, k: usize) -> GridResult<Vec<Vec<String>>> {
        let dimension = self.store.dimension();
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(GridError::Validation(format!(
                "Query vector has dimension {}, expected {}",
                bad.len(),
                dimension
            )));
        }

        let k = k.min(self.store.len());
        let index = self.clone();

        let ranked = tokio::task::spawn_blocking(move || {
            vectors
                .iter()
                .map(|v| {
                    index
                        .rank(v, k)
                        .into_iter()
                        .map(|idx| index.domains[idx].clone())
                        .collect()
                })
                .collect()
        })
        .await?;

        Ok(ranked)
    }

    fn vector_for(&self, domain: &str) -> Option<Vec<f32>> {
        self.store.vector_for(domain).map(<[f32]>::to_vec)
    }

    fn contains(&self, domain: &str) -> bool {
        self.store.position(domain).is_some()
    }

    fn domains(&self) -> Arc<[String]> {
        Arc::clone(&self.domains)
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(v: &[f32]) -> f32 {
    dot(v, v).sqrt()
}
