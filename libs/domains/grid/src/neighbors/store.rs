use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::error::{GridError, GridResult};
use crate::models::Item;

/// Ordered, immutable set of domain embeddings.
///
/// Positions are stable for the lifetime of the store and double as the
/// tie-break order for equal similarities.
#[derive(Debug, Clone)]
pub struct EmbeddingStore {
    items: Vec<Item>,
    positions: HashMap<String, usize>,
    dimension: usize,
}

impl EmbeddingStore {
    /// Build a store, rejecting empty input, empty or mismatched vectors,
    /// non-finite components and duplicate domains.
    pub fn from_items(items: Vec<Item>) -> GridResult<Self> {
        let Some(first) = items.first() else {
            return Err(GridError::Embedding("Embedding set is empty".to_string()));
        };

        let dimension = first.vector.len();
        if dimension == 0 {
            return Err(GridError::Embedding(format!(
                "Embedding for {} has no components",
                first.domain
            )));
        }

        let mut positions = HashMap::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            if item.vector.len() != dimension {
                return Err(GridError::Embedding(format!(
                    "Embedding for {} has dimension {}, expected {}",
                    item.domain,
                    item.vector.len(),
                    dimension
                )));
            }

            if item.vector.iter().any(|c| !c.is_finite()) {
                return Err(GridError::Embedding(format!(
                    "Embedding for {} has a non-finite component",
                    item.domain
                )));
            }

            if positions.insert(item.domain.clone(), idx).is_some() {
                return Err(GridError::Embedding(format!(
                    "Duplicate domain in embedding set: {}",
                    item.domain
                )));
            }
        }

        Ok(Self {
            items,
            positions,
            dimension,
        })
    }

    /// Load a JSON array of `{"domain", "vector"}` objects.
    pub async fn load(path: impl AsRef<Path>) -> GridResult<Self> {
        let path = path.as_ref();

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            GridError::Embedding(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let items: Vec<Item> = serde_json::from_slice(&bytes).map_err(|e| {
            GridError::Embedding(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        let store = Self::from_items(items)?;
        info!(
            path = %path.display(),
            domains = store.len(),
            dimension = store.dimension(),
            "Loaded embedding store"
        );
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn position(&self, domain: &str) -> Option<usize> {
        self.positions.get(domain).copied()
    }

    pub fn vector_for(&self, domain: &str) -> Option<&[f32]> {
        self.position(domain)
            .map(|idx| self.items[idx].vector.as_slice())
    }
}
