//! Embedding store and nearest-neighbour lookup.

mod cosine;
mod index;
mod store;

pub use cosine::CosineIndex;
#[cfg(test)]
pub use index::MockNeighborIndex;
pub use index::{collect_related, NeighborIndex};
pub use store::EmbeddingStore;
