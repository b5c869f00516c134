//! Grid Domain
//!
//! Lazily places website domains on an infinite 2D grid so that neighbouring
//! cells hold semantically related domains.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ PlacementService │  ← resolve / allocate / seed, one mutation at a time
//! └───┬──────────┬───┘
//!     │          │
//! ┌───▼────────┐ ┌▼──────────────┐
//! │ Assignment │ │ NeighborIndex │  ← cosine k-NN over the EmbeddingStore
//! │ Repository │ └───────────────┘
//! └───┬────────┘
//!     │
//! ┌───▼──────────────────────────┐
//! │ InMemory / JsonFile registry │  ← coordinate → domain, one-to-one
//! └──────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_grid::{
//!     CosineIndex, EmbeddingStore, JsonFileAssignmentRepository, PlacementConfig,
//!     PlacementService, ThreadRandom,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PlacementConfig::default();
//! let store = EmbeddingStore::load(&config.embeddings_path).await?;
//! let repository = JsonFileAssignmentRepository::open(&config.state_path).await?;
//!
//! let service = PlacementService::new(
//!     repository,
//!     CosineIndex::new(store),
//!     Arc::new(ThreadRandom),
//!     &config,
//! );
//! let origin = service.seed_default().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod neighbors;
pub mod random;
pub mod registry;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use config::PlacementConfig;
pub use error::{GridError, GridResult};
pub use handlers::ApiDoc;
pub use models::{
    AssignmentMap, Coordinate, DomainResponse, Item, RelatedEmbeddingsRequest, ResolveRequest,
};
pub use neighbors::{CosineIndex, EmbeddingStore, NeighborIndex};
pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use registry::{AssignmentRegistry, InMemoryAssignmentRepository, JsonFileAssignmentRepository};
pub use repository::AssignmentRepository;
pub use service::PlacementService;
