use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::AssignmentRegistry;
use crate::error::{GridError, GridResult};
use crate::models::{AssignmentMap, Coordinate};
use crate::repository::AssignmentRepository;

/// In-memory implementation of AssignmentRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryAssignmentRepository {
    registry: Arc<RwLock<AssignmentRegistry>>,
}

impl InMemoryAssignmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing registry
    pub fn with_registry(registry: AssignmentRegistry) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
        }
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryAssignmentRepository {
    async fn get(&self, coord: Coordinate) -> GridResult<Option<String>> {
        let registry = self.registry.read().await;
        Ok(registry.get(&coord).cloned())
    }

    async fn put(&self, coord: Coordinate, domain: String) -> GridResult<()> {
        let mut registry = self.registry.write().await;
        registry.insert(coord, domain.clone())?;

        tracing::info!(%coord, %domain, "Assigned coordinate");
        Ok(())
    }

    async fn nearest_assigned(&self, target: Coordinate) -> GridResult<Coordinate> {
        let registry = self.registry.read().await;
        registry.nearest(&target).ok_or(GridError::EmptyRegistry)
    }

    async fn assigned_domains(&self) -> GridResult<HashSet<String>> {
        let registry = self.registry.read().await;
        Ok(registry.assigned_domains())
    }

    async fn snapshot(&self) -> GridResult<AssignmentMap> {
        let registry = self.registry.read().await;
        Ok(registry.snapshot())
    }

    async fn count(&self) -> GridResult<usize> {
        let registry = self.registry.read().await;
        Ok(registry.len())
    }
}
