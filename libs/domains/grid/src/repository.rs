use async_trait::async_trait;
use std::collections::HashSet;

use crate::error::GridResult;
use crate::models::{AssignmentMap, Coordinate};

/// Repository trait for coordinate assignments
///
/// Backends keep the one-to-one invariant between cells and domains and never
/// overwrite or remove an assignment.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Domain assigned to `coord`, if any
    async fn get(&self, coord: Coordinate) -> GridResult<Option<String>>;

    /// Record a new assignment
    ///
    /// Fails with `Conflict` when the cell or the domain is already taken.
    /// Durable backends persist before returning and roll back on failure.
    async fn put(&self, coord: Coordinate, domain: String) -> GridResult<()>;

    /// Assigned cell closest to `target` (Manhattan distance, lexicographic tie-break)
    async fn nearest_assigned(&self, target: Coordinate) -> GridResult<Coordinate>;

    /// All domains currently placed on the grid
    async fn assigned_domains(&self) -> GridResult<HashSet<String>>;

    /// Copy of the full map
    async fn snapshot(&self) -> GridResult<AssignmentMap>;

    /// Number of assigned cells
    async fn count(&self) -> GridResult<usize>;
}
