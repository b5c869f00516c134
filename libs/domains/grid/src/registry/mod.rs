//! Coordinate → domain assignments.
//!
//! [`AssignmentRegistry`] is the plain in-memory structure holding the
//! one-to-one invariant. The repository backends wrap it with locking and,
//! for [`JsonFileAssignmentRepository`], durability.

mod json_file;
mod memory;

pub use json_file::JsonFileAssignmentRepository;
pub use memory::InMemoryAssignmentRepository;

use std::collections::{BTreeMap, HashSet};

use crate::error::{GridError, GridResult};
use crate::models::{AssignmentMap, Coordinate};

/// Append-only map from coordinates to domains.
///
/// `assigned` always equals the set of values in `coordinates`.
#[derive(Debug, Default, Clone)]
pub struct AssignmentRegistry {
    coordinates: AssignmentMap,
    assigned: HashSet<String>,
}

impl AssignmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a persisted `{"x,y": "domain"}` snapshot.
    ///
    /// Malformed keys and a domain held by two cells are both reported as
    /// storage corruption.
    pub fn from_keyed(snapshot: BTreeMap<String, String>) -> GridResult<Self> {
        let mut registry = Self::new();

        for (key, domain) in snapshot {
            let coord: Coordinate = key
                .parse()
                .map_err(|e: GridError| GridError::Storage(format!("Corrupt snapshot: {}", e)))?;

            registry
                .insert(coord, domain)
                .map_err(|e| GridError::Storage(format!("Corrupt snapshot: {}", e)))?;
        }

        Ok(registry)
    }

    pub fn get(&self, coord: &Coordinate) -> Option<&String> {
        self.coordinates.get(coord)
    }

    pub fn contains_domain(&self, domain: &str) -> bool {
        self.assigned.contains(domain)
    }

    /// Add an assignment, refusing to overwrite a cell or reuse a domain.
    pub fn insert(&mut self, coord: Coordinate, domain: String) -> GridResult<()> {
        if let Some(existing) = self.coordinates.get(&coord) {
            return Err(GridError::Conflict(format!(
                "Coordinate {} is already assigned to {}",
                coord, existing
            )));
        }

        if self.assigned.contains(&domain) {
            return Err(GridError::Conflict(format!(
                "Domain {} is already assigned",
                domain
            )));
        }

        self.assigned.insert(domain.clone());
        self.coordinates.insert(coord, domain);
        Ok(())
    }

    /// Undo an [`insert`](Self::insert) whose persistence failed.
    pub(crate) fn revert(&mut self, coord: &Coordinate) {
        if let Some(domain) = self.coordinates.remove(coord) {
            self.assigned.remove(&domain);
        }
    }

    /// Assigned cell closest to `target` by Manhattan distance.
    ///
    /// Ties go to the lexicographically smallest `(x, y)`.
    pub fn nearest(&self, target: &Coordinate) -> Option<Coordinate> {
        self.coordinates
            .keys()
            .min_by_key(|coord| (coord.manhattan_distance(target), **coord))
            .copied()
    }

    pub fn assigned_domains(&self) -> HashSet<String> {
        self.assigned.clone()
    }

    pub fn snapshot(&self) -> AssignmentMap {
        self.coordinates.clone()
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}
