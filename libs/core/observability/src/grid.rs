//! Placement metrics for the domain grid.

use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Placement metrics recorder
pub struct PlacementMetrics;

impl PlacementMetrics {
    /// A coordinate received its domain. `operation` is "allocate" or "seed".
    pub fn record_allocation(operation: &'static str) {
        counter!("grid_allocations_total", "operation" => operation).increment(1);
    }

    /// `resolve` answered from the registry without allocating.
    pub fn record_hit() {
        counter!("grid_resolutions_total", "outcome" => "hit").increment(1);
    }

    /// `resolve` had to allocate.
    pub fn record_miss() {
        counter!("grid_resolutions_total", "outcome" => "allocated").increment(1);
    }

    /// A placement failed; `kind` is a stable snake_case error name.
    pub fn record_failure(kind: &'static str) {
        counter!("grid_placement_failures_total", "kind" => kind).increment(1);

        tracing::debug!(kind, "Placement failure recorded");
    }

    pub fn record_neighbor_query(duration: Duration) {
        histogram!("grid_neighbor_query_duration_seconds").record(duration.as_secs_f64());
    }

    pub fn set_assigned_coordinates(count: usize) {
        gauge!("grid_assigned_coordinates").set(count as f64);
    }

    pub fn set_embeddings_loaded(count: usize) {
        gauge!("grid_embeddings_loaded").set(count as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Without an installed recorder these are no-ops; they must never panic.
    #[test]
    fn test_recording_without_recorder_is_noop() {
        PlacementMetrics::record_allocation("seed");
        PlacementMetrics::record_hit();
        PlacementMetrics::record_miss();
        PlacementMetrics::record_failure("exhausted_candidates");
        PlacementMetrics::record_neighbor_query(Duration::from_millis(3));
        PlacementMetrics::set_assigned_coordinates(4);
        PlacementMetrics::set_embeddings_loaded(1000);
    }
}
