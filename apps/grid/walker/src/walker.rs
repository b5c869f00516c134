use domain_grid::models::to_keyed;
use domain_grid::{AssignmentMap, Coordinate, RandomSource};
use eyre::{Result, WrapErr};
use std::path::Path;
use tracing::{debug, warn};

use crate::client::GridClient;

/// Up, down, right, left.
pub const DIRECTIONS: [(i64, i64); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Outcome of a walk.
#[derive(Debug, Default)]
pub struct WalkSummary {
    /// Every cell that answered, with its domain.
    pub visited: AssignmentMap,
    /// Steps whose request failed.
    pub failures: usize,
}

/// Request `steps` cells along a random walk from `start`.
///
/// Each cell is requested with itself as the source. Failed requests are
/// logged and skipped; the walk moves on either way.
pub async fn walk<C>(
    client: &C,
    random: &dyn RandomSource,
    start: Coordinate,
    steps: usize,
) -> WalkSummary
where
    C: GridClient + ?Sized,
{
    let mut summary = WalkSummary::default();
    let mut current = start;

    for step in 0..steps {
        match client.resolve(current, current).await {
            Ok(domain) => {
                debug!(step, %current, %domain, "Visited cell");
                summary.visited.insert(current, domain);
            }
            Err(e) => {
                warn!(step, %current, "Error: {:#}", e);
                summary.failures += 1;
            }
        }

        let (dx, dy) = DIRECTIONS[random.pick_index(DIRECTIONS.len()).unwrap_or(0)];
        current = Coordinate::new(current.x.saturating_add(dx), current.y.saturating_add(dy));
    }

    summary
}

/// Write `visited` as a `{"x,y": "domain"}` JSON object.
pub async fn save(path: &Path, visited: &AssignmentMap) -> Result<()> {
    let body = serde_json::to_vec(&to_keyed(visited))?;
    tokio::fs::write(path, body)
        .await
        .wrap_err_with(|| format!("Failed to write {}", path.display()))
}
