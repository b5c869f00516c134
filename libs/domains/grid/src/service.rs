use observability::PlacementMetrics;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::config::PlacementConfig;
use crate::error::{GridError, GridResult};
use crate::models::{AssignmentMap, Coordinate};
use crate::neighbors::NeighborIndex;
use crate::random::RandomSource;
use crate::repository::AssignmentRepository;

/// Highest `top_n` accepted by [`PlacementService::related_embeddings`].
pub const MAX_RELATED_TOP_N: usize = 100;

/// Service layer for lazy, similarity-driven grid placement
///
/// Reads go straight to the repository. Every mutation is serialized through
/// one async mutex and re-checks the registry after acquiring it, so two
/// callers racing for the same cell both observe the single winner.
pub struct PlacementService<R: AssignmentRepository, N: NeighborIndex> {
    repository: Arc<R>,
    index: Arc<N>,
    random: Arc<dyn RandomSource>,
    top_n: usize,
    seed_domain: String,
    adapter_timeout: Duration,
    allocation: Mutex<()>,
}

impl<R: AssignmentRepository, N: NeighborIndex> PlacementService<R, N> {
    pub fn new(
        repository: R,
        index: N,
        random: Arc<dyn RandomSource>,
        config: &PlacementConfig,
    ) -> Self {
        Self {
            repository: Arc::new(repository),
            index: Arc::new(index),
            random,
            top_n: config.top_n,
            seed_domain: config.seed_domain.clone(),
            adapter_timeout: config.adapter_timeout,
            allocation: Mutex::new(()),
        }
    }

    pub fn seed_domain(&self) -> &str {
        &self.seed_domain
    }

    /// Domain at `target`, allocating one grown from the cell nearest `source`
    /// when the target is still empty.
    #[instrument(skip_all, fields(%target, %source))]
    pub async fn resolve(&self, target: Coordinate, source: Coordinate) -> GridResult<String> {
        if let Some(domain) = self.repository.get(target).await? {
            PlacementMetrics::record_hit();
            return Ok(domain);
        }

        let _guard = self.allocation.lock().await;

        // Another caller may have filled the cell while we waited.
        if let Some(domain) = self.repository.get(target).await? {
            PlacementMetrics::record_hit();
            return Ok(domain);
        }

        PlacementMetrics::record_miss();
        self.allocate_locked(target, source)
            .await
            .inspect_err(|e| PlacementMetrics::record_failure(e.kind()))
    }

    /// Assign a fresh domain to the empty cell `target`.
    ///
    /// Fails with `Conflict` if `target` is already assigned.
    #[instrument(skip_all, fields(%target, %source))]
    pub async fn allocate(&self, target: Coordinate, source: Coordinate) -> GridResult<String> {
        let _guard = self.allocation.lock().await;

        let result = match self.repository.get(target).await? {
            Some(existing) => Err(GridError::Conflict(format!(
                "Coordinate {} is already assigned to {}",
                target, existing
            ))),
            None => self.allocate_locked(target, source).await,
        };

        result.inspect_err(|e| PlacementMetrics::record_failure(e.kind()))
    }

    async fn allocate_locked(&self, target: Coordinate, source: Coordinate) -> GridResult<String> {
        let anchor = match self.repository.nearest_assigned(source).await {
            Ok(anchor) => anchor,
            Err(GridError::EmptyRegistry) => return Err(GridError::NoAnchor),
            Err(e) => return Err(e),
        };

        let anchor_domain = self.repository.get(anchor).await?.ok_or_else(|| {
            GridError::Internal(format!("Nearest cell {} has no domain", anchor))
        })?;
        debug!(%anchor, %anchor_domain, "Expanding from nearest assigned cell");

        let exclude = self.repository.assigned_domains().await?;
        let candidates = self
            .related_with_timeout(vec![anchor_domain], self.top_n, exclude)
            .await?;

        let selected = self
            .random
            .pick_one(&candidates)
            .cloned()
            .ok_or(GridError::ExhaustedCandidates { anchor })?;

        self.repository.put(target, selected.clone()).await?;
        self.record_placement("allocate").await;

        info!(%target, %anchor, domain = %selected, "Allocated coordinate");
        Ok(selected)
    }

    /// Place the first domain at the origin, grown from `seed_domain`.
    ///
    /// Returns the existing origin domain unchanged when already seeded.
    #[instrument(skip(self))]
    pub async fn seed(&self, seed_domain: &str) -> GridResult<String> {
        self.seed_inner(seed_domain)
            .await
            .inspect_err(|e| PlacementMetrics::record_failure(e.kind()))
    }

    /// [`seed`](Self::seed) with the configured seed domain.
    pub async fn seed_default(&self) -> GridResult<String> {
        self.seed(&self.seed_domain).await
    }

    async fn seed_inner(&self, seed_domain: &str) -> GridResult<String> {
        if !self.index.contains(seed_domain) {
            return Err(GridError::UnknownSeed(seed_domain.to_string()));
        }

        if let Some(domain) = self.repository.get(Coordinate::ORIGIN).await? {
            return Ok(domain);
        }

        let _guard = self.allocation.lock().await;

        if let Some(domain) = self.repository.get(Coordinate::ORIGIN).await? {
            return Ok(domain);
        }

        let exclude = self.repository.assigned_domains().await?;
        let candidates = self
            .related_with_timeout(vec![seed_domain.to_string()], self.top_n, exclude)
            .await?;

        let selected = self
            .random
            .pick_one(&candidates)
            .cloned()
            .ok_or(GridError::ExhaustedCandidates {
                anchor: Coordinate::ORIGIN,
            })?;

        self.repository
            .put(Coordinate::ORIGIN, selected.clone())
            .await?;
        self.record_placement("seed").await;

        info!(%seed_domain, domain = %selected, "Seeded grid origin");
        Ok(selected)
    }

    /// Uniformly random domain from the embedding store.
    pub fn random_domain(&self) -> GridResult<String> {
        let domains = self.index.domains();
        self.random
            .pick_one(&domains)
            .cloned()
            .ok_or_else(|| GridError::Embedding("Embedding store is empty".to_string()))
    }

    /// For each known domain, its `top_n` nearest other domains.
    ///
    /// Assigned domains are not excluded; unknown domains are left out of the
    /// result.
    #[instrument(skip(self, domains), fields(requested = domains.len()))]
    pub async fn related_embeddings(
        &self,
        domains: Vec<String>,
        top_n: usize,
    ) -> GridResult<BTreeMap<String, Vec<String>>> {
        if !(1..=MAX_RELATED_TOP_N).contains(&top_n) {
            return Err(GridError::Validation(format!(
                "top_n must be between 1 and {}, got {}",
                MAX_RELATED_TOP_N, top_n
            )));
        }

        let mut related = BTreeMap::new();
        for domain in domains {
            if related.contains_key(&domain) {
                continue;
            }
            if !self.index.contains(&domain) {
                debug!(%domain, "Skipping domain unknown to the embedding store");
                continue;
            }

            let neighbours = self
                .related_with_timeout(vec![domain.clone()], top_n, HashSet::new())
                .await?;
            related.insert(domain, neighbours);
        }

        Ok(related)
    }

    /// Copy of every assignment.
    pub async fn assignments(&self) -> GridResult<AssignmentMap> {
        let snapshot = self.repository.snapshot().await?;
        PlacementMetrics::set_assigned_coordinates(snapshot.len());
        Ok(snapshot)
    }

    /// Number of domains the neighbour index can serve.
    pub fn embedding_count(&self) -> usize {
        self.index.domains().len()
    }

    /// Repository reachability, for readiness probes.
    pub async fn check_ready(&self) -> GridResult<usize> {
        self.repository.count().await
    }

    async fn related_with_timeout(
        &self,
        seeds: Vec<String>,
        top_n: usize,
        exclude: HashSet<String>,
    ) -> GridResult<Vec<String>> {
        let started = Instant::now();
        let result = tokio::time::timeout(
            self.adapter_timeout,
            self.index.related_domains(seeds, top_n, exclude),
        )
        .await;
        PlacementMetrics::record_neighbor_query(started.elapsed());

        match result {
            Ok(related) => related,
            Err(_) => {
                warn!(timeout = ?self.adapter_timeout, "Neighbour query timed out");
                Err(GridError::AdapterTimeout(self.adapter_timeout))
            }
        }
    }

    async fn record_placement(&self, operation: &'static str) {
        PlacementMetrics::record_allocation(operation);
        if let Ok(count) = self.repository.count().await {
            PlacementMetrics::set_assigned_coordinates(count);
        }
    }
}
