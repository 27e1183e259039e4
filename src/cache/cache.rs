use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use tracing::debug;

use crate::aggregate::aggregate_unchecked;
use crate::config::CorridorConfig;
use crate::corridor::CorridorSet;
use crate::error::ConfigurationError;
use crate::record::{GeometryKind, PriorityRecord};

/// Identifies one aggregation: the caller's record-set version plus every
/// parameter that affects the result. Floats are keyed by bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub version: u64,
    pub kind: GeometryKind,
    priority_threshold: u64,
    /// `min_length_m` for segments, `n_min` for points.
    size_filter: u64,
    /// `adjacency_tolerance` for segments, `d_max` for points.
    reach: u64,
    include_aqi: bool,
}

impl CacheKey {
    pub fn new(version: u64, kind: GeometryKind, config: &CorridorConfig) -> Self {
        let (size_filter, reach) = match kind {
            GeometryKind::Segment => (config.min_length_m.to_bits(), config.adjacency_tolerance.to_bits()),
            GeometryKind::Point => (config.n_min as u64, config.d_max.to_bits()),
        };
        Self {
            version,
            kind,
            priority_threshold: config.priority_threshold.to_bits(),
            size_filter,
            reach,
            include_aqi: config.include_aqi,
        }
    }
}

type Cell = Arc<OnceLock<Arc<CorridorSet>>>;

/// Memoizes corridor sets per key. Owned by the caller; nothing is global.
///
/// Concurrent requests for the same key share one cell, so the aggregation
/// runs once and every caller receives the same `Arc`.
#[derive(Debug, Default)]
pub struct CorridorCache {
    cells: RwLock<HashMap<CacheKey, Cell>>,
}

impl CorridorCache {
    pub fn new() -> Self { Self::default() }

    /// Aggregate `records` for `version`, reusing a cached result when the
    /// key matches and `force_refresh` is false.
    pub fn aggregate(
        &self,
        version: u64,
        records: &[PriorityRecord],
        kind: GeometryKind,
        config: &CorridorConfig,
        force_refresh: bool,
    ) -> Result<Arc<CorridorSet>, ConfigurationError> {
        config.validate()?;
        let key = CacheKey::new(version, kind, config);
        Ok(self.get_or_insert_with(key, force_refresh, || aggregate_unchecked(records, kind, config)))
    }

    /// Return the cached set for `key`, computing it with `compute` on a miss.
    /// With `force_refresh` the existing entry is replaced first.
    pub fn get_or_insert_with<F>(&self, key: CacheKey, force_refresh: bool, compute: F) -> Arc<CorridorSet>
    where
        F: FnOnce() -> CorridorSet,
    {
        let cell = if force_refresh {
            let cell = Cell::default();
            self.write_cells().insert(key, cell.clone());
            debug!(version = key.version, kind = key.kind.as_str(), "cache refresh forced");
            cell
        } else {
            let existing = self.read_cells().get(&key).cloned();
            match existing {
                Some(cell) => cell,
                None => self.write_cells().entry(key).or_default().clone(),
            }
        };

        if let Some(set) = cell.get() {
            debug!(version = key.version, kind = key.kind.as_str(), "cache hit");
            return set.clone()
        }

        cell.get_or_init(|| {
            debug!(version = key.version, kind = key.kind.as_str(), "cache miss, aggregating");
            Arc::new(compute())
        }).clone()
    }

    /// Cached set for `key`, if one has completed.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<CorridorSet>> {
        self.read_cells().get(key).and_then(|cell| cell.get().cloned())
    }

    /// Drop every entry computed for `version`. Returns the number removed.
    pub fn invalidate(&self, version: u64) -> usize {
        let mut cells = self.write_cells();
        let before = cells.len();
        cells.retain(|key, _| key.version != version);
        before - cells.len()
    }

    pub fn clear(&self) { self.write_cells().clear() }

    pub fn len(&self) -> usize { self.read_cells().len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    // A poisoned lock only means another caller panicked while holding it;
    // the map itself is still consistent.
    fn read_cells(&self) -> std::sync::RwLockReadGuard<'_, HashMap<CacheKey, Cell>> {
        self.cells.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_cells(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<CacheKey, Cell>> {
        self.cells.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
