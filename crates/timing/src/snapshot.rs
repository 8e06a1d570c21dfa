use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::RegionKey;

/// Accumulated time of one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionTotal {
    key: RegionKey,
    nanos: u64,
}

impl RegionTotal {
    pub fn new(key: RegionKey, nanos: u64) -> Self {
        Self { key, nanos }
    }

    pub fn key(&self) -> &RegionKey {
        &self.key
    }

    pub fn nanos(&self) -> u64 {
        self.nanos
    }

    pub fn millis(&self) -> f64 {
        self.nanos as f64 / 1_000_000.0
    }

    pub fn duration(&self) -> Duration {
        Duration::from_nanos(self.nanos)
    }
}

/// Immutable copy of a profiler's aggregates and allocation total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    taken_at: SystemTime,
    regions: Vec<RegionTotal>,
    allocated_bytes: i64,
}

impl Snapshot {
    /// Assemble a snapshot; regions are sorted by key.
    pub fn from_parts<I>(taken_at: SystemTime, regions: I, allocated_bytes: i64) -> Self
    where
        I: IntoIterator<Item = RegionTotal>,
    {
        let mut regions = regions.into_iter().collect::<Vec<_>>();
        regions.sort_by(|a, b| a.key.cmp(&b.key));

        Self {
            taken_at,
            regions,
            allocated_bytes,
        }
    }

    /// Wall-clock time of capture.
    pub fn taken_at(&self) -> SystemTime {
        self.taken_at
    }

    /// Region totals in key order.
    pub fn regions(&self) -> &[RegionTotal] {
        &self.regions
    }

    pub fn get(&self, key: &str) -> Option<&RegionTotal> {
        self.regions
            .binary_search_by(|total| total.key.as_str().cmp(key))
            .ok()
            .map(|index| &self.regions[index])
    }

    pub fn allocated_bytes(&self) -> i64 {
        self.allocated_bytes
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
