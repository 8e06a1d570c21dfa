use std::{collections::HashMap, fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Name of an instrumented code region.
///
/// A key may fold a parameter descriptor into the name, e.g. `parse(json)`, so that calls of
/// the same function with different inputs are aggregated separately.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionKey(String);

impl RegionKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Build `name(params)`, or just `name` when `params` is empty.
    pub fn with_params(name: &str, params: &str) -> Self {
        if params.is_empty() {
            Self(name.to_owned())
        } else {
            Self(format!("{name}({params})"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RegionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RegionKey {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for RegionKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&String> for RegionKey {
    fn from(value: &String) -> Self {
        Self(value.clone())
    }
}

impl From<&RegionKey> for RegionKey {
    fn from(value: &RegionKey) -> Self {
        value.clone()
    }
}

#[derive(Debug, Default)]
struct RegionState {
    /// Start offsets of open activations, innermost last. Its length is the region's depth.
    activations: Vec<Duration>,
    /// Accumulated nanoseconds; `None` until the first end or pause correction.
    total: Option<i64>,
}

/// All mutable timing state, kept behind a single lock by [`Profiler`](crate::Profiler).
///
/// Timestamps are passed in, so this type is clock agnostic.
#[derive(Debug, Default)]
pub(crate) struct RegionTable {
    regions: HashMap<RegionKey, RegionState>,
    paused_at: Option<Duration>,
}

impl RegionTable {
    pub(crate) fn start(&mut self, key: RegionKey, now: Duration) -> usize {
        let state = self.regions.entry(key).or_default();
        state.activations.push(now);
        state.activations.len()
    }

    /// Close the innermost activation of `key`.
    ///
    /// Returns `None` when `key` has no open activation. The elapsed time is returned even if
    /// it was discarded because the profiler is paused.
    pub(crate) fn end(&mut self, key: &RegionKey, now: Duration) -> Option<Duration> {
        let paused = self.paused_at.is_some();

        let state = self.regions.get_mut(key)?;
        let started = state.activations.pop()?;
        let elapsed = now.saturating_sub(started);

        if !paused {
            *state.total.get_or_insert(0) += nanos(elapsed);
        }

        Some(elapsed)
    }

    /// Returns `true` if a previous pause start was overwritten.
    pub(crate) fn pause(&mut self, now: Duration) -> bool {
        self.paused_at.replace(now).is_some()
    }

    /// Subtract the pause interval from every region open right now.
    ///
    /// Returns the interval, or `None` if the table was not paused.
    pub(crate) fn resume(&mut self, now: Duration) -> Option<Duration> {
        let paused_at = self.paused_at.take()?;
        let paused_for = now.saturating_sub(paused_at);

        for state in self.regions.values_mut() {
            if !state.activations.is_empty() {
                *state.total.get_or_insert(0) -= nanos(paused_for);
            }
        }

        Some(paused_for)
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub(crate) fn depth(&self, key: &RegionKey) -> usize {
        self.regions
            .get(key)
            .map(|state| state.activations.len())
            .unwrap_or_default()
    }

    /// Aggregate of `key` in nanoseconds.
    ///
    /// A pause that began before the region started is still subtracted in full on resume, so
    /// the stored value can be negative; every read clamps it at zero.
    pub(crate) fn total(&self, key: &RegionKey) -> Option<u64> {
        self.regions
            .get(key)
            .and_then(|state| state.total)
            .map(clamp)
    }

    /// Regions that have an aggregate, in no particular order.
    pub(crate) fn totals(&self) -> impl Iterator<Item = (&RegionKey, u64)> {
        self.regions
            .iter()
            .filter_map(|(key, state)| state.total.map(|total| (key, clamp(total))))
    }
}

#[inline]
fn nanos(duration: Duration) -> i64 {
    i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX)
}

#[inline]
fn clamp(total: i64) -> u64 {
    total.max(0) as u64
}
