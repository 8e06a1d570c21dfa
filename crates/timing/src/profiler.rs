use std::{
    sync::{Mutex, MutexGuard, OnceLock, PoisonError},
    time::{Duration, SystemTime},
};

use crate::{
    alloc::CounterRef, region::RegionTable, AllocationCounter, Clock, MonotonicClock, RegionKey,
    RegionTotal, Snapshot, ALLOCATIONS,
};

/// Region timing engine.
///
/// All timing state sits behind one lock: a pause correction can never interleave with an
/// `end_region` computing its elapsed time. The allocation total is a separate atomic.
pub struct Profiler {
    clock: Box<dyn Clock>,
    table: Mutex<RegionTable>,
    allocations: CounterRef,
}

impl Profiler {
    /// Create a profiler with a [`MonotonicClock`] and its own allocation counter.
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new())
    }

    /// Create a profiler reading timestamps from `clock`.
    pub fn with_clock<C: Clock + 'static>(clock: C) -> Self {
        Self {
            clock: Box::new(clock),
            table: Default::default(),
            allocations: CounterRef::Owned(AllocationCounter::new()),
        }
    }

    /// Read the allocation total from a shared counter, typically the one an allocation hook
    /// reports to.
    pub fn with_counter(mut self, counter: &'static AllocationCounter) -> Self {
        self.allocations = CounterRef::Static(counter);
        self
    }

    /// The process-wide instance, created on first use and bound to [`ALLOCATIONS`].
    pub fn global() -> &'static Profiler {
        static GLOBAL: OnceLock<Profiler> = OnceLock::new();

        GLOBAL.get_or_init(|| Profiler::new().with_counter(&ALLOCATIONS))
    }

    fn table(&self) -> MutexGuard<'_, RegionTable> {
        // a panic inside an instrumented region must not disable profiling.
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a new activation of `key`.
    pub fn start_region(&self, key: impl Into<RegionKey>) {
        let key = key.into();
        let mut table = self.table();
        let now = self.clock.now();

        log::trace!("start region {key} at {now:?}");

        table.start(key, now);
    }

    /// Close the innermost open activation of `key`.
    ///
    /// Does nothing if `key` has no open activation.
    pub fn end_region(&self, key: impl Into<RegionKey>) {
        let key = key.into();
        let mut table = self.table();
        let now = self.clock.now();

        match table.end(&key, now) {
            Some(elapsed) => log::trace!("end region {key}, elapsed {elapsed:?}"),
            None => log::debug!("end region {key} without matching start, ignored"),
        }
    }

    /// Open `key` and return a guard that closes it when dropped.
    ///
    /// ```
    /// use hala_prof_timing::Profiler;
    ///
    /// let profiler = Profiler::new();
    /// {
    ///     let _guard = profiler.scope("load");
    ///     assert_eq!(profiler.depth("load"), 1);
    /// }
    /// assert_eq!(profiler.depth("load"), 0);
    /// ```
    pub fn scope(&self, key: impl Into<RegionKey>) -> RegionGuard<'_> {
        let key = key.into();
        self.start_region(&key);

        RegionGuard {
            profiler: self,
            key: Some(key),
        }
    }

    /// Run `f` inside region `key`.
    pub fn measure<F, R>(&self, key: impl Into<RegionKey>, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = self.scope(key);
        f()
    }

    /// Stop accruing time until [`resume`](Self::resume).
    ///
    /// Pausing again while paused moves the pause start to now.
    pub fn pause(&self) {
        let mut table = self.table();
        let now = self.clock.now();

        if table.pause(now) {
            log::debug!("pause while already paused, pause start reset to {now:?}");
        }
    }

    /// Leave the paused state, removing the paused interval from every open region.
    ///
    /// Does nothing if not paused.
    pub fn resume(&self) {
        let mut table = self.table();
        let now = self.clock.now();

        match table.resume(now) {
            Some(paused_for) => log::trace!("resume after {paused_for:?}"),
            None => log::debug!("resume without pause, ignored"),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.table().is_paused()
    }

    /// Number of open activations of `key`.
    pub fn depth(&self, key: impl Into<RegionKey>) -> usize {
        self.table().depth(&key.into())
    }

    /// Accumulated time of `key`, or `None` if it never completed an activation or received a
    /// pause correction.
    pub fn total(&self, key: impl Into<RegionKey>) -> Option<Duration> {
        self.table()
            .total(&key.into())
            .map(Duration::from_nanos)
    }

    #[inline]
    pub fn record_allocation(&self, bytes: usize) {
        self.allocations.record_allocation(bytes);
    }

    #[inline]
    pub fn record_deallocation(&self, bytes: usize) {
        self.allocations.record_deallocation(bytes);
    }

    pub fn allocated_bytes(&self) -> i64 {
        self.allocations.total()
    }

    /// Copy the current aggregates and allocation total.
    pub fn snapshot(&self) -> Snapshot {
        let regions = {
            let table = self.table();

            table
                .totals()
                .map(|(key, nanos)| RegionTotal::new(key.clone(), nanos))
                .collect::<Vec<_>>()
        };

        Snapshot::from_parts(SystemTime::now(), regions, self.allocations.total())
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Closes its region when dropped, including during unwinding.
#[must_use = "the region ends as soon as the guard is dropped"]
pub struct RegionGuard<'a> {
    profiler: &'a Profiler,
    key: Option<RegionKey>,
}

impl RegionGuard<'_> {
    pub fn key(&self) -> Option<&RegionKey> {
        self.key.as_ref()
    }

    /// End the region now instead of at scope exit.
    pub fn end(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if let Some(key) = self.key.take() {
            self.profiler.end_region(key);
        }
    }
}

impl Drop for RegionGuard<'_> {
    fn drop(&mut self) {
        self.finish();
    }
}
