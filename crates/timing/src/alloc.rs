use std::sync::atomic::{AtomicI64, Ordering};

/// Running total of live heap bytes.
///
/// Updates are a single `fetch_add`/`fetch_sub`, so this is safe to call from inside a
/// [`GlobalAlloc`](std::alloc::GlobalAlloc) implementation: it never allocates, locks or logs.
///
/// The total is signed. Freeing memory that was allocated before the hook was installed makes
/// it dip below zero, which is expected.
#[derive(Debug, Default)]
pub struct AllocationCounter {
    total: AtomicI64,
}

impl AllocationCounter {
    /// Create a zeroed counter. Usable in `static` initializers.
    pub const fn new() -> Self {
        Self {
            total: AtomicI64::new(0),
        }
    }

    #[inline]
    pub fn record_allocation(&self, bytes: usize) {
        self.total.fetch_add(bytes as i64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_deallocation(&self, bytes: usize) {
        self.total.fetch_sub(bytes as i64, Ordering::Relaxed);
    }

    /// Current total in bytes.
    #[inline]
    pub fn total(&self) -> i64 {
        self.total.load(Ordering::Relaxed)
    }
}

/// The process-wide counter read by [`Profiler::global`](crate::Profiler::global).
///
/// Allocation hooks (such as `hala_prof_memory::ProfAlloc`) should report here.
pub static ALLOCATIONS: AllocationCounter = AllocationCounter::new();

/// Either the process-wide counter or one owned by a single profiler instance.
#[derive(Debug)]
pub(crate) enum CounterRef {
    Static(&'static AllocationCounter),
    Owned(AllocationCounter),
}

impl std::ops::Deref for CounterRef {
    type Target = AllocationCounter;

    fn deref(&self) -> &Self::Target {
        match self {
            CounterRef::Static(counter) => *counter,
            CounterRef::Owned(counter) => counter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deallocation_can_dip_below_zero() {
        let counter = AllocationCounter::new();
        counter.record_deallocation(16);
        assert_eq!(counter.total(), -16);
        counter.record_allocation(48);
        assert_eq!(counter.total(), 32);
    }
}
