use std::alloc::{GlobalAlloc, Layout, System};

use hala_prof_timing::AllocationCounter;

/// An implementation of [`GlobalAlloc`] that counts live heap bytes.
///
/// Requests are forwarded to `A`; successful ones are reported to the counter. The hook path
/// only performs atomic adds, so it can't recurse into the allocator.
pub struct ProfAlloc<A = System> {
    inner: A,
    counter: &'static AllocationCounter,
}

impl<A> ProfAlloc<A> {
    /// Wrap `inner`, reporting to `counter`.
    pub const fn new(inner: A, counter: &'static AllocationCounter) -> Self {
        Self { inner, counter }
    }

    pub fn counter(&self) -> &'static AllocationCounter {
        self.counter
    }
}

unsafe impl<A: GlobalAlloc> GlobalAlloc for ProfAlloc<A> {
    #[inline]
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { self.inner.alloc(layout) };

        if !ptr.is_null() {
            self.counter.record_allocation(layout.size());
        }

        ptr
    }

    #[inline]
    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { self.inner.alloc_zeroed(layout) };

        if !ptr.is_null() {
            self.counter.record_allocation(layout.size());
        }

        ptr
    }

    #[inline]
    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { self.inner.dealloc(ptr, layout) };

        self.counter.record_deallocation(layout.size());
    }

    #[inline]
    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { self.inner.realloc(ptr, layout, new_size) };

        // on failure the old block is still live.
        if !new_ptr.is_null() {
            self.counter.record_deallocation(layout.size());
            self.counter.record_allocation(new_size);
        }

        new_ptr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_live_bytes() {
        static COUNTER: AllocationCounter = AllocationCounter::new();

        let alloc = ProfAlloc::new(System, &COUNTER);
        let layout = Layout::from_size_align(256, 8).unwrap();

        unsafe {
            let ptr = alloc.alloc(layout);
            assert!(!ptr.is_null());
            assert_eq!(COUNTER.total(), 256);

            let zeroed = alloc.alloc_zeroed(layout);
            assert!(!zeroed.is_null());
            assert_eq!(COUNTER.total(), 512);
            alloc.dealloc(zeroed, layout);

            let grown = alloc.realloc(ptr, layout, 1024);
            assert!(!grown.is_null());
            assert_eq!(COUNTER.total(), 1024);

            alloc.dealloc(grown, Layout::from_size_align(1024, 8).unwrap());
        }

        assert_eq!(COUNTER.total(), 0);
    }
}
