//! Wall-clock timing of named code regions, with support for nested and recursive
//! activations, process-wide pause/resume and a running heap allocation total.
//!
//! ```
//! use hala_prof_timing::Profiler;
//!
//! let profiler = Profiler::new();
//!
//! profiler.start_region("load");
//! {
//!     let _guard = profiler.scope("parse");
//!     // working...
//! }
//! profiler.end_region("load");
//!
//! let snapshot = profiler.snapshot();
//! assert!(snapshot.get("load").is_some());
//! assert!(snapshot.get("parse").is_some());
//! ```
//!
//! Most programs use the process-wide instance through the free functions and macros of
//! this crate:
//!
//! ```no_run
//! use hala_prof_timing::{end_profiling, profile_scope, start_profiling};
//!
//! fn fib(n: u64) -> u64 {
//!     profile_scope!("fib");
//!     if n < 2 { n } else { fib(n - 1) + fib(n - 2) }
//! }
//!
//! start_profiling!("main");
//! fib(20);
//! end_profiling!("main");
//!
//! hala_prof_timing::print_results();
//! ```
//!
//! Time spent while paused (waiting on user input, say) is excluded from every region that
//! is open across the pause. The allocation total stays at zero unless an allocation hook,
//! such as `hala_prof_memory::ProfAlloc`, reports to [`ALLOCATIONS`].

#![cfg_attr(docsrs, feature(doc_cfg))]

mod alloc;
mod clock;
mod error;
mod profiler;
mod region;
mod snapshot;

pub use alloc::{AllocationCounter, ALLOCATIONS};
pub use clock::*;
pub use error::*;
pub use profiler::*;
pub use region::RegionKey;
pub use snapshot::*;

#[cfg(feature = "report")]
#[cfg_attr(docsrs, doc(cfg(feature = "report")))]
mod report;

#[cfg(feature = "report")]
pub use report::*;

/// Open `key` on the global profiler.
#[inline]
pub fn start_region(key: impl Into<RegionKey>) {
    Profiler::global().start_region(key)
}

/// Close the innermost activation of `key` on the global profiler.
#[inline]
pub fn end_region(key: impl Into<RegionKey>) {
    Profiler::global().end_region(key)
}

/// Open `key` on the global profiler until the returned guard drops.
#[inline]
pub fn scope(key: impl Into<RegionKey>) -> RegionGuard<'static> {
    Profiler::global().scope(key)
}

#[inline]
pub fn pause() {
    Profiler::global().pause()
}

#[inline]
pub fn resume() {
    Profiler::global().resume()
}

/// Snapshot of the global profiler.
#[inline]
pub fn snapshot() -> Snapshot {
    Profiler::global().snapshot()
}

#[macro_export]
macro_rules! start_profiling {
    ($name:expr) => {
        $crate::start_region($name)
    };
}

#[macro_export]
macro_rules! end_profiling {
    ($name:expr) => {
        $crate::end_region($name)
    };
}

/// Time the rest of the enclosing block on the global profiler.
///
/// An optional second argument is folded into the key, see [`RegionKey::with_params`].
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        let _region_guard = $crate::scope($name);
    };
    ($name:expr, $params:expr) => {
        let _region_guard = $crate::scope($crate::RegionKey::with_params($name, $params));
    };
}
