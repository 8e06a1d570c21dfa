//! An implementation of [`GlobalAlloc`] that reports every allocation and deallocation to an
//! [`AllocationCounter`], usually the process-wide [`ALLOCATIONS`] read by
//! [`Profiler::global`](hala_prof_timing::Profiler::global).
//!
//! The below code enables allocation tracking in rust programs.
//!
//! ```no_run
//! use std::alloc::System;
//!
//! use hala_prof_memory::ProfAlloc;
//! use hala_prof_timing::ALLOCATIONS;
//!
//! #[global_allocator]
//! static ALLOC: ProfAlloc = ProfAlloc::new(System, &ALLOCATIONS);
//! ```
//!
//! Installing the allocator is optional: without it the profiler behaves the same, and the
//! allocation total stays at zero.
//!
//! [`GlobalAlloc`]: std::alloc::GlobalAlloc
//! [`AllocationCounter`]: hala_prof_timing::AllocationCounter
//! [`ALLOCATIONS`]: hala_prof_timing::ALLOCATIONS

#![cfg_attr(docsrs, feature(doc_cfg))]

mod profiler;
pub use profiler::*;
