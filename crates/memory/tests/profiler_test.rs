use std::alloc::System;

use hala_prof_memory::ProfAlloc;
use hala_prof_timing::{Profiler, ALLOCATIONS};

#[global_allocator]
static ALLOC: ProfAlloc = ProfAlloc::new(System, &ALLOCATIONS);

#[test]
fn alloc_string() {
    const SIZE: usize = 1 << 20;

    let before = Profiler::global().allocated_bytes();

    let buf = std::hint::black_box(vec![0u8; SIZE]);
    let during = Profiler::global().allocated_bytes();

    drop(buf);
    let after = Profiler::global().allocated_bytes();

    assert!(during - before >= SIZE as i64);
    assert!(during - after >= SIZE as i64);

    for _ in 0..1000 {
        _ = format!("hello world {}", "===");
    }

    assert!(Profiler::global().snapshot().allocated_bytes() > 0);
}
