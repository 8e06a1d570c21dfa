#![cfg(feature = "report")]

use hala_prof_timing::{end_profiling, profile_scope, start_profiling, Profiler};

fn fib(n: u64) -> u64 {
    profile_scope!("global::fib");

    if n < 2 {
        n
    } else {
        fib(n - 1) + fib(n - 2)
    }
}

fn lookup(table: &str) -> usize {
    profile_scope!("global::lookup", table);
    table.len()
}

#[test]
fn global_instance_through_macros() {
    start_profiling!("global::main");
    assert_eq!(fib(12), 144);
    lookup("users");
    lookup("");
    end_profiling!("global::main");

    // unmatched end is ignored.
    end_profiling!("global::main");

    hala_prof_timing::pause();
    assert!(Profiler::global().is_paused());
    hala_prof_timing::resume();
    assert!(!Profiler::global().is_paused());

    let snapshot = hala_prof_timing::snapshot();

    for key in [
        "global::main",
        "global::fib",
        "global::lookup(users)",
        "global::lookup",
    ] {
        assert!(snapshot.get(key).is_some(), "missing {key}");
        assert_eq!(Profiler::global().depth(key), 0);
    }

    let guard = hala_prof_timing::scope("global::guard");
    assert_eq!(Profiler::global().depth("global::guard"), 1);
    drop(guard);
    assert_eq!(Profiler::global().depth("global::guard"), 0);

    hala_prof_timing::print_results();
}
