#![cfg(feature = "report")]

use std::{fs, sync::Arc, time::Duration};

use hala_prof_timing::{
    dump_csv, export_csv, format_csv, format_text, ManualClock, ProfError, Profiler, Snapshot,
    CSV_HEADER,
};

fn sample() -> Snapshot {
    let clock = Arc::new(ManualClock::new());
    let profiler = Profiler::with_clock(clock.clone());

    profiler.start_region("load");
    clock.advance(Duration::from_micros(1500));
    profiler.end_region("load");

    profiler.start_region("parse, json");
    clock.advance(Duration::from_millis(2));
    profiler.end_region("parse, json");

    profiler.record_allocation(4096);
    profiler.record_deallocation(1024);

    profiler.snapshot()
}

#[test]
fn text_report_lists_regions_and_allocation() {
    let text = format_text(&sample());

    assert_eq!(
        text,
        "Profiling Results:\n\
         Function: load | Time: 1.500 ms\n\
         Function: parse, json | Time: 2.000 ms\n\
         Total allocated: 3072 bytes\n"
    );
}

#[test]
fn csv_has_header_rows_and_allocation_trailer() {
    let csv = format_csv(&sample());

    assert_eq!(
        csv,
        "Function,Time (ms)\n\
         load,1.500\n\
         \"parse, json\",2.000\n\
         Total Allocated (bytes),3072\n"
    );
}

#[test]
fn empty_snapshot_exports_header_and_zero_total() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");

    export_csv(&Profiler::new().snapshot(), &path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines = content.lines().collect::<Vec<_>>();

    assert_eq!(lines, [CSV_HEADER, "Total Allocated (bytes),0"]);
}

#[test]
fn export_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profile.csv");

    fs::write(&path, "stale content that is much longer than the new export\n".repeat(50))
        .unwrap();

    export_csv(&sample(), &path).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), format_csv(&sample()));
}

#[test]
fn export_to_unwritable_path_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("profile.csv");

    let err = export_csv(&sample(), &path).unwrap_err();

    match err {
        ProfError::Open { path: failed, .. } => assert_eq!(failed, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn dump_names_file_after_capture_time() {
    let dir = tempfile::tempdir().unwrap();

    let path = dump_csv(&sample(), dir.path()).unwrap();

    assert_eq!(path.parent(), Some(dir.path()));

    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("profile."));
    assert!(name.ends_with(".csv"));
    assert!(!name.contains(':'));

    assert!(fs::read_to_string(&path).unwrap().starts_with(CSV_HEADER));
}

#[test]
fn overcorrected_region_exports_as_zero() {
    let clock = Arc::new(ManualClock::new());
    let profiler = Profiler::with_clock(clock.clone());

    profiler.pause();
    clock.set(Duration::from_millis(10));
    profiler.start_region("g");
    clock.set(Duration::from_millis(30));
    profiler.resume();

    assert!(format_csv(&profiler.snapshot()).contains("\ng,0.000\n"));

    clock.set(Duration::from_millis(35));
    profiler.end_region("g");

    let snapshot = profiler.snapshot();
    assert!(format_csv(&snapshot).contains("\ng,0.000\n"));
    assert!(format_text(&snapshot).contains("Function: g | Time: 0.000 ms\n"));
}

#[test]
fn snapshot_survives_json_round_trip() {
    let snapshot = sample();

    let json = serde_json::to_string(&snapshot).unwrap();
    let decoded: Snapshot = serde_json::from_str(&json).unwrap();

    assert_eq!(decoded, snapshot);
    assert_eq!(decoded.get("load").map(|t| t.millis()), Some(1.5));
    assert_eq!(decoded.allocated_bytes(), 3072);
}
