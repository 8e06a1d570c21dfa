use std::{
    alloc::System,
    io,
    path::PathBuf,
    process::ExitCode,
    thread,
    time::Duration,
};

use clap::Parser;
use hala_prof_memory::ProfAlloc;
use hala_prof_timing::{
    dump_csv, end_profiling, export_csv, profile_scope, start_profiling, write_text, ALLOCATIONS,
};

#[global_allocator]
static ALLOC: ProfAlloc = ProfAlloc::new(System, &ALLOCATIONS);

/// Run an instrumented workload and report where the time went.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Argument of the recursive fibonacci region.
    #[arg(long, default_value_t = 20)]
    depth: u64,

    /// Worker threads, each timed under its own region.
    #[arg(long, default_value_t = 4)]
    threads: usize,

    /// Rounds of work per thread.
    #[arg(long, default_value_t = 3)]
    iterations: usize,

    /// Idle time excluded from all open regions, in milliseconds.
    #[arg(long, default_value_t = 50)]
    pause_ms: u64,

    /// Write the delimited report to this file.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write a timestamped delimited report into this directory.
    #[arg(long)]
    dump_dir: Option<PathBuf>,
}

fn fib(n: u64) -> u64 {
    profile_scope!("fib");

    if n < 2 {
        n
    } else {
        fib(n - 1) + fib(n - 2)
    }
}

fn worker(id: usize, iterations: usize) -> usize {
    profile_scope!("worker", &id.to_string());

    (0..iterations)
        .map(|round| {
            let items = (0..1000).map(|i| format!("{id}:{round}:{i}")).collect::<Vec<_>>();
            items.iter().map(String::len).sum::<usize>()
        })
        .sum()
}

fn run(cli: &Cli) {
    start_profiling!("session");

    let value = fib(cli.depth);
    log::info!("fib({}) = {value}", cli.depth);

    let handles = (0..cli.threads)
        .map(|id| {
            let iterations = cli.iterations;
            thread::spawn(move || worker(id, iterations))
        })
        .collect::<Vec<_>>();

    for handle in handles {
        match handle.join() {
            Ok(bytes) => log::debug!("worker produced {bytes} bytes"),
            Err(_) => log::error!("worker panicked"),
        }
    }

    // stands in for waiting on user input.
    hala_prof_timing::pause();
    thread::sleep(Duration::from_millis(cli.pause_ms));
    hala_prof_timing::resume();

    end_profiling!("session");
}

fn main() -> ExitCode {
    pretty_env_logger::init();

    let cli = Cli::parse();

    log::debug!("{cli:?}");

    run(&cli);

    let snapshot = hala_prof_timing::snapshot();

    if let Err(err) = write_text(&snapshot, io::stdout().lock()) {
        log::error!("failed printing profile: {err}");
    }

    let mut status = ExitCode::SUCCESS;

    if let Some(path) = &cli.output {
        match export_csv(&snapshot, path) {
            Ok(()) => log::info!("profile written to {path:?}"),
            Err(err) => {
                eprintln!("{err}");
                status = ExitCode::FAILURE;
            }
        }
    }

    if let Some(dir) = &cli.dump_dir {
        match dump_csv(&snapshot, dir) {
            Ok(path) => log::info!("profile written to {path:?}"),
            Err(err) => {
                eprintln!("{err}");
                status = ExitCode::FAILURE;
            }
        }
    }

    status
}
