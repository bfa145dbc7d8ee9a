//! Simulation runner — seeds a demo ledger and drives the standard catalog.
//!
//! # Subcommands
//!
//! - `run` — Execute a closed-loop simulation against an in-memory ledger.
//! - `show` — Render a previously saved run report.

use std::ffi::OsString;
use std::io::{self, Write as _};
use std::path::PathBuf;

use ledgersim::{
    LEDGERSIM_SEED, MemLedger, RunReport, SimConfig, SimDriver, derive_domain_seed,
    ops::standard_catalog,
};
use ledgersim_types::SimAccount;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{EnvFilter, fmt};

// ── CLI Types ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct RunnerOpts {
    verbose: bool,
    json_output: bool,
    seed: u64,
    invocations: u64,
    accounts: u32,
    kind: String,
    report_path: Option<PathBuf>,
    records_path: Option<PathBuf>,
}

impl Default for RunnerOpts {
    fn default() -> Self {
        let defaults = SimConfig::default();
        Self {
            verbose: false,
            json_output: false,
            seed: LEDGERSIM_SEED,
            invocations: defaults.invocations,
            accounts: 8,
            kind: defaults.kind_filter,
            report_path: None,
            records_path: None,
        }
    }
}

// ── Main ─────────────────────────────────────────────────────────────────

fn main() {
    let exit_code = run_cli(std::env::args_os());
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run_cli<I>(os_args: I) -> i32
where
    I: IntoIterator<Item = OsString>,
{
    let raw: Vec<String> = os_args
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();

    let tail = if raw.len() > 1 { &raw[1..] } else { &[] };

    if tail.is_empty() || tail.iter().any(|a| a == "-h" || a == "--help") {
        print_help();
        return 0;
    }

    // Parse options + find subcommand.
    let mut opts = RunnerOpts::default();
    let mut subcmd_idx = None;

    for (i, arg) in tail.iter().enumerate() {
        match arg.as_str() {
            "--verbose" | "-v" => opts.verbose = true,
            "--json" => opts.json_output = true,
            "--seed" => {
                if i + 1 < tail.len() {
                    if let Ok(s) = tail[i + 1].parse::<u64>() {
                        opts.seed = s;
                    }
                }
            }
            "--invocations" => {
                if i + 1 < tail.len() {
                    if let Ok(n) = tail[i + 1].parse::<u64>() {
                        opts.invocations = n;
                    }
                }
            }
            "--accounts" => {
                if i + 1 < tail.len() {
                    if let Ok(n) = tail[i + 1].parse::<u32>() {
                        opts.accounts = n;
                    }
                }
            }
            "--kind" => {
                if i + 1 < tail.len() {
                    opts.kind = tail[i + 1].clone();
                }
            }
            "--report" => {
                if i + 1 < tail.len() {
                    opts.report_path = Some(PathBuf::from(&tail[i + 1]));
                }
            }
            "--records" => {
                if i + 1 < tail.len() {
                    opts.records_path = Some(PathBuf::from(&tail[i + 1]));
                }
            }
            "run" | "show" => {
                if subcmd_idx.is_none() {
                    subcmd_idx = Some(i);
                }
            }
            _ => {
                // Skip option values (already consumed above).
            }
        }
    }

    let Some(idx) = subcmd_idx else {
        eprintln!("error: no subcommand specified");
        eprintln!();
        print_help();
        return 2;
    };

    init_logging(opts.verbose);

    match tail[idx].as_str() {
        "run" => cmd_run(&opts),
        "show" => cmd_show(&opts),
        _ => {
            eprintln!("error: unknown subcommand");
            2
        }
    }
}

fn print_help() {
    let text = "\
sim_runner — randomized ledger operation simulation

USAGE:
    sim_runner [OPTIONS] <SUBCOMMAND>

SUBCOMMANDS:
    run     Seed a demo ledger and drive the standard operation catalog
    show    Render a saved run report (requires --report <FILE>)

OPTIONS:
    --seed <N>            Base RNG seed (default: the LEDGSIM constant)
    --invocations <N>     Generator invocations to drive (default: 256)
    --accounts <N>        Harness accounts to derive (default: 8)
    --kind <NAME>         Collection kind to target (default: credit)
    --report <FILE>       Save (run) or read (show) the report JSON
    --records <FILE>      Write per-invocation outcome records as JSONL
    --json                Print the full report JSON instead of a summary
    --verbose, -v         Enable DEBUG-level logging
    -h, --help            Show this help message
";
    let _ = io::stdout().write_all(text.as_bytes());
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).compact())
        .init();
}

// ── Subcommands ──────────────────────────────────────────────────────────

fn cmd_run(opts: &RunnerOpts) -> i32 {
    let config = SimConfig {
        seed: opts.seed,
        invocations: opts.invocations,
        kind_filter: opts.kind.clone(),
        ..SimConfig::default()
    };

    let catalog = match standard_catalog() {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("error: {err}");
            return err.exit_code();
        }
    };
    let driver = match SimDriver::new(catalog, config) {
        Ok(driver) => driver,
        Err(err) => {
            eprintln!("error: {err}");
            return err.exit_code();
        }
    };

    let accounts = SimAccount::deterministic_set(opts.accounts);
    let ledger = MemLedger::demo_genesis(
        derive_domain_seed(opts.seed, "genesis"),
        &accounts,
        &driver.config().kind_filter,
    );

    let report = driver.run(&ledger, &ledger, &ledger, &accounts);

    if let Some(path) = &opts.report_path {
        if let Err(err) = report.save_json(path) {
            eprintln!("error: {err}");
            return err.exit_code();
        }
    }
    if let Some(path) = &opts.records_path {
        let jsonl = match report.records_jsonl() {
            Ok(jsonl) => jsonl,
            Err(err) => {
                eprintln!("error: {err}");
                return err.exit_code();
            }
        };
        if let Err(err) = std::fs::write(path, jsonl) {
            let err = ledgersim::SimError::from(err);
            eprintln!("error: {err}");
            return err.exit_code();
        }
    }

    render_report(opts, &report)
}

fn cmd_show(opts: &RunnerOpts) -> i32 {
    let Some(path) = &opts.report_path else {
        eprintln!("error: show requires --report <FILE>");
        return 2;
    };
    match RunReport::load_json(path) {
        Ok(report) => render_report(opts, &report),
        Err(err) => {
            eprintln!("error: {err}");
            err.exit_code()
        }
    }
}

fn render_report(opts: &RunnerOpts, report: &RunReport) -> i32 {
    if opts.json_output {
        match report.to_json() {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: {err}");
                return err.exit_code();
            }
        }
    } else {
        print_summary(report);
    }
    i32::from(!report.ok)
}

fn print_summary(report: &RunReport) {
    println!("simulation run: seed {}", report.config.seed);
    println!(
        "  invocations {}  success {}  skips {}  errors {}  ({} ms)",
        report.invocations, report.success, report.skips, report.errors, report.duration_ms
    );
    if !report.skip_reasons.is_empty() {
        println!("  skip reasons:");
        for (reason, count) in &report.skip_reasons {
            println!("    {reason:<26} {count}");
        }
    }
    println!("  per kind:");
    for (kind, tally) in &report.per_kind {
        println!(
            "    {kind:<26} selected {:>4}  success {:>4}  skip {:>4}  error {:>4}",
            tally.selected, tally.success, tally.skip, tally.error
        );
    }
    for failure in &report.failures {
        println!(
            "  FAILED invocation {} [{} / {} / {}]: {}",
            failure.invocation, failure.kind, failure.stage, failure.category, failure.detail
        );
    }
    println!("  result: {}", if report.ok { "OK" } else { "FAILED" });
}
