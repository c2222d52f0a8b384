//! MMU translation and swap simulator CLI.

use clap::Parser;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;

use pagesim::config::{Config, Policy};
use pagesim::core::Mmu;
use pagesim::sim::event_log::{EventLog, LogFormat};
use pagesim::sim::events::{EventSink, NullSink};
use pagesim::sim::loader::{self, Trace};
use pagesim::sim::workload::{self, DEFAULT_ACCESSES, Distribution};

#[derive(Parser, Debug)]
#[command(
    name = "pagesim",
    author,
    version,
    about = "MMU translation and swap simulator",
    long_about = None,
)]
struct Cli {
    /// Replacement policy for both TLB and frame eviction (RR or LRU).
    #[arg(short = 'p', long, value_parser = Policy::from_str)]
    policy: Option<Policy>,

    /// Access trace to simulate.
    #[arg(short = 'f', long, conflicts_with = "generate")]
    file: Option<PathBuf>,

    /// Event log written during simulation.
    #[arg(short = 'l', long, requires = "file")]
    log: Option<PathBuf>,

    /// Event log format (text or json).
    #[arg(long, value_parser = LogFormat::from_str, default_value = "text")]
    log_format: LogFormat,

    /// JSON config file; command-line flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write final statistics as JSON to this path.
    #[arg(long, requires = "file")]
    stats_json: Option<PathBuf>,

    /// Report every translation event through the logger (set RUST_LOG=trace).
    #[arg(long)]
    trace: bool,

    /// Generate a synthetic trace (uniform or zipfian) instead of simulating.
    #[arg(long, value_name = "DIST", conflicts_with_all = ["file", "log", "policy"])]
    generate: Option<String>,

    /// Zipfian skew, must be > 0.
    #[arg(short = 's', long, default_value_t = 1.0)]
    skew: f64,

    /// Number of accesses to generate.
    #[arg(short = 'n', long, default_value_t = DEFAULT_ACCESSES)]
    count: usize,

    /// Seed for the trace generator.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Output path for the generated trace.
    #[arg(short = 'o', long, requires = "generate")]
    output: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Some(dist) = cli.generate.as_deref() {
        cmd_generate(&cli, dist);
    } else if let Some(file) = cli.file.as_deref() {
        cmd_run(&cli, file);
    } else {
        eprintln!(
            "\n\x1b[1;31merror:\x1b[0m one of \x1b[1m--file\x1b[0m or \x1b[1m--generate\x1b[0m is required\n"
        );
        eprintln!("\x1b[1;33mUsage:\x1b[0m");
        eprintln!(
            "  \x1b[1;36mpagesim\x1b[0m \x1b[32m-p\x1b[0m <RR|LRU> \x1b[32m-f\x1b[0m <trace> \x1b[32m-l\x1b[0m <log>        \x1b[2mSimulate\x1b[0m"
        );
        eprintln!(
            "  \x1b[1;36mpagesim\x1b[0m \x1b[32m--generate\x1b[0m <uniform|zipfian> \x1b[32m-o\x1b[0m <trace>   \x1b[2mGenerate trace\x1b[0m"
        );
        eprintln!();
        eprintln!("Run \x1b[1mpagesim --help\x1b[0m for full usage information.");
        process::exit(1);
    }
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("\x1b[1;31merror:\x1b[0m {}", msg);
    process::exit(1);
}

fn resolve_config(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path).unwrap_or_else(|e| fail(e)),
        None => Config::default(),
    };

    match cli.policy {
        Some(policy) => config.memory.policy = policy,
        None if cli.config.is_none() => {
            fail("--policy is required unless a --config file sets memory.policy")
        }
        None => {}
    }
    config.general.trace |= cli.trace;
    log::debug!("effective config: {config:?}");
    config
}

fn cmd_generate(cli: &Cli, dist: &str) {
    let dist = Distribution::from_name(dist, cli.skew).unwrap_or_else(|e| fail(e));
    let trace = workload::generate(dist, cli.count, cli.seed);

    match &cli.output {
        Some(path) => {
            loader::write_trace(path, &trace).unwrap_or_else(|e| fail(e));
            println!(
                "[*] Generated {} accesses in '{}' ({dist}, seed {})",
                trace.addresses.len(),
                path.display(),
                cli.seed
            );
        }
        None => {
            print!("{}", trace.render());
        }
    }
}

fn open_log(path: &Path, format: LogFormat) -> EventLog<BufWriter<File>> {
    let file = File::create(path)
        .unwrap_or_else(|e| fail(format!("cannot create log {}: {e}", path.display())));
    EventLog::new(BufWriter::new(file), format)
}

fn close_log(log: Option<EventLog<BufWriter<File>>>) {
    if let Some(log) = log {
        if let Err(e) = log.finish() {
            eprintln!("\x1b[1;33mwarning:\x1b[0m event log incomplete: {e}");
        }
    }
}

fn cmd_run(cli: &Cli, file: &Path) {
    let config = resolve_config(cli);
    let trace: Trace = loader::load_trace(file).unwrap_or_else(|e| fail(e));

    let mut mmu = Mmu::new(&config);
    let mut log = cli.log.as_deref().map(|path| open_log(path, cli.log_format));
    let mut null = NullSink;

    println!(
        "[*] Simulating {} accesses from '{}' ({} policy)",
        trace.addresses.len(),
        file.display(),
        mmu.policy()
    );

    let mut fatal = None;
    {
        let sink: &mut dyn EventSink = match log.as_mut() {
            Some(log) => log,
            None => &mut null,
        };
        for &va in &trace.addresses {
            if let Err(e) = mmu.translate(va, sink) {
                fatal = Some((va, e));
                break;
            }
        }
    }
    close_log(log);

    let stats = mmu.stats();
    if let Some((va, e)) = fatal {
        eprintln!("\n\x1b[1;31m[!] FATAL:\x1b[0m translating {va}: {e}");
        mmu.dump_state();
        stats.print();
        process::exit(1);
    }

    stats.print();
    if let Some(path) = &cli.stats_json {
        let json = serde_json::to_string_pretty(&stats.to_json()).unwrap_or_else(|e| fail(e));
        fs::write(path, json + "\n")
            .unwrap_or_else(|e| fail(format!("cannot write {}: {e}", path.display())));
    }
    std::io::stdout().flush().ok();
}
