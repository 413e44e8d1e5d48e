//! uartbench command-line runner.
//!
//! This binary runs the harness scenarios against the built-in device models. It performs:
//! 1. **Scenario selection:** One subcommand per scenario, or `all`.
//! 2. **Configuration:** Optional JSON config; defaults otherwise.
//! 3. **Programs:** Optional assembler source replacing the cpu scenario's bootstrap program.
//! 4. **Reporting:** Failed expectations on stdout, exit status 0 on pass and 1 on failure.
//!
//! Log verbosity follows `RUST_LOG` (default `warn`).

use std::path::{Path, PathBuf};
use std::{fs, process};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use uartbench_core::config::HarnessConfig;
use uartbench_core::sim::loader::Program;
use uartbench_core::sim::scenario::{self, ScenarioKind, ScenarioReport};

#[derive(Parser, Debug)]
#[command(
    name = "uartbench",
    author,
    version,
    about = "Bit-accurate UART harness for clock-stepped device models",
    long_about = "Drive the UART echo, UART+FIFO and serial-loaded CPU models through the \
                  frame encoder/decoder and check what comes back.\n\nExamples:\n  \
                  uartbench uart\n  uartbench tx-fifo --config bench.json\n  \
                  uartbench cpu --program boot.s\n  uartbench all"
)]
struct Cli {
    /// JSON configuration file (missing fields take their defaults).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print run statistics after each scenario.
    #[arg(long, global = true)]
    stats: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Echo one vector through the UART loopback.
    Uart,
    /// Send three vectors through the UART+FIFO and check it drains.
    UartFifo,
    /// Send twelve vectors through the UART+FIFO and check the pointers wrap.
    TxFifo,
    /// Load a program into the serial CPU and check its reply and state.
    Cpu {
        /// Assembler source replacing the bootstrap program.
        #[arg(long)]
        program: Option<PathBuf>,
    },
    /// Run every scenario.
    All,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => {
            let config = HarnessConfig::from_file(path).unwrap_or_else(|e| {
                eprintln!("Error: {}: {e}", path.display());
                process::exit(1);
            });
            tracing::info!(path = %path.display(), baud = config.timing.baud_interval, "loaded config");
            config
        }
        None => HarnessConfig::default(),
    };

    let (kinds, program) = match cli.command {
        Commands::Uart => (vec![ScenarioKind::Uart], None),
        Commands::UartFifo => (vec![ScenarioKind::UartFifo], None),
        Commands::TxFifo => (vec![ScenarioKind::TxFifo], None),
        Commands::Cpu { program } => (vec![ScenarioKind::Cpu], program.map(|p| load_program(&p))),
        Commands::All => (ScenarioKind::ALL.to_vec(), None),
    };

    let reports: Vec<ScenarioReport> = kinds
        .into_iter()
        .map(|kind| {
            let report = scenario::run(kind, &config, program.as_ref());
            tracing::info!(
                scenario = %kind,
                passed = report.passed(),
                cycles = report.stats.cycles,
                "scenario finished"
            );
            report
        })
        .collect();

    let mut failed = 0;
    for report in &reports {
        print_report(report, cli.stats);
        if !report.passed() {
            failed += 1;
        }
    }
    if failed > 0 {
        println!("{failed} of {} scenarios failed", reports.len());
        process::exit(1);
    }
}

/// Reads and assembles `path`, exiting with status 1 on error.
fn load_program(path: &Path) -> Program {
    let source = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", path.display());
        process::exit(1);
    });
    let program = Program::from_source(&source).unwrap_or_else(|e| {
        eprintln!("Error: {}: {e}", path.display());
        process::exit(1);
    });
    tracing::debug!(path = %path.display(), words = program.len(), "assembled program");
    program
}

fn print_report(report: &ScenarioReport, stats: bool) {
    if report.passed() {
        println!("{} pass", report.kind);
    } else {
        println!("{} FAIL", report.kind);
        for fault in &report.failures {
            println!("  {fault}");
        }
    }
    if stats {
        println!("{}", report.stats.render());
    }
}
