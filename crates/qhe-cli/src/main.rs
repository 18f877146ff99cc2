//! QHE Command-Line Interface
//!
//! Compile circuits into the Clifford+T basis, synthesize rotations with
//! gridsynth, and run the homomorphic protocol end to end on the local
//! simulator.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{compile, oracle, run, synth, version};

/// QHE - quantum homomorphic encryption toolkit
#[derive(Parser)]
#[command(name = "qhe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the gridsynth binary (defaults to ~/.cqc_qhe/bin/gridsynth)
    #[arg(long, env = "QHE_GRIDSYNTH", global = true)]
    gridsynth: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the gridsynth rotation oracle
    Oracle {
        #[command(subcommand)]
        action: OracleAction,
    },

    /// Synthesize a single Rz angle into Clifford+T
    Synth {
        /// Rotation angle in radians
        #[arg(allow_hyphen_values = true)]
        angle: f64,

        /// Approximation error
        #[arg(short = 'e', long)]
        tolerance: Option<f64>,

        /// Oracle seed
        #[arg(short = 'r', long, default_value = "32")]
        seed: u64,

        /// Keep SSS and SS runs as emitted
        #[arg(long)]
        no_collapse: bool,
    },

    /// Compile a JSON circuit into the fixed basis
    Compile {
        /// Input circuit (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (defaults to <input>_compiled.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Total synthesis error for the whole circuit
        #[arg(long, conflicts_with = "error_gate")]
        error_circuit: Option<f64>,

        /// Synthesis error for each rotation
        #[arg(long)]
        error_gate: Option<f64>,

        /// Place the ancilla register before the circuit's own registers
        #[arg(long)]
        ancilla_top: bool,

        /// Leave rz/p gates in place
        #[arg(long)]
        no_rotations: bool,

        /// Oracle seed
        #[arg(long, default_value = "32")]
        seed: u64,
    },

    /// Encrypt, simulate and decrypt a circuit
    Run {
        /// Client state preparation (JSON)
        #[arg(long)]
        init: Option<PathBuf>,

        /// Server circuit (JSON)
        #[arg(long)]
        main: PathBuf,

        /// Qubits to measure, comma separated (e.g. 0,1)
        #[arg(long, value_delimiter = ',')]
        measure: Vec<u32>,

        /// Number of shots
        #[arg(short, long, env = "QHE_SHOTS", default_value = "1024")]
        shots: u32,

        /// Bell pair policy (shared, fresh)
        #[arg(long, default_value = "shared", value_parser = run::parse_policy)]
        policy: qhe_protocol::AncillaPolicy,

        /// Simulator seed
        #[arg(long)]
        seed: Option<u64>,

        /// Print machine-readable output
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum OracleAction {
    /// Download gridsynth into ~/.cqc_qhe/bin
    Install {
        /// Skip the license confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Remove the installed binary
    Uninstall,

    /// Report whether an oracle is usable
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let gridsynth = cli.gridsynth.as_deref();
    let result = match cli.command {
        Commands::Oracle { action } => match action {
            OracleAction::Install { yes } => oracle::execute_install(yes).await,
            OracleAction::Uninstall => oracle::execute_uninstall(),
            OracleAction::Check => {
                oracle::execute_check(gridsynth);
                Ok(())
            }
        },

        Commands::Synth {
            angle,
            tolerance,
            seed,
            no_collapse,
        } => synth::execute(angle, tolerance, seed, !no_collapse, gridsynth),

        Commands::Compile {
            input,
            output,
            error_circuit,
            error_gate,
            ancilla_top,
            no_rotations,
            seed,
        } => compile::execute(&compile::CompileArgs {
            input,
            output,
            error_circuit,
            error_gate,
            ancilla_top,
            no_rotations,
            seed,
            gridsynth: gridsynth.map(PathBuf::from),
        }),

        Commands::Run {
            init,
            main,
            measure,
            shots,
            policy,
            seed,
            json,
        } => {
            run::execute(&run::RunArgs {
                init,
                main,
                measure,
                shots,
                policy,
                seed,
                json,
                gridsynth: gridsynth.map(PathBuf::from),
            })
            .await
        }

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
