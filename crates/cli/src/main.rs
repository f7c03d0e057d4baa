//! RISC-V dynamic binary translator CLI.
//!
//! This binary provides a single entry point for the translator. It performs:
//! 1. **Model listing:** Print the registered CPU models.
//! 2. **Run:** Load an image, dispatch translated blocks until a stop, then dump state.
//! 3. **Translate:** Build the block at one address and print its IR.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rvdbt_core::common::{Error, VirtAddr};
use rvdbt_core::config::Config;
use rvdbt_core::core::list_models;
use rvdbt_core::{Engine, StopReason};

#[derive(Parser, Debug)]
#[command(
    name = "dbt",
    author,
    version,
    about = "RISC-V dynamic binary translator",
    long_about = "Translate and run RV64 guest code block by block.\n\nExamples:\n  dbt models\n  dbt run -f program.elf --max-blocks 100000\n  dbt run -f boot.bin --break 0x80000010 --singlestep\n  dbt translate -f program.elf --pc 0x80000000"
)]
struct Cli {
    /// Log everything down to per-instruction tracing.
    #[arg(long, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the registered CPU models.
    Models {
        /// Print the list as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Run an image until a trap, a debug stop, or the block limit.
    Run {
        /// Raw binary or ELF image.
        #[arg(short, long)]
        file: PathBuf,

        /// CPU model (overrides the config file).
        #[arg(long)]
        model: Option<String>,

        /// JSON configuration file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Maximum number of blocks to dispatch.
        #[arg(long, default_value_t = 1_000_000)]
        max_blocks: u64,

        /// Stop after every instruction.
        #[arg(long)]
        singlestep: bool,

        /// Breakpoint address (repeatable).
        #[arg(long = "break", value_parser = parse_addr)]
        breakpoints: Vec<u64>,
    },

    /// Translate the block at one address and print it.
    Translate {
        /// Raw binary or ELF image.
        #[arg(short, long)]
        file: PathBuf,

        /// Block start address (defaults to the image entry).
        #[arg(long, value_parser = parse_addr)]
        pc: Option<u64>,

        /// JSON configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.trace);

    let result = match cli.command {
        Commands::Models { json } => cmd_models(json),
        Commands::Run {
            file,
            model,
            config,
            max_blocks,
            singlestep,
            breakpoints,
        } => cmd_run(
            &file,
            model,
            config.as_deref(),
            max_blocks,
            singlestep,
            &breakpoints,
        ),
        Commands::Translate { file, pc, config } => cmd_translate(&file, pc, config.as_deref()),
    };

    result.unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: {e}");
        ExitCode::FAILURE
    })
}

/// Installs the log subscriber: `RUST_LOG` when set, else `info` (or `trace` with `--trace`).
fn init_tracing(trace: bool) {
    let filter = if trace {
        EnvFilter::new("trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Accepts `0x`-prefixed hex or decimal addresses.
fn parse_addr(s: &str) -> Result<u64, String> {
    let parsed = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .map_or_else(|| s.parse(), |hex| u64::from_str_radix(&hex.replace('_', ""), 16));
    parsed.map_err(|e| format!("invalid address '{s}': {e}"))
}

fn load_config(path: Option<&Path>) -> Result<Config, Error> {
    path.map_or_else(|| Ok(Config::default()), Config::from_file)
}

fn cmd_models(json: bool) -> Result<ExitCode, Error> {
    let models = list_models();
    if json {
        println!("{}", serde_json::to_string(&models)?);
    } else {
        for name in models {
            println!("{name}");
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Loads the image, dispatches blocks, then dumps CPU state and statistics.
///
/// A guest trap exits with failure; debug stops and the block limit exit cleanly.
fn cmd_run(
    file: &Path,
    model: Option<String>,
    config: Option<&Path>,
    max_blocks: u64,
    singlestep: bool,
    breakpoints: &[u64],
) -> Result<ExitCode, Error> {
    let mut config = load_config(config)?;
    if let Some(model) = model {
        config.general.model = model;
    }
    config.debug.singlestep |= singlestep;
    config.debug.breakpoints.extend_from_slice(breakpoints);

    let mut engine = Engine::new(&config)?;
    let image = engine.load_image(file)?;

    println!(
        "[*] {}: model={} entry={} segments={} bytes={}",
        file.display(),
        config.general.model,
        image.entry,
        image.segments,
        image.bytes
    );

    let reason = engine.run(max_blocks);
    println!("\n[*] Stopped: {reason}");
    print!("{}", engine.cpu());
    engine.stats().print();

    Ok(match reason {
        StopReason::Trap { .. } => ExitCode::FAILURE,
        StopReason::Debug(_) | StopReason::Interrupted | StopReason::BlockLimit => {
            ExitCode::SUCCESS
        }
    })
}

fn cmd_translate(file: &Path, pc: Option<u64>, config: Option<&Path>) -> Result<ExitCode, Error> {
    let config = load_config(config)?;
    let mut engine = Engine::new(&config)?;
    let image = engine.load_image(file)?;
    let pc = pc.map_or(image.entry, VirtAddr::new);

    let block = engine.block_at(pc);
    println!("{}", *block);
    Ok(ExitCode::SUCCESS)
}
