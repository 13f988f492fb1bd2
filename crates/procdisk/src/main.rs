//! procdisk - Inspect Linux block-device I/O counters.
//!
//! Reads `/proc/diskstats` once and prints either the raw snapshot or
//! selected per-device counters.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use procdisk_core::{
    DEFAULT_DISKSTATS_PATH, DiskStats, DiskStatsStore, Field, ParseMode, RealFs, StoreError,
};

/// Block-device I/O counter inspector.
#[derive(Parser)]
#[command(name = "procdisk", about = "Inspect /proc/diskstats counters", version)]
struct Args {
    /// Path to the diskstats table (for containers or testing).
    #[arg(long, default_value = DEFAULT_DISKSTATS_PATH, global = true)]
    path: PathBuf,

    /// Fail on non-numeric counters instead of reading them as 0.
    #[arg(long, global = true)]
    strict: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is warn level.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every device record of the current snapshot.
    Dump {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print selected fields of one device (all fields if none given).
    Get {
        /// Device name as listed in diskstats (e.g. sda, nvme0n1).
        device: String,
        /// Field names, see `procdisk fields`.
        fields: Vec<Field>,
    },
    /// List queryable field names.
    Fields,
}

#[derive(Serialize)]
struct JsonDump {
    captured_at: Option<String>,
    source: String,
    devices: Vec<DiskStats>,
}

/// Error type for CLI failures. Every variant exits with status 1.
#[derive(Debug)]
enum CliError {
    /// Refresh or query failed.
    Store(StoreError),
    /// Snapshot could not be serialized.
    Json(serde_json::Error),
    /// Writing to stdout failed.
    Io(io::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Store(e) => write!(f, "{}", e),
            CliError::Json(e) => write!(f, "failed to serialize snapshot: {}", e),
            CliError::Io(e) => write!(f, "failed to write output: {}", e),
        }
    }
}

impl std::error::Error for CliError {}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        CliError::Store(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

/// Initializes the tracing subscriber on stderr.
/// Default level is WARN. Use -v/-vv for more, -q for errors only.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn load_store(args: &Args) -> Result<DiskStatsStore<RealFs>, StoreError> {
    let mode = if args.strict {
        ParseMode::Strict
    } else {
        ParseMode::Lenient
    };
    let mut store = DiskStatsStore::new(RealFs::new())
        .with_path(&args.path)
        .with_parse_mode(mode);
    store.refresh()?;
    Ok(store)
}

fn run(args: &Args, out: &mut impl Write) -> Result<(), CliError> {
    match &args.command {
        Command::Fields => {
            for field in Field::ALL {
                writeln!(out, "{:<20} column {}", field.name(), field.column() + 1)?;
            }
        }
        Command::Dump { json: false } => {
            let store = load_store(args)?;
            for record in store.dump() {
                writeln!(out, "{}", record)?;
            }
        }
        Command::Dump { json: true } => {
            let store = load_store(args)?;
            let devices = store
                .dump()
                .iter()
                .map(|record| record.to_stats(store.parse_mode()))
                .collect::<Result<Vec<_>, _>>()?;
            let dump = JsonDump {
                captured_at: store.snapshot().captured_at().map(|t| t.to_rfc3339()),
                source: store.path().display().to_string(),
                devices,
            };
            serde_json::to_writer_pretty(&mut *out, &dump)?;
            writeln!(out)?;
        }
        Command::Get { device, fields } => {
            let store = load_store(args)?;
            let fields = if fields.is_empty() {
                Field::ALL.to_vec()
            } else {
                fields.clone()
            };
            for field in fields {
                writeln!(out, "{}={}", field, store.query(device, field)?)?;
            }
        }
    }

    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    if let Err(e) = run(&args, &mut io::stdout().lock()) {
        error!("{}", e);
        std::process::exit(1);
    }
}
