//! Fitrace CLI
//!
//! Normalizes batches of fault-injection instruction traces into
//! rectangular tables with a shared per-batch schema.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use fitrace::commands::{execute_format, validate_args, FormatArgs};
use fitrace::schema::Header;
use fitrace::utils::config::{FormatOptions, DEFAULT_TOOL_PREFIX, SCHEMA_VERSION};

/// Fitrace - fault-injection trace normalization
#[derive(Parser, Debug)]
#[command(name = "fitrace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Normalize one or more batch directories of trace files
    Format {
        /// Batch directories containing raw trace files
        #[arg(required = true)]
        directories: Vec<PathBuf>,

        /// Instrumentation-tool prefix stripped from trace filenames
        #[arg(long, default_value = DEFAULT_TOOL_PREFIX)]
        tool_prefix: String,

        /// Keep callee-side call instance indices by pairing call entries
        /// with their duplicate echoes instead of dropping the echoes
        #[arg(long)]
        preserve_call_index: bool,

        /// Output path for a JSON run report (optional)
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Display table schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Format {
            directories,
            tool_prefix,
            preserve_call_index,
            report,
        } => {
            let args = FormatArgs {
                directories,
                options: FormatOptions {
                    tool_prefix,
                    preserve_call_index,
                },
                report,
            };

            // Validate args first
            validate_args(&args)?;

            // Execute format
            let outcome = execute_format(args)?;
            if !outcome.failed.is_empty() {
                anyhow::bail!("{} batch(es) failed and were removed", outcome.failed.len());
            }
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Display schema information
fn display_schema(show_details: bool) {
    println!("Fitrace Trace Table Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Fixed columns (every table):");
        for column in Header::infer(0).columns() {
            println!("  {}", column);
        }
        println!();
        println!("Generated columns:");
        println!("  Operand-0 .. Operand-(N-1), where N is the widest");
        println!("  instruction record seen across the whole batch.");
        println!();
        println!("Every row of a finished table has exactly as many");
        println!("comma-separated fields as the header; narrow records");
        println!("are padded with empty trailing fields.");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
fn display_version() {
    println!("Fitrace v{}", env!("CARGO_PKG_VERSION"));
    println!("Table Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Normalization of fault-injection instruction traces.");
}
