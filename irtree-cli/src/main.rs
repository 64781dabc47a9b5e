//! irtree CLI - encode, decode and inspect persisted IR trees.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use irtree::json::{from_json_str, to_json_string};
use irtree::{CodecConfig, Format, IrTree, ReadOptions, WriteOptions};

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Binary persistence for analyzed IR trees.
#[derive(Parser)]
#[command(
    name = "irtree",
    version,
    about = "Encode, decode and inspect binary IR tree files",
    long_about = r#"
Encode, decode and inspect binary IR tree files.

Examples:
    irtree encode tree.json -o tree.irtb     # JSON mirror to binary
    irtree decode tree.irtb                  # Binary to JSON on stdout
    irtree inspect tree.irtb                 # Header and string table summary
    irtree verify tree.irtb                  # Full decode, non-zero exit on failure
    irtree convert tree.irtb tree.json       # Format chosen by extension

Configuration:
    --config reads a TOML file with [write] and [read] tables.
    Command-line flags override the file.
"#
)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML file with [write]/[read] options
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Do not append the xxh3-128 checksum
    #[arg(long, global = true)]
    no_checksum: bool,

    /// Do not encode source locations
    #[arg(long, global = true)]
    no_debug_info: bool,

    /// Output minified/compact JSON (default: pretty-printed)
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON tree and write it as a binary file
    Encode {
        /// JSON mirror input
        input: PathBuf,

        /// Binary output path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Read a binary file and print it as JSON
    Decode {
        /// Binary input
        input: PathBuf,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the header and string table summary as JSON
    Inspect {
        /// Binary input
        file: PathBuf,
    },

    /// Fully decode a binary file; exit non-zero on failure
    Verify {
        /// Binary input
        file: PathBuf,
    },

    /// Print validation errors of a JSON tree
    Validate {
        /// JSON mirror input
        input: PathBuf,
    },

    /// Convert between binary and JSON, format chosen by extension
    Convert {
        input: PathBuf,
        output: PathBuf,
    },
}

// =============================================================================
// OPTIONS
// =============================================================================

/// Effective options after merging the config file and flags
fn resolve_options(cli: &Cli) -> Result<(WriteOptions, ReadOptions)> {
    let config = match &cli.config {
        Some(path) => CodecConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => CodecConfig::default(),
    };
    config.validate().context("Invalid configuration")?;

    let mut write = config.write;
    if cli.no_checksum {
        write.checksum = false;
    }
    if cli.no_debug_info {
        write.debug_info = false;
    }
    Ok((write, config.read))
}

fn format_json<T: Serialize>(value: &T, compact: bool) -> Result<String> {
    if compact {
        serde_json::to_string(value).context("Failed to serialize JSON")
    } else {
        serde_json::to_string_pretty(value).context("Failed to serialize JSON")
    }
}

fn require_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        bail!("Not a file: {}", path.display());
    }
    Ok(())
}

fn load_json_tree(path: &Path) -> Result<IrTree> {
    require_file(path)?;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    from_json_str(&text).with_context(|| format!("Invalid JSON tree in {}", path.display()))
}

fn read_binary(path: &Path) -> Result<Vec<u8>> {
    require_file(path)?;
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

// =============================================================================
// COMMANDS
// =============================================================================

fn cmd_encode(input: &Path, output: &Path, write: &WriteOptions) -> Result<()> {
    let tree = load_json_tree(input)?;
    let bytes = irtree::write_with(&tree, write)
        .with_context(|| format!("Failed to encode {}", input.display()))?;
    std::fs::write(output, &bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(output = %output.display(), bytes = bytes.len(), "encoded");
    Ok(())
}

fn cmd_decode(input: &Path, output: Option<&Path>, read: &ReadOptions, compact: bool) -> Result<()> {
    let bytes = read_binary(input)?;
    let tree = irtree::read_with(&bytes, read)
        .with_context(|| format!("Failed to decode {}", input.display()))?;
    let text = to_json_string(&tree, !compact)?;
    match output {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{text}"),
    }
    Ok(())
}

fn cmd_inspect(file: &Path, read: &ReadOptions, compact: bool) -> Result<()> {
    let bytes = read_binary(file)?;
    let summary = irtree::TreeReader::new(*read)
        .inspect(&bytes)
        .with_context(|| format!("Failed to inspect {}", file.display()))?;
    println!("{}", format_json(&summary, compact)?);
    Ok(())
}

fn cmd_verify(file: &Path, read: &ReadOptions) -> Result<()> {
    let bytes = read_binary(file)?;
    let tree = irtree::read_with(&bytes, read)
        .with_context(|| format!("Verification failed for {}", file.display()))?;
    println!(
        "OK: {} ({} bytes, {} root declaration(s))",
        file.display(),
        bytes.len(),
        tree.declarations.len()
    );
    Ok(())
}

fn cmd_validate(input: &Path, write: &WriteOptions, compact: bool) -> Result<()> {
    let tree = load_json_tree(input)?;
    let errors = irtree::validate_with(&tree, write);
    println!("{}", format_json(&errors, compact)?);
    if !errors.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_convert(input: &Path, output: &Path, read: &ReadOptions, write: &WriteOptions) -> Result<()> {
    if Format::from_extension(input) == Format::Binary {
        require_file(input)?;
    }
    irtree::convert(input, output, read, write).with_context(|| {
        format!("Failed to convert {} to {}", input.display(), output.display())
    })?;
    info!(
        from = Format::from_extension(input).extension(),
        to = Format::from_extension(output).extension(),
        "converted"
    );
    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let (write, read) = resolve_options(&cli)?;

    match &cli.command {
        Commands::Encode { input, output } => cmd_encode(input, output, &write)?,
        Commands::Decode { input, output } => {
            cmd_decode(input, output.as_deref(), &read, cli.compact)?;
        }
        Commands::Inspect { file } => cmd_inspect(file, &read, cli.compact)?,
        Commands::Verify { file } => cmd_verify(file, &read)?,
        Commands::Validate { input } => cmd_validate(input, &write, cli.compact)?,
        Commands::Convert { input, output } => cmd_convert(input, output, &read, &write)?,
    }

    Ok(())
}
