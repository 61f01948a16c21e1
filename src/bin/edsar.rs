//! CLI entry point for the `edsar` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use eds_archive::cli::commands;
use eds_archive::ArchiveConfig;

#[derive(Parser)]
#[command(
    name = "edsar",
    about = "edsar — write extended data squares as content-addressed CAR archives"
)]
struct Cli {
    /// Output format: "text" (default) or "json"
    #[arg(long, default_value = "text")]
    format: String,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured share size
    #[arg(long, global = true)]
    share_size: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extend an original square and write it as a CAR archive
    Write {
        /// File of concatenated original shares (row-major)
        input: PathBuf,
        /// Archive to create
        output: PathBuf,
    },
    /// Print the row and column root CIDs of an original square
    Roots {
        /// File of concatenated original shares (row-major)
        input: PathBuf,
    },
    /// Write a default config file
    InitConfig {
        /// Path of the config file to create
        path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    let json = cli.format == "json";

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = match &cli.config {
        Some(path) => match ArchiveConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(commands::exit_code(&e));
            }
        },
        None => ArchiveConfig::default(),
    };
    if let Some(share_size) = cli.share_size {
        config.share_size = share_size;
    }

    let result = match cli.command {
        Commands::Write { input, output } => commands::cmd_write(&input, &output, &config, json),
        Commands::Roots { input } => commands::cmd_roots(&input, &config, json),
        Commands::InitConfig { path } => commands::cmd_init_config(&path),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(commands::exit_code(&e));
    }
}
