use std::path::{Path, PathBuf};
use std::process::exit;
use std::time::Instant;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use anyhow::Result;

use openbibles_backend::{detect_format, logger, DatasetSummary};

use openbibles_cli::config::{self, PipelineConfig};
use openbibles_cli::encoding::read_source_file;
use openbibles_cli::output::{log_stats, log_summary, read_verses_json, write_verses_json};
use openbibles_cli::pipeline::run_pipeline;

#[derive(Parser, Debug)]
#[command(author, version, about = "Original-language scripture XML to verse JSON", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Root directory with one sub-directory of XML files per source code
    #[arg(long, global = true, value_name = "DIRECTORY_PATH", env = "SOURCES_DIR",
          default_value = config::DEFAULT_SOURCES_DIR)]
    sources_dir: PathBuf,

    /// Book table JSON mapping textual book ids to canonical numbers
    #[arg(long, global = true, value_name = "FILE_PATH", env = "BOOK_MAP_PATH",
          default_value = config::DEFAULT_BOOK_MAP_PATH)]
    book_map: PathBuf,

    /// JSON array of sources to use instead of the built-in WLC and SBLGNT
    #[arg(long, global = true, value_name = "FILE_PATH", env = "SOURCES_CONFIG_PATH")]
    sources_config: Option<PathBuf>,

    /// silent, error, warn, info or debug. Overrides LOG_LEVEL.
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse all configured sources and write the verse collection
    Parse {
        /// Output JSON file
        #[arg(long, value_name = "FILE_PATH", env = "OUTPUT_PATH",
              default_value = config::DEFAULT_OUTPUT_PATH)]
        output: PathBuf,

        /// Only process these source codes
        #[arg(long, value_name = "CODE", num_args = 1..)]
        only: Vec<String>,

        /// Write single-line JSON
        #[arg(long, default_value_t = false)]
        compact: bool,
    },

    /// Print the detected dialect of XML files
    #[command(arg_required_else_help = true)]
    Detect {
        #[arg(value_name = "FILE_PATH", required = true)]
        files: Vec<PathBuf>,
    },

    /// Print summary counts of a written verse collection
    #[command(arg_required_else_help = true)]
    Stats {
        #[arg(value_name = "FILE_PATH")]
        path: PathBuf,
    },
}

fn build_config(cli: &Cli) -> Result<PipelineConfig> {
    let sources = match &cli.sources_config {
        Some(path) => config::load_sources(path)?,
        None => config::default_sources(),
    };
    Ok(PipelineConfig::new(cli.sources_dir.clone(), cli.book_map.clone(), sources))
}

fn parse_sources(cli: &Cli, output: &Path, only: &[String], compact: bool) -> Result<()> {
    let start = Instant::now();
    let config = build_config(cli)?.only_sources(only)?;

    let run = run_pipeline(&config)?;

    log_stats(&run.stats);
    log_summary(&run.summary);

    write_verses_json(output, &run.verses, !compact)?;
    logger::info(&format!("Saved {} verses to {}", run.verses.len(), output.display()));
    logger::info(&format!("Finished in {}", logger::format_duration(start.elapsed())));

    Ok(())
}

fn detect_files(files: &[PathBuf]) -> Result<()> {
    for path in files {
        match read_source_file(path) {
            Ok(content) => println!("{}: {}", path.display(), detect_format(&content)),
            Err(e) => logger::error(&format!("{:#}", e)),
        }
    }
    Ok(())
}

fn print_stats(path: &Path) -> Result<()> {
    let verses = read_verses_json(path)?;
    let summary = DatasetSummary::from_verses(&verses);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    log_summary(&summary);
    Ok(())
}

fn main() {
    // Variables from .env are picked up by clap through the `env` attributes.
    if dotenv().is_err() {
        logger::debug("No .env file found or failed to load.");
    }

    let cli = Cli::parse();

    if let Some(level) = &cli.log_level {
        if !logger::set_log_level_str(level) {
            eprintln!("Error: invalid log level: {}", level);
            exit(1);
        }
    }
    logger::debug(&format!("Log level: {}", logger::get_log_level().as_str()));

    let command_result = match &cli.command {
        Commands::Parse { output, only, compact } => parse_sources(&cli, output, only, *compact),
        Commands::Detect { files } => detect_files(files),
        Commands::Stats { path } => print_stats(path),
    };

    if let Err(e) = command_result {
        eprintln!("Error executing command: {:#}", e);
        exit(1);
    }
}
