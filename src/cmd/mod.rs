mod generate;
mod validate;

use chrono::NaiveDate;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate as generate_completions, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lab-fixtures")]
#[command(version)]
#[command(
    about = "Generate synthetic laboratory equipment fixtures for asset-tracking imports",
    long_about = "Generate synthetic laboratory equipment fixtures for asset-tracking imports.\n\n\
                  Running without a subcommand is the same as `lab-fixtures generate`: it writes \
                  2000 records to lab_equipment_2000.csv in the current directory."
)]
pub struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate an equipment fixture file
    Generate(GenerateArgs),

    /// Check a generated file against the import schema and record invariants
    Validate {
        /// File to validate
        file: PathBuf,

        /// Field delimiter used in the file
        #[arg(short, long)]
        delimiter: Option<String>,

        /// Date the file was generated on (YYYY-MM-DD); enables date window checks
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Output file [default: lab_equipment_2000.csv]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of records to generate [default: 2000]
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Random seed for reproducible output (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Anchor date for purchase/calibration dates (YYYY-MM-DD) [default: today]
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Field delimiter, a single character or \t [default: ;]
    #[arg(short, long)]
    pub delimiter: Option<String>,

    /// Quoting of values containing the delimiter: never, necessary [default: never]
    #[arg(long)]
    pub quote: Option<String>,

    /// YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Show progress while writing
    #[arg(short, long)]
    pub progress: bool,

    /// Generate and summarize without writing the file
    #[arg(long)]
    pub dry_run: bool,

    /// Output the summary as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        None => generate::run(GenerateArgs::default()),
        Some(Commands::Generate(args)) => generate::run(args),
        Some(Commands::Validate {
            file,
            delimiter,
            date,
            strict,
            json,
        }) => validate::run(file, delimiter, date, strict, json),
        Some(Commands::Completions { shell }) => {
            generate_completions(
                shell,
                &mut Cli::command(),
                "lab-fixtures",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}
