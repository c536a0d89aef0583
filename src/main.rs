//! entity-linker - fuzzy entity linkage between finance and procurement registries
//!
//! Loads and joins both registries from CSV, then links records by name
//! similarity, optionally within the same country or city, and prints or
//! exports the links.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use entity_linker::commands;
use entity_linker::config::{self, ColumnMap, IdColumns, LocalityField, Side};
use entity_linker::output::{self, OutputControls};
use entity_linker::{Matcher, Metric, Scorer};

/// Fuzzy entity linkage between finance and procurement registries.
#[derive(Parser, Debug)]
#[command(name = "entity-linker")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Compact JSON output (no whitespace)
    #[arg(long, global = true)]
    compact: bool,

    /// Comma-separated field allowlist for JSON output
    #[arg(long, global = true)]
    fields: Option<String>,

    /// Directory holding finance/ and procurement/ tables
    /// (default: $ENTITY_LINKER_DATA_DIR or ./data)
    #[arg(long, global = true)]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

/// Locality and column selection.
#[derive(Args, Debug)]
struct LocalityArgs {
    /// Field both records must share before names are compared
    #[arg(long, value_enum, default_value_t = LocalityField::Country)]
    locality: LocalityField,

    /// Compare localities case-insensitively
    #[arg(long)]
    ignore_locality_case: bool,

    /// Finance name column (default: entity_name)
    #[arg(long)]
    finance_name_column: Option<String>,

    /// Finance locality column (default: iso_country_y / location_city)
    #[arg(long)]
    finance_locality_column: Option<String>,

    /// Procurement name column (default: name)
    #[arg(long)]
    procurement_name_column: Option<String>,

    /// Procurement locality column (default: country_iso2 / city)
    #[arg(long)]
    procurement_locality_column: Option<String>,
}

impl LocalityArgs {
    fn columns(&self) -> ColumnMap {
        ColumnMap::for_locality(self.locality).with_overrides(
            self.finance_name_column.clone(),
            self.finance_locality_column.clone(),
            self.procurement_name_column.clone(),
            self.procurement_locality_column.clone(),
        )
    }
}

/// Name scoring options.
#[derive(Args, Debug)]
struct ScoreArgs {
    /// Score (0-100) a match must exceed
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    min_score: Option<u8>,

    /// Similarity metric
    #[arg(long, value_enum, default_value_t = Metric::Ratio)]
    metric: Metric,

    /// Lowercase names before scoring
    #[arg(long)]
    ignore_case: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the best match for every record of one registry
    Match {
        /// Registry supplying the targets
        #[arg(long, value_enum, default_value_t = Side::Finance)]
        primary: Side,

        /// Only match the first N targets
        #[arg(short, long)]
        limit: Option<usize>,

        #[command(flatten)]
        locality: LocalityArgs,

        #[command(flatten)]
        score: ScoreArgs,
    },

    /// Write the procurement table with best finance matches appended
    Export {
        /// Output CSV path
        #[arg(short, long, default_value = "output.csv")]
        output: String,

        #[command(flatten)]
        locality: LocalityArgs,

        #[command(flatten)]
        score: ScoreArgs,
    },

    /// Write finance/procurement id pairs of every linked record
    Links {
        /// Registry supplying the targets
        #[arg(long, value_enum, default_value_t = Side::Finance)]
        primary: Side,

        /// Output CSV path
        #[arg(short, long, default_value = "links.csv")]
        output: String,

        /// Finance id column (default: factset_entity_id)
        #[arg(long)]
        finance_id_column: Option<String>,

        /// Procurement id column (default: vendor_id)
        #[arg(long)]
        procurement_id_column: Option<String>,

        #[command(flatten)]
        locality: LocalityArgs,

        #[command(flatten)]
        score: ScoreArgs,
    },

    /// Count records per locality in both registries
    Clusters {
        #[command(flatten)]
        locality: LocalityArgs,
    },
}

fn matcher(locality: &LocalityArgs, score: &ScoreArgs, default_min: Option<u8>) -> Matcher {
    Matcher::new(
        Scorer::new(score.metric, score.ignore_case),
        locality.locality.gate(locality.ignore_locality_case),
        score.min_score.or(default_min),
    )
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only results
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let output_controls = OutputControls {
        json: cli.json,
        compact: cli.compact,
        fields: cli.fields.clone(),
    };
    let data_dir = config::resolve_data_dir(cli.data_dir.as_deref());
    tracing::debug!("Data directory: {:?}", data_dir);

    let result = match cli.command {
        Command::Match { primary, limit, locality, score } => commands::matching::run(
            &data_dir,
            &locality.columns(),
            &matcher(&locality, &score, None),
            primary,
            limit,
            &output_controls,
        ),
        Command::Export { output, locality, score } => commands::export::run(
            &data_dir,
            &locality.columns(),
            &matcher(&locality, &score, Some(config::EXPORT_MIN_SCORE)),
            &PathBuf::from(shellexpand::tilde(&output).into_owned()),
            &output_controls,
        ),
        Command::Links {
            primary,
            output,
            finance_id_column,
            procurement_id_column,
            locality,
            score,
        } => commands::links::run(
            &data_dir,
            &locality.columns(),
            &IdColumns::default().with_overrides(finance_id_column, procurement_id_column),
            &matcher(&locality, &score, None),
            primary,
            &PathBuf::from(shellexpand::tilde(&output).into_owned()),
            &output_controls,
        ),
        Command::Clusters { locality } => commands::clusters::run(
            &data_dir,
            &locality.columns(),
            locality.locality.gate(locality.ignore_locality_case),
            &output_controls,
        ),
    };

    match result {
        Ok(()) => ExitCode::from(0),
        Err(e) => {
            if cli.json {
                println!("{}", output::format_error(&e));
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::from(1)
        }
    }
}
