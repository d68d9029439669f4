//! `geobox`: compile a bounding-box query and print the constraint tree.
//!
//! ```text
//! geobox overlaps 10 -10 -170 170
//! geobox within 90 10 20 -20 --output json
//! ```

mod output;

use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser};
use geobox_query::{
    compile, BoundingBox, FieldNames, Predicate, DEFAULT_EAST_FIELD, DEFAULT_NORTH_FIELD,
    DEFAULT_SOUTH_FIELD, DEFAULT_WEST_FIELD,
};
use output::{render, Compiled, OutputMode};
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "geobox", version, about = "Compile a geospatial bounding-box query")]
struct Cli {
    /// Spatial predicate: contains, overlaps or within
    predicate: String,

    /// Northern latitude bound
    #[arg(allow_negative_numbers = true)]
    north: String,

    /// Southern latitude bound
    #[arg(allow_negative_numbers = true)]
    south: String,

    /// Eastern longitude bound
    #[arg(allow_negative_numbers = true)]
    east: String,

    /// Western longitude bound; greater than east for a box crossing ±180°
    #[arg(allow_negative_numbers = true)]
    west: String,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputMode,

    #[arg(long, default_value = DEFAULT_NORTH_FIELD)]
    north_field: String,

    #[arg(long, default_value = DEFAULT_SOUTH_FIELD)]
    south_field: String,

    #[arg(long, default_value = DEFAULT_EAST_FIELD)]
    east_field: String,

    #[arg(long, default_value = DEFAULT_WEST_FIELD)]
    west_field: String,

    /// Log to stderr (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn fields(&self) -> FieldNames {
        FieldNames::new(
            &self.north_field,
            &self.south_field,
            &self.east_field,
            &self.west_field,
        )
    }
}

fn init_tracing(verbose: u8) {
    // RUST_LOG is honoured only without -v, so a flag always wins
    let filter = match verbose {
        0 => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into()),
        1 => tracing_subscriber::EnvFilter::new("debug"),
        _ => tracing_subscriber::EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<String> {
    // bounds before predicate, so a malformed number is reported first
    let bbox = BoundingBox::parse(&cli.north, &cli.south, &cli.east, &cli.west)?;
    let predicate: Predicate = cli.predicate.parse()?;
    let tree = compile(&cli.fields(), predicate, bbox)?;
    debug!(clauses = tree.leaf_count(), output = ?cli.output, "rendering");

    let compiled = Compiled {
        predicate,
        bbox: &bbox,
        clauses: tree.leaf_count(),
        tree: &tree,
    };
    render(&compiled, cli.output).context("failed to render compiled query")
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(out) => {
            println!("{}", out.trim_end());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
