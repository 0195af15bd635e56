use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use zarrs_fixtures::{
    fixtures::{generate, FixtureType, Operation},
    version::banner,
};

/// Generate Zarr V2 compatibility fixtures.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The operation.
    operation: Operation,

    /// The fixture type.
    #[arg(value_name = "TYPE")]
    fixture_type: FixtureType,

    /// The output file name, without extension. Defaults to a name derived from the crate version.
    filename: Option<PathBuf>,

    /// Consolidate metadata. Fixtures are always consolidated.
    #[arg(long)]
    consolidate: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let args = Args::parse();
    println!("{}", banner());

    let paths = generate(
        args.operation,
        args.fixture_type,
        args.filename.as_deref(),
        args.consolidate,
    )?;
    let outputs: Vec<String> = paths
        .outputs
        .iter()
        .map(|path| path.display().to_string())
        .collect();
    println!("Created {}", outputs.join(" and "));
    Ok(())
}
