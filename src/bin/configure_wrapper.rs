use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use zarrs_fixtures::configure::{
    assemble, execute, BuildTarget, ConfigurePaths, ConfigureRequest, LinkMode,
};

/// Assemble and run a library configure command.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Build for a 32-bit target.
    #[arg(long = "m32", visible_alias = "build-32", conflicts_with = "m64")]
    m32: bool,

    /// Cross compile for a 64-bit target.
    #[arg(long = "m64", visible_alias = "build-64")]
    m64: bool,

    /// Link static libraries.
    #[arg(long = "static", conflicts_with = "shared")]
    static_link: bool,

    /// Link shared libraries.
    #[arg(long, visible_alias = "dynamic")]
    shared: bool,

    /// Disable optional subsystems (the default).
    #[arg(long = "min", visible_alias = "min_build", conflicts_with = "full")]
    min: bool,

    /// Keep optional subsystems enabled.
    #[arg(long)]
    full: bool,

    /// Build with debug information and no optimisation.
    #[arg(short, long)]
    debug: bool,

    /// Print the command without running it.
    #[arg(short, long)]
    echo: bool,

    /// A JSON file overriding the default paths.
    #[arg(long, env = "CONFIGURE_CONFIG")]
    config: Option<PathBuf>,
}

impl Args {
    fn request(&self) -> ConfigureRequest {
        let target = if self.m32 {
            BuildTarget::X86
        } else if self.m64 {
            BuildTarget::X86_64
        } else {
            BuildTarget::Native
        };
        let link = if self.static_link {
            LinkMode::Static
        } else if self.shared {
            LinkMode::Shared
        } else {
            LinkMode::Default
        };
        ConfigureRequest {
            target,
            link,
            minimal: self.min || !self.full,
            debug: self.debug,
        }
    }
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let args = Args::parse();
    let paths = ConfigurePaths::load(args.config.as_deref())?;
    let command = assemble(&args.request(), &paths);
    let code = execute(&command, args.echo)?;
    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
