//! Configure flag assembly.
//!
//! A [`ConfigureRequest`] selects a build target, a link mode, and a few switches.
//! [`assemble`] turns it into a [`ConfigureCommand`] for a library `configure` script, drawing every environment specific token from [`ConfigurePaths`].
//! Assembly is pure: the same request and paths always give the same command.
//!
//! Tokens are appended in a fixed order and never removed:
//!
//! | Option             | Features                        | `CFLAGS`       | `LDFLAGS`              |
//! |--------------------|---------------------------------|----------------|------------------------|
//! | [`BuildTarget::X86_64`] | `--host=<host>`            |                |                        |
//! | minimal            | `--disable-<subsystem>` flags   |                |                        |
//! | debug              |                                 | debug flags    | debug flags            |
//! | [`LinkMode::Static`] | `--enable-static`             | `-I<include>`  | `-L<lib> -static`      |
//! | [`LinkMode::Shared`] | `--enable-shared`             | `-I<include>`  | `-L<lib>`              |
//!
//! The static and shared path sets are chosen by the build target, [`BuildTarget::X86`] uses the 32-bit sets and every other target the 64-bit sets.

mod command;
mod paths;

use std::path::PathBuf;

use derive_more::Display;
use thiserror::Error;

pub use self::{
    command::{execute, ConfigureCommand},
    paths::{ConfigurePaths, PathSet},
};

/// The build target.
#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Eq)]
pub enum BuildTarget {
    /// The host target, no bit-width selected.
    #[default]
    #[display("native")]
    Native,
    /// A 32-bit target.
    #[display("x86")]
    X86,
    /// A 64-bit target, cross compiled with the configured host triple.
    #[display("x86_64")]
    X86_64,
}

/// The link mode.
///
/// Static and shared linking are exclusive.
#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Eq)]
pub enum LinkMode {
    /// The `configure` script default.
    #[default]
    #[display("default")]
    Default,
    /// Static libraries.
    #[display("static")]
    Static,
    /// Shared libraries.
    #[display("shared")]
    Shared,
}

/// A configure request.
///
/// ## Target
/// > default: [`BuildTarget::Native`]
///
/// ## Link
/// > default: [`LinkMode::Default`]
///
/// ## Minimal
/// > default: [`true`]
///
/// Disables the optional subsystems listed in [`ConfigurePaths::minimal_features`].
/// Fixture builds never need them, so they stay disabled unless a full build is requested.
///
/// ## Debug
/// > default: [`false`]
///
/// Appends [`ConfigurePaths::debug_flags`] to both `CFLAGS` and `LDFLAGS`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ConfigureRequest {
    /// The build target.
    pub target: BuildTarget,
    /// The link mode.
    pub link: LinkMode,
    /// Disable optional subsystems.
    pub minimal: bool,
    /// Build with debug information and no optimisation.
    pub debug: bool,
}

impl Default for ConfigureRequest {
    fn default() -> Self {
        Self {
            target: BuildTarget::default(),
            link: LinkMode::default(),
            minimal: true,
            debug: false,
        }
    }
}

/// A configure error.
#[derive(Debug, Error)]
pub enum ConfigureError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {0}: {1}")]
    ReadConfig(PathBuf, #[source] std::io::Error),
    /// The configuration file is not valid.
    #[error("invalid configuration file {0}: {1}")]
    InvalidConfig(PathBuf, #[source] serde_json::Error),
    /// The configure command could not be run.
    #[error("failed to run configure command: {0}")]
    Execute(#[source] std::io::Error),
}

/// Assemble the configure command for `request`.
#[must_use]
pub fn assemble(request: &ConfigureRequest, paths: &ConfigurePaths) -> ConfigureCommand {
    tracing::debug!(?request, "assembling configure command");
    let mut command = ConfigureCommand::new(&paths.script, paths.features.clone());

    if request.target == BuildTarget::X86_64 {
        command.features.push(format!("--host={}", paths.host));
    }
    if request.minimal {
        command.features.extend(paths.minimal_features.iter().cloned());
    }
    if request.debug {
        command.cflags.extend(paths.debug_flags.iter().cloned());
        command.ldflags.extend(paths.debug_flags.iter().cloned());
    }

    let is_32 = request.target == BuildTarget::X86;
    match request.link {
        LinkMode::Default => {}
        LinkMode::Static => {
            let path_set = if is_32 { &paths.static_32 } else { &paths.static_64 };
            command.features.push("--enable-static".to_string());
            command.cflags.push(format!("-I{}", path_set.include_dir));
            command.ldflags.push(format!("-L{}", path_set.lib_dir));
            command.ldflags.push("-static".to_string());
        }
        LinkMode::Shared => {
            let path_set = if is_32 { &paths.shared_32 } else { &paths.shared_64 };
            command.features.push("--enable-shared".to_string());
            command.cflags.push(format!("-I{}", path_set.include_dir));
            command.ldflags.push(format!("-L{}", path_set.lib_dir));
        }
    }
    command
}
