use std::process::Command;

use itertools::Itertools;

use super::ConfigureError;

/// An assembled configure command.
///
/// Displays as a single shell command:
/// ```text
/// <script> <features...> CFLAGS="<cflags...>" LDFLAGS="<ldflags...>"
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigureCommand {
    /// The configure script.
    pub script: String,
    /// Feature flags.
    pub features: Vec<String>,
    /// Compiler flags.
    pub cflags: Vec<String>,
    /// Linker flags.
    pub ldflags: Vec<String>,
}

impl ConfigureCommand {
    /// Create a command running `script` with `features` and no compiler or linker flags.
    #[must_use]
    pub fn new(script: &str, features: Vec<String>) -> Self {
        Self {
            script: script.to_string(),
            features,
            cflags: Vec::new(),
            ldflags: Vec::new(),
        }
    }
}

impl std::fmt::Display for ConfigureCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            r#"{} CFLAGS="{}" LDFLAGS="{}""#,
            std::iter::once(&self.script)
                .chain(&self.features)
                .join(" "),
            self.cflags.join(" "),
            self.ldflags.join(" ")
        )
    }
}

/// Print `command` and, unless `echo` is set, run it with `sh -c`.
///
/// Returns the exit code of the command, `0` when only echoing and `1` if it was terminated by a signal.
///
/// # Errors
/// Returns [`ConfigureError::Execute`] if the shell cannot be started.
pub fn execute(command: &ConfigureCommand, echo: bool) -> Result<i32, ConfigureError> {
    let command = command.to_string();
    println!("{command}");
    if echo {
        return Ok(0);
    }

    let status = Command::new("sh")
        .arg("-c")
        .arg(&command)
        .status()
        .map_err(ConfigureError::Execute)?;
    tracing::debug!(%status, "configure command finished");
    Ok(status.code().unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(script: &str) -> ConfigureCommand {
        let mut command = ConfigureCommand::new(script, vec!["--enable-nczarr".to_string()]);
        command.cflags.push("-I/deps/include".to_string());
        command.ldflags.extend(["-L/deps/lib".to_string(), "-static".to_string()]);
        command
    }

    #[test]
    fn command_display() {
        assert_eq!(
            command("./configure").to_string(),
            r#"./configure --enable-nczarr CFLAGS="-I/deps/include" LDFLAGS="-L/deps/lib -static""#
        );
        assert_eq!(
            ConfigureCommand::new("./configure", vec![]).to_string(),
            r#"./configure CFLAGS="" LDFLAGS="""#
        );
    }

    #[test]
    fn execute_echo() {
        assert_eq!(execute(&command("false"), true).unwrap(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn execute_status() {
        assert_eq!(execute(&command("true"), false).unwrap(), 0);
        assert_eq!(execute(&command("exit 3;"), false).unwrap(), 3);
    }
}
