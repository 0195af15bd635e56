use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ConfigureError;

/// The prefix of environment variables overriding [`ConfigurePaths`].
pub const ENV_PREFIX: &str = "CONFIGURE_";

/// Include and library directories of a dependency installation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSet {
    /// The include directory, passed as `-I<include_dir>`.
    pub include_dir: String,
    /// The library directory, passed as `-L<lib_dir>`.
    pub lib_dir: String,
}

impl PathSet {
    fn new(root: &str) -> Self {
        Self {
            include_dir: format!("{root}/include"),
            lib_dir: format!("{root}/lib"),
        }
    }
}

/// Environment specific tokens of a configure command.
///
/// Values are layered: [`Default`], then an optional JSON file ([`ConfigurePaths::from_file`]), then `CONFIGURE_*` environment variables ([`ConfigurePaths::apply_env`]).
/// A JSON file may set any subset of fields.
/// List valued environment variables are split on whitespace.
///
/// ## Script
/// > default: `./configure` (`CONFIGURE_SCRIPT`)
///
/// ## Features
/// > default: `--enable-nczarr --disable-hdf5` (`CONFIGURE_FEATURES`)
///
/// The baseline feature flags of every command.
///
/// ## Host
/// > default: `x86_64-w64-mingw32` (`CONFIGURE_HOST`)
///
/// The host triple of 64-bit cross builds.
///
/// ## Minimal Features
/// > default: `--disable-dap --disable-byterange --disable-libxml2` (`CONFIGURE_MINIMAL_FEATURES`)
///
/// ## Debug Flags
/// > default: `-g -O0` (`CONFIGURE_DEBUG_FLAGS`)
///
/// ## Path Sets
/// > default: `/opt/deps/<x86|x86_64>/<static|shared>/{include,lib}`
///
/// Overridden by `CONFIGURE_<STATIC|SHARED>_<32|64>_<INCLUDE|LIB>`, e.g. `CONFIGURE_STATIC_32_LIB`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigurePaths {
    /// The configure script.
    pub script: String,
    /// Baseline feature flags.
    pub features: Vec<String>,
    /// The host triple of 64-bit builds.
    pub host: String,
    /// Feature flags of a minimal build.
    pub minimal_features: Vec<String>,
    /// Compiler and linker flags of a debug build.
    pub debug_flags: Vec<String>,
    /// Static 32-bit dependencies.
    pub static_32: PathSet,
    /// Static 64-bit dependencies.
    pub static_64: PathSet,
    /// Shared 32-bit dependencies.
    pub shared_32: PathSet,
    /// Shared 64-bit dependencies.
    pub shared_64: PathSet,
}

fn strings(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(ToString::to_string).collect()
}

impl Default for ConfigurePaths {
    fn default() -> Self {
        Self {
            script: "./configure".to_string(),
            features: strings(&["--enable-nczarr", "--disable-hdf5"]),
            host: "x86_64-w64-mingw32".to_string(),
            minimal_features: strings(&["--disable-dap", "--disable-byterange", "--disable-libxml2"]),
            debug_flags: strings(&["-g", "-O0"]),
            static_32: PathSet::new("/opt/deps/x86/static"),
            static_64: PathSet::new("/opt/deps/x86_64/static"),
            shared_32: PathSet::new("/opt/deps/x86/shared"),
            shared_64: PathSet::new("/opt/deps/x86_64/shared"),
        }
    }
}

impl ConfigurePaths {
    /// Load the paths from the defaults, an optional JSON `config` file, and the process environment.
    ///
    /// # Errors
    /// Returns a [`ConfigureError`] if `config` cannot be read or parsed.
    pub fn load(config: Option<&Path>) -> Result<Self, ConfigureError> {
        let mut paths = match config {
            Some(config) => Self::from_file(config)?,
            None => Self::default(),
        };
        paths.apply_env(std::env::vars());
        Ok(paths)
    }

    /// Read the paths from a JSON file, with missing fields taken from the defaults.
    ///
    /// # Errors
    /// Returns a [`ConfigureError`] if `path` cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigureError> {
        let contents = std::fs::read(path)
            .map_err(|err| ConfigureError::ReadConfig(path.to_path_buf(), err))?;
        serde_json::from_slice(&contents)
            .map_err(|err| ConfigureError::InvalidConfig(path.to_path_buf(), err))
    }

    /// Override fields from `CONFIGURE_*` variables in `vars`. Other variables are ignored.
    pub fn apply_env<I: IntoIterator<Item = (String, String)>>(&mut self, vars: I) {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let list = || value.split_whitespace().map(str::to_string).collect();
            match name {
                "SCRIPT" => self.script.clone_from(&value),
                "FEATURES" => self.features = list(),
                "HOST" => self.host.clone_from(&value),
                "MINIMAL_FEATURES" => self.minimal_features = list(),
                "DEBUG_FLAGS" => self.debug_flags = list(),
                _ => {
                    if let Some(dir) = self.path_set_dir_mut(name) {
                        dir.clone_from(&value);
                    } else {
                        tracing::debug!(key = %key, "ignoring unknown configure variable");
                    }
                }
            }
        }
    }

    fn path_set_dir_mut(&mut self, name: &str) -> Option<&mut String> {
        let (set, dir) = name.rsplit_once('_')?;
        let path_set = match set {
            "STATIC_32" => &mut self.static_32,
            "STATIC_64" => &mut self.static_64,
            "SHARED_32" => &mut self.shared_32,
            "SHARED_64" => &mut self.shared_64,
            _ => return None,
        };
        match dir {
            "INCLUDE" => Some(&mut path_set.include_dir),
            "LIB" => Some(&mut path_set.lib_dir),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn var(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[test]
    fn paths_env() {
        let mut paths = ConfigurePaths::default();
        paths.apply_env([
            var("CONFIGURE_HOST", "i686-w64-mingw32"),
            var("CONFIGURE_MINIMAL_FEATURES", " --disable-dap  --disable-v2 "),
            var("CONFIGURE_STATIC_32_LIB", "/deps/lib32"),
            var("CONFIGURE_SHARED_64_INCLUDE", "/deps/include"),
            var("CONFIGURE_STATIC_32_BIN", "/ignored"),
            var("PATH", "/usr/bin"),
        ]);
        assert_eq!(paths.host, "i686-w64-mingw32");
        assert_eq!(paths.minimal_features, ["--disable-dap", "--disable-v2"]);
        assert_eq!(paths.static_32.lib_dir, "/deps/lib32");
        assert_eq!(paths.static_32.include_dir, "/opt/deps/x86/static/include");
        assert_eq!(paths.shared_64.include_dir, "/deps/include");
        assert_eq!(paths.script, "./configure");
    }

    #[test]
    fn paths_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"script": "../netcdf-c/configure", "static_64": {{"include_dir": "/i", "lib_dir": "/l"}}}}"#
        )
        .unwrap();
        let paths = ConfigurePaths::from_file(file.path()).unwrap();
        assert_eq!(paths.script, "../netcdf-c/configure");
        assert_eq!(paths.static_64.lib_dir, "/l");
        assert_eq!(paths.features, ConfigurePaths::default().features);

        let mut invalid = tempfile::NamedTempFile::new().unwrap();
        write!(invalid, r#"{{"scripts": "typo"}}"#).unwrap();
        assert!(matches!(
            ConfigurePaths::from_file(invalid.path()),
            Err(ConfigureError::InvalidConfig(..))
        ));
        assert!(matches!(
            ConfigurePaths::from_file(Path::new("/nonexistent/configure.json")),
            Err(ConfigureError::ReadConfig(..))
        ));
    }
}
