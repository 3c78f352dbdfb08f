//! Converter and front-end settings.
//!
//! Every field has a default, so an empty file (or no file) is valid.
//! `PYSH_CONFIG` names a TOML file to load instead of the defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::converter::PyshRuntime;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "PYSH_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Program that runs the generated code.
    pub interpreter: String,
    /// Write the auto-generated banner into converted files.
    pub signature: bool,
    pub runtime: RuntimeConfig,
}

/// Where shell segments are sent at run time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub module: String,
    pub function: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interpreter: "python".to_string(),
            signature: true,
            runtime: RuntimeConfig::default(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            module: "pysh.pysh".to_string(),
            function: "run".to_string(),
        }
    }
}

/// Error produced while loading a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Config {
    /// Parse a TOML document.
    ///
    /// # Errors
    ///
    /// Returns the TOML error when the document does not match the schema.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Load a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the file named by `PYSH_CONFIG`, or the defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => {
                let config = Self::load(Path::new(&path))?;
                log::debug!("loaded config from {}", Path::new(&path).display());
                Ok(config)
            }
            _ => Ok(Self::default()),
        }
    }

    #[must_use]
    pub fn runtime(&self) -> PyshRuntime {
        PyshRuntime::new(&self.runtime.module, &self.runtime.function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let config = Config::from_toml_str("").expect("should parse");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_runtime_section() {
        let config = Config::from_toml_str("signature = false\n[runtime]\nmodule = \"sh\"\n")
            .expect("should parse");
        assert!(!config.signature);
        assert_eq!(config.interpreter, "python");
        assert_eq!(config.runtime.module, "sh");
        assert_eq!(config.runtime.function, "run");
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(Config::from_toml_str("signature = \"yes\"").is_err());
    }

    #[test]
    fn missing_file() {
        let err = Config::load(Path::new("/nonexistent/pysh.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
