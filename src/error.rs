use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, CalcError>;

/// Failures at the file and parsing boundary. The calculations themselves
/// never fail.
#[derive(Debug, Error)]
pub enum CalcError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("toml serialization error: {0}")]
    TomlWrite(#[from] toml::ser::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("unsupported project file extension {0:?}, expected .toml or .json")]
    UnsupportedFormat(PathBuf),
    #[error("unknown preset \"{name}\", available: {available}")]
    UnknownPreset { name: String, available: String },
    #[error("project validation failed:\n{}", join_errors(.0))]
    Invalid(Vec<ConfigError>),
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| format!("  {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}
