use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StatsError>;

/// Every failure aborts the run; nothing here is retried.
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("failed to access {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("label code `{code}` has no entry in label map {map}")]
    Lookup { map: String, code: String },

    #[error("line {line} of {} has no field {field}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        field: usize,
    },

    #[error("consistency check failed: {0}")]
    Consistency(String),

    #[error("failed to serialize output: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
}

impl StatsError {
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StatsError::FileAccess {
            path: path.into(),
            source,
        }
    }
}
