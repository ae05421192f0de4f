use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackerError>;

#[derive(Debug, Error)]
pub enum TrackerError {
    /// The CSV source does not have the shape a movie list needs.
    #[error("Invalid movie list: {0}")]
    DataFormat(String),

    /// A user supplied value was rejected.
    #[error("Invalid value: {0}")]
    Validation(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No movie matches '{0}'")]
    RecordNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
}

impl TrackerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TrackerError::Io {
            path: path.into(),
            source,
        }
    }

    /// Maps a csv crate error, keeping I/O failures apart from malformed data.
    pub(crate) fn from_csv(path: impl Into<PathBuf>, err: csv::Error) -> Self {
        if err.is_io_error() {
            return match err.into_kind() {
                csv::ErrorKind::Io(source) => TrackerError::io(path, source),
                other => TrackerError::DataFormat(format!("{:?}", other)),
            };
        }
        TrackerError::DataFormat(err.to_string())
    }
}
