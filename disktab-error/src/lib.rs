use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type HalResult<T> = Result<T, HalError>;
pub type TableResult<T> = Result<T, TableError>;

/// Failures of the world-touching layer.
///
/// None of these reach callers of the mount table: the enumerator absorbs
/// them into "unknown" or identity behaviour.
#[derive(Error, Debug)]
pub enum HalError {
    #[error("Device enumeration unavailable: {0}")]
    EnumerationUnavailable(String),

    #[error("Rotational flag unavailable for {0}")]
    ProbeUnavailable(String),

    #[error("No whole disk found for device {0}")]
    NoWholeDisk(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("nix errno: {0}")]
    Nix(#[from] nix::errno::Errno),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Errors surfaced by the public query API.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Path not found: {}", path.display())]
    PathNotFound {
        path: PathBuf,
        #[source]
        source: HalError,
    },
}

impl TableError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            TableError::PathNotFound { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_not_found_names_the_path() {
        let err = TableError::PathNotFound {
            path: PathBuf::from("/nonexistent"),
            source: HalError::Nix(nix::errno::Errno::ENOENT),
        };
        assert_eq!(err.to_string(), "Path not found: /nonexistent");
        assert_eq!(err.path(), std::path::Path::new("/nonexistent"));
    }

    #[test]
    fn io_errors_convert() {
        let err: HalError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, HalError::Io(_)));
    }
}
