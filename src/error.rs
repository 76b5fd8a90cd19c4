use std::{
    io,
    path::{Path, PathBuf},
    process::{ExitStatus, Output},
};
use thiserror::Error;

pub type Result<T, E = SolcError> = std::result::Result<T, E>;

/// Various error types
#[derive(Debug, Error)]
pub enum SolcError {
    /// Errors related to the solc executable itself.
    #[error("solc exited with {0}\n{1}")]
    SolcError(ExitStatus, String),
    #[error("invalid UTF-8 in solc output")]
    InvalidUtf8,
    #[error(transparent)]
    Io(#[from] SolcIoError),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    /// Failed to walk the project's source directory.
    #[error("failed to discover sources: {0}")]
    Discovery(#[from] walkdir::Error),
    /// The project's settings file is not valid json.
    #[error("failed to parse settings file \"{}\": {err}", .path.display())]
    Settings { path: PathBuf, err: serde_json::Error },
    #[error("Source file \"{0}\" not found")]
    SourceNotFound(String),
    #[error("Not a contract \"{contract}\" in \"{file}\"")]
    UnknownContract { contract: String, file: String },
    #[error("{0}")]
    Message(String),
}

impl SolcError {
    pub(crate) fn io(err: io::Error, path: impl Into<PathBuf>) -> Self {
        SolcIoError::new(err, path).into()
    }

    /// Create an error from the Solc executable's output.
    pub(crate) fn solc_output(output: &Output) -> Self {
        let mut msg = String::from_utf8_lossy(&output.stderr);
        let mut trimmed = msg.trim();
        if trimmed.is_empty() {
            msg = String::from_utf8_lossy(&output.stdout);
            trimmed = msg.trim();
            if trimmed.is_empty() {
                trimmed = "<empty output>";
            }
        }
        SolcError::SolcError(output.status, trimmed.into())
    }

    pub fn msg(msg: impl std::fmt::Display) -> Self {
        SolcError::Message(msg.to_string())
    }

    /// Whether this error is caused by the user's request rather than the environment.
    ///
    /// Domain errors are reported as plain messages, everything else also gets its debug
    /// representation logged.
    pub fn is_domain(&self) -> bool {
        matches!(self, Self::SourceNotFound(_) | Self::UnknownContract { .. })
    }
}

/// An I/O error tied to the path it occurred on.
#[derive(Debug, Error)]
#[error("\"{}\": {io}", .path.display())]
pub struct SolcIoError {
    io: io::Error,
    path: PathBuf,
}

impl SolcIoError {
    pub fn new(io: io::Error, path: impl Into<PathBuf>) -> Self {
        Self { io, path: path.into() }
    }

    /// The path at which the error occurred
    pub fn path(&self) -> &Path {
        &self.path
    }
}
