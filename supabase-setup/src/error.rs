use crate::client::ClientError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} contains no SQL", path.display())]
    EmptyScript { path: PathBuf },

    #[error("Statement {ordinal} (line {line}) failed: {source}")]
    Statement {
        ordinal: usize,
        line: usize,
        #[source]
        source: ClientError,
    },

    #[error("Request failed: {0}")]
    Submit(#[from] ClientError),
}

impl SetupError {
    /// Step of the run the error came from, as reported in events.
    pub fn phase(&self) -> &'static str {
        match self {
            Self::Read { .. } | Self::EmptyScript { .. } => "read_script",
            Self::Statement { .. } => "execute",
            Self::Submit(_) => "submit",
        }
    }

    /// Statements that had already been applied when the error occurred.
    pub fn executed_before(&self) -> usize {
        match self {
            Self::Statement { ordinal, .. } => ordinal.saturating_sub(1),
            _ => 0,
        }
    }
}
