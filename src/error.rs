use std::io;

use thiserror::Error;

/// Why a single line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("no ';' separator")]
    MissingSeparator,
    #[error("empty key")]
    EmptyKey,
    #[error("key is not valid UTF-8")]
    InvalidKey,
    #[error("reading is not of the form [-]d[d[d]].d")]
    InvalidReading,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to map input: {0}")]
    Mapping(#[source] io::Error),

    #[error("malformed line at byte {offset}: {reason}: {line:?}")]
    MalformedLine {
        offset: usize,
        line: String,
        reason: LineError,
    },

    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("worker thread panicked")]
    WorkerPanicked,
}

/// Longest slice of an offending line kept in the error message.
const MAX_LINE_ECHO: usize = 128;

impl Error {
    pub(crate) fn malformed(offset: usize, line: &[u8], reason: LineError) -> Self {
        let line = &line[..line.len().min(MAX_LINE_ECHO)];
        Error::MalformedLine {
            offset,
            line: String::from_utf8_lossy(line).into_owned(),
            reason,
        }
    }

    /// Byte offset of the offending line, for parse failures.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::MalformedLine { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}
