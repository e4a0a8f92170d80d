//! Library-level failure modes: things that stop a compilation from being
//! attempted at all (bad paths, unreadable files, malformed configuration).
//! In-band compile problems that still produce output are [`crate::diagnostics::Diagnostic`],
//! not `CompilerError`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompilerError {
    #[error("failed to read source file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("source file {0} is not valid UTF-8")]
    InvalidEncoding(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("module '{0}' could not be resolved on any search path")]
    ModuleNotFound(String),

    #[error("compilation aborted: {0} fatal diagnostic(s) emitted")]
    Aborted(usize),
}

pub type Result<T> = std::result::Result<T, CompilerError>;
