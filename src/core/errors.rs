// src/core/errors.rs

//! Defines the primary error type for the decoder.

use thiserror::Error;

/// The main error enum, representing all possible failures while decoding an
/// RDB file. Every variant is fatal to the current decode; there is no
/// recovery or resynchronisation.
#[derive(Error, Debug)]
pub enum RdbError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected end of file inside a record")]
    Truncated,

    #[error("not an RDB file: bad magic header")]
    BadHeader,

    #[error("unsupported RDB version {0}")]
    BadVersion(u32),

    #[error("format error: {0}")]
    Format(String),

    #[error("unsupported feature: {0}")]
    Unsupported(String),
}

impl RdbError {
    /// Short kind name, used for the one-line stderr report.
    pub fn kind(&self) -> &'static str {
        match self {
            RdbError::Io(_) => "io error",
            RdbError::Truncated => "truncated file",
            RdbError::BadHeader => "bad header",
            RdbError::BadVersion(_) => "bad version",
            RdbError::Format(_) => "format error",
            RdbError::Unsupported(_) => "unsupported feature",
        }
    }
}
