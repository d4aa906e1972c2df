//! Error types for the two categories in §7 that actually propagate to the
//! caller: fatal parse errors and runtime I/O failures. Recoverable
//! configuration errors (§7 category 2) never construct an `Error`; they log
//! a warning via the `log` crate and the parser/generator continues.

use std::fmt;
use std::io;

#[derive(Debug)]
pub enum Error {
    /// A fatal parse error, reported with the byte offset into the template
    /// where it was detected (§4.1 "Error surface").
    Parse { offset: usize, message: String },
    /// The template exceeded the ~100MB size ceiling from §6.
    TemplateTooLarge { bytes: usize },
    /// `File` include recursion exceeded the 25-level cap (§4.2, §5).
    IncludeDepthExceeded { depth: usize },
    /// Propagated I/O failure (reading a template/word-list/properties file,
    /// or a sink write failure during generation).
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse { offset, message } => {
                write!(f, "parse error at offset {offset}: {message}")
            }
            Error::TemplateTooLarge { bytes } => {
                write!(f, "template too large: {bytes} bytes exceeds the 100MB limit")
            }
            Error::IncludeDepthExceeded { depth } => {
                write!(f, "file include depth {depth} exceeds the limit of 25")
            }
            Error::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
