//! Output contract (§4.4): the generator writes bytes to a caller-owned
//! sink, returning the exact byte count written. This mirrors the
//! `Sink`/`WriterSink` split in the teacher CLI's `main.rs` (`trait Sink`
//! wrapping a `Write` and counting bytes/chunks), generalized so the core
//! engine has no I/O dependency beyond `std`.

use crate::error::Result;
use std::io::Write;

/// A byte sink the generator writes to. Implemented for any `std::io::Write`
/// so files, stdout, and in-memory buffers all work without adapter code.
pub trait Sink {
    fn write_bytes(&mut self, buf: &[u8]) -> Result<()>;
}

impl<W: Write> Sink for W {
    fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        self.write_all(buf).map_err(Into::into)
    }
}

/// Growing in-memory sink backing [`crate::Tree::generate_to_string`].
///
/// The source's string form copies the full output; here it's a thin
/// wrapper over a `Vec<u8>` so the streaming path stays the only code path.
#[derive(Debug, Default)]
pub struct StringSink {
    buf: Vec<u8>,
}

impl StringSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_string(self) -> String {
        String::from_utf8_lossy(&self.buf).into_owned()
    }
}

impl Sink for StringSink {
    fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        self.buf.extend_from_slice(buf);
        Ok(())
    }
}
