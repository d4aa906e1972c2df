//! Literal text segments (§4.2 "Literal").

use crate::error::Result;
use crate::sink::Sink;

#[derive(Debug, Clone)]
pub struct Literal {
    pub bytes: Vec<u8>,
}

impl Literal {
    pub fn generate(&self, sink: &mut dyn Sink) -> Result<usize> {
        sink.write_bytes(&self.bytes)?;
        Ok(self.bytes.len())
    }
}
