//! File (sub-include) segments (§4.2 "File").
//!
//! The include itself is resolved once, at parse time: the parser reads the
//! referenced template, compiles it into a root `Block` under an
//! incremented include-depth counter (capped at 25, §4.2/§5), and this
//! segment just re-plays that compiled subtree on every generate call.

use super::Segment;
use crate::error::Result;
use crate::sink::Sink;
use crate::variables::Variables;

#[derive(Debug, Clone)]
pub struct FileSeg {
    pub path: String,
    pub root: Box<Segment>,
}

impl FileSeg {
    pub fn generate(
        &mut self,
        context: i64,
        vars: &mut Variables,
        sink: &mut dyn Sink,
    ) -> Result<usize> {
        self.root.generate(context, vars, sink)
    }
}
