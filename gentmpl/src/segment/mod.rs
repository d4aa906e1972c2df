//! The segment tree (§3 "Segment (tagged variant)").
//!
//! A compiled template is a tree of `Segment`s. Rather than the class
//! hierarchy a generator-per-type design invites, every node is one case of
//! a single enum: the parser builds it, `generate` walks it, and there is
//! no dynamic dispatch anywhere in the hot path.

pub mod block;
pub mod common;
pub mod date;
pub mod file;
pub mod literal;
pub mod value;
pub mod variable;
pub mod words;

pub use block::{Block, ContextRule};
pub use common::Common;
pub use date::{DateSeg, DateType};
pub use file::FileSeg;
pub use literal::Literal;
pub use value::Value;
pub use variable::VariableSeg;
pub use words::Words;

use crate::error::Result;
use crate::sink::Sink;
use crate::variables::Variables;

#[derive(Debug, Clone)]
pub enum Segment {
    Literal(Literal),
    Value(Value),
    Words(Words),
    Date(DateSeg),
    Variable(VariableSeg),
    File(FileSeg),
    Block(Block),
}

impl Segment {
    pub fn generate(
        &mut self,
        context: i64,
        vars: &mut Variables,
        sink: &mut dyn Sink,
    ) -> Result<usize> {
        match self {
            Segment::Literal(s) => s.generate(sink),
            Segment::Value(s) => s.generate(context, vars, sink),
            Segment::Words(s) => s.generate(context, vars, sink),
            Segment::Date(s) => s.generate(context, vars, sink),
            Segment::Variable(s) => s.generate(vars, sink),
            Segment::File(s) => s.generate(context, vars, sink),
            Segment::Block(s) => s.generate(context, vars, sink),
        }
    }

    /// Seed any `gen.variable name=` declarations in the tree with their
    /// defaults (§4.2 "At initialization, before the first generate call").
    pub fn init_variables(&self, vars: &mut Variables) {
        match self {
            Segment::Variable(s) => s.init(vars),
            Segment::File(s) => s.root.init_variables(vars),
            Segment::Block(s) => {
                for child in &s.children {
                    child.init_variables(vars);
                }
            }
            Segment::Literal(_) | Segment::Value(_) | Segment::Words(_) | Segment::Date(_) => {}
        }
    }
}
