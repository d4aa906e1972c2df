//! Block segments (§4.2 "Block"): the iteration and context-propagation
//! engine at the heart of the generator.

use super::common::Common;
use super::Segment;
use crate::cond::Cond;
use crate::error::Result;
use crate::sink::Sink;
use crate::variables::Variables;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextRule {
    /// A counter that increases monotonically across the block's lifetime;
    /// never reset.
    Incremental,
    /// A counter zeroed on each call to the block's generate.
    Nested,
    /// `parent_context * max + counter` (default).
    Combined,
}

impl ContextRule {
    pub fn parse(s: &str) -> Option<ContextRule> {
        match s.to_ascii_lowercase().as_str() {
            "incremental" => Some(ContextRule::Incremental),
            "nested" => Some(ContextRule::Nested),
            "combined" => Some(ContextRule::Combined),
            _ => None,
        }
    }
}

impl Default for ContextRule {
    fn default() -> Self {
        ContextRule::Combined
    }
}

#[derive(Debug, Clone)]
pub struct Block {
    pub common: Common,
    pub children: Vec<Segment>,
    pub context_rule: ContextRule,
    /// Meaningful only when `0 < ratio < 1` and `min < max` (§3 invariant).
    pub ratio: Option<f64>,
    pub condition: Option<Cond>,
    counter: i64,
}

impl Block {
    pub fn new(
        common: Common,
        children: Vec<Segment>,
        context_rule: ContextRule,
        ratio: Option<f64>,
        condition: Option<Cond>,
    ) -> Self {
        Block {
            common,
            children,
            context_rule,
            ratio,
            condition,
            counter: 0,
        }
    }

    /// Determine iteration count `N` (§4.2 step 4): exact when `min ==
    /// max`, ratio-decayed geometric truncated at `max` when a valid ratio
    /// is set, otherwise uniform in `[min, max]`.
    fn count(&mut self) -> i64 {
        if self.common.min == self.common.max {
            return self.common.max;
        }
        if let Some(ratio) = self.ratio {
            if ratio > 0.0 && ratio < 1.0 {
                let mut n = self.common.min;
                while n < self.common.max {
                    let u = self.common.dist.uniform().next_f64();
                    if u < ratio {
                        n += 1;
                    } else {
                        break;
                    }
                }
                return n;
            }
        }
        let span = (self.common.max - self.common.min + 1).max(1);
        self.common.min + self.common.dist.uniform().next_i64(span)
    }

    fn child_context(&self, parent_context: i64) -> i64 {
        match self.context_rule {
            ContextRule::Incremental | ContextRule::Nested => self.counter,
            ContextRule::Combined => parent_context * self.common.max + self.counter,
        }
    }

    pub fn generate(
        &mut self,
        parent_context: i64,
        vars: &mut Variables,
        sink: &mut dyn Sink,
    ) -> Result<usize> {
        if let Some(cond) = &self.condition {
            if !cond.eval(vars) {
                return Ok(0);
            }
        }
        if self.context_rule != ContextRule::Incremental {
            self.counter = 0;
        }
        let n = self.count();
        let mut total = 0usize;
        for _ in 0..n {
            let child_context = self.child_context(parent_context);
            for child in &mut self.children {
                total += child.generate(child_context, vars, sink)?;
            }
            self.counter += 1;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamMap;
    use crate::segment::literal::Literal;
    use crate::segment::value::Value;
    use crate::sink::StringSink;

    fn value_context_segment() -> Segment {
        let params = ParamMap::parse("order=context").unwrap();
        let common = Common::decode(2, 1, &params);
        Segment::Value(Value {
            common,
            format: "#0".to_string(),
            ratio: None,
        })
    }

    #[test]
    fn combined_context_sequence() {
        let inner_params = ParamMap::parse("count=3 context=combined").unwrap();
        let inner_common = Common::decode(1, 1, &inner_params);
        let inner = Block::new(
            inner_common,
            vec![
                Segment::Literal(Literal { bytes: b"[".to_vec() }),
                value_context_segment(),
                Segment::Literal(Literal { bytes: b"]".to_vec() }),
            ],
            ContextRule::Combined,
            None,
            None,
        );

        let root_params = ParamMap::parse("count=1 context=combined").unwrap();
        let root_common = Common::decode(0, 1, &root_params);
        let mut root = Block::new(root_common, vec![Segment::Block(inner)], ContextRule::Combined, None, None);

        let mut vars = Variables::new();
        let mut sink = StringSink::new();
        root.generate(2, &mut vars, &mut sink).unwrap();
        assert_eq!(sink.into_string(), "[6][7][8]");
    }

    #[test]
    fn exact_count_when_min_equals_max() {
        let params = ParamMap::parse("count=5").unwrap();
        let common = Common::decode(0, 1, &params);
        let mut block = Block::new(common, vec![], ContextRule::Combined, None, None);
        assert_eq!(block.count(), 5);
    }

    #[test]
    fn ratio_decay_stays_in_bounds() {
        let params = ParamMap::parse("min=1 max=20").unwrap();
        let common = Common::decode(0, 1, &params);
        let mut block = Block::new(common, vec![], ContextRule::Combined, Some(0.5), None);
        for _ in 0..200 {
            let n = block.count();
            assert!((1..=20).contains(&n));
        }
    }

    #[test]
    fn false_condition_emits_nothing() {
        let params = ParamMap::parse("count=3").unwrap();
        let common = Common::decode(0, 1, &params);
        let mut block = Block::new(
            common,
            vec![value_context_segment()],
            ContextRule::Combined,
            None,
            Some(Cond::parse("1>2")),
        );
        let mut vars = Variables::new();
        let mut sink = StringSink::new();
        let n = block.generate(0, &mut vars, &mut sink).unwrap();
        assert_eq!(n, 0);
        assert_eq!(sink.into_string(), "");
    }
}
