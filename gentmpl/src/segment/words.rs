//! Words segments (§4.2 "Words").

use super::common::Common;
use crate::error::Result;
use crate::sink::Sink;
use crate::text::{self, WordList};
use crate::variables::Variables;
use std::sync::OnceLock;

/// Hardcoded word-wrap width: a newline follows every 14 words (§4.2, §9
/// Open Question — kept configurable-by-edit via this constant rather than
/// a new attribute, to preserve the default behavior).
const WORDS_PER_LINE: usize = 14;

#[derive(Debug, Clone)]
pub struct Words {
    pub common: Common,
    pub source: String,
    list: OnceLock<WordList>,
}

impl Words {
    pub fn new(common: Common, source: String) -> Self {
        Words {
            common,
            source,
            list: OnceLock::new(),
        }
    }

    fn list(&self, base_seed: u64) -> &WordList {
        self.list
            .get_or_init(|| text::resolve(&self.source, base_seed))
    }

    pub fn generate(
        &mut self,
        context: i64,
        vars: &mut Variables,
        sink: &mut dyn Sink,
    ) -> Result<usize> {
        let base_seed = self.common.id;
        let list = self.list(base_seed).clone();
        let count_raw = self.common.dist.uniform().next_i64(self.common.max.max(1));
        let count = crate::distribution::transform(
            count_raw,
            self.common.min,
            self.common.max,
            self.common.factor,
        )
        .max(0);

        let mut out = Vec::new();
        for i in 0..count {
            if i > 0 {
                out.push(if i % WORDS_PER_LINE as i64 == 0 { b'\n' } else { b' ' });
            }
            let idx = self
                .common
                .dist
                .word_index(self.common.order, context, list.len() as i64);
            out.extend_from_slice(list.word(idx as usize));
        }

        if let Some(save) = self.common.save.clone() {
            vars.set(&save, String::from_utf8_lossy(&out).into_owned());
        }
        sink.write_bytes(&out)?;
        Ok(out.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamMap;
    use crate::variables::Variables;
    use crate::sink::StringSink;

    #[test]
    fn serial_source_cycles_and_persists() {
        let params = ParamMap::parse("count=2 order=serial source={a,b,c}").unwrap();
        let common = Common::decode(1, 1, &params);
        let mut words = Words::new(common, "{a,b,c}".to_string());
        let mut vars = Variables::new();

        let mut sink = StringSink::new();
        words.generate(0, &mut vars, &mut sink).unwrap();
        assert_eq!(sink.into_string(), "a b");

        let mut sink2 = StringSink::new();
        words.generate(0, &mut vars, &mut sink2).unwrap();
        assert_eq!(sink2.into_string(), "c a");
    }
}
