//! Variable segments (§4.2 "Variable").
//!
//! Two modes, resolved once at construction time by the parser: `name=`
//! (declare/read, stays in the tree) and `source=` (bulk load, consumed at
//! parse time and never added to the tree — see `parser.rs`).

use crate::error::Result;
use crate::sink::Sink;
use crate::variables::Variables;

#[derive(Debug, Clone)]
pub struct VariableSeg {
    pub name: String,
    pub default: String,
    pub increment: Option<i64>,
    /// Non-numeric fallback counter (§4.2 "On parse failure, append the
    /// increment to an auxiliary non-numeric counter").
    non_numeric_counter: i64,
    /// The value read back the first time parsing as an integer failed.
    /// Captured once so the counter suffix appends to a stable base rather
    /// than compounding onto the previous call's emitted (already-suffixed)
    /// text.
    non_numeric_base: Option<String>,
}

impl VariableSeg {
    pub fn new(name: String, default: String, increment: Option<i64>) -> Self {
        VariableSeg {
            name,
            default,
            increment,
            non_numeric_counter: 0,
            non_numeric_base: None,
        }
    }

    /// Seed the variable with its default if unset (§4.2 "At
    /// initialization").
    pub fn init(&self, vars: &mut Variables) {
        if !vars.is_set(&self.name) {
            vars.set(&self.name, &self.default);
        }
    }

    pub fn generate(&mut self, vars: &mut Variables, sink: &mut dyn Sink) -> Result<usize> {
        let current = vars.get(&self.name).to_string();
        let text = match self.increment {
            None => current,
            Some(inc) => match current.parse::<i64>() {
                Ok(n) => {
                    let next = n + inc;
                    next.to_string()
                }
                Err(_) => {
                    let base = self.non_numeric_base.get_or_insert(current).clone();
                    self.non_numeric_counter += inc;
                    format!("{base}{}", self.non_numeric_counter)
                }
            },
        };
        vars.set(&self.name, &text);
        sink.write_bytes(text.as_bytes())?;
        Ok(text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::StringSink;

    #[test]
    fn seeds_default_then_reads_override() {
        let seg = VariableSeg::new("x".into(), "alpha".into(), None);
        let mut vars = Variables::new();
        seg.init(&mut vars);
        assert_eq!(vars.get("x"), "alpha");

        vars.apply_spec("{x=beta}").unwrap();
        let mut seg = VariableSeg::new("x".into(), "alpha".into(), None);
        let mut sink = StringSink::new();
        seg.generate(&mut vars, &mut sink).unwrap();
        assert_eq!(sink.into_string(), "beta");
    }

    #[test]
    fn increments_numeric_value() {
        let mut vars = Variables::new();
        vars.set("n", "5");
        let mut seg = VariableSeg::new("n".into(), "0".into(), Some(3));
        let mut sink = StringSink::new();
        seg.generate(&mut vars, &mut sink).unwrap();
        assert_eq!(sink.into_string(), "8");
    }

    #[test]
    fn non_numeric_increment_appends_counter() {
        let mut vars = Variables::new();
        vars.set("n", "abc");
        let mut seg = VariableSeg::new("n".into(), "0".into(), Some(1));
        let mut sink = StringSink::new();
        seg.generate(&mut vars, &mut sink).unwrap();
        assert_eq!(sink.into_string(), "abc1");
    }

    #[test]
    fn non_numeric_increment_counts_from_a_stable_base() {
        let mut vars = Variables::new();
        vars.set("n", "abc");
        let mut seg = VariableSeg::new("n".into(), "0".into(), Some(1));

        let mut sink = StringSink::new();
        seg.generate(&mut vars, &mut sink).unwrap();
        assert_eq!(sink.into_string(), "abc1");

        let mut sink = StringSink::new();
        seg.generate(&mut vars, &mut sink).unwrap();
        assert_eq!(sink.into_string(), "abc2");

        let mut sink = StringSink::new();
        seg.generate(&mut vars, &mut sink).unwrap();
        assert_eq!(sink.into_string(), "abc3");
    }
}
