//! Shared attribute decoding for processing instructions (§4.1 "Argument
//! decoding"): the `name`/`order`/`min`/`max`/`count`/`factor`/`range`/`save`
//! keys every segment recognizes, plus the `range=AtoBbyC` shorthand and the
//! `$VAR` integer-parameter expansion.

use crate::distribution::DEFAULT_MAX;
use crate::rng::Uniform;
use crate::rng::Zipf;
use crate::variables::Variables;
use std::collections::HashMap;

/// A parsed `key=value` argument list from one processing instruction.
/// Keys are lower-cased on insertion (§6 "Processing-instruction syntax").
#[derive(Debug, Clone, Default)]
pub struct ParamMap {
    raw: HashMap<String, String>,
}

impl ParamMap {
    /// Parse a whitespace-separated `key=value key2=value2` argument list.
    /// Returns `Err` with the offending pair text if any pair is missing its
    /// `=` (§4.1 "Error surface": missing equals in an argument pair).
    pub fn parse(args: &str) -> Result<ParamMap, String> {
        let mut raw = HashMap::new();
        for pair in args.split_whitespace() {
            let (k, v) = pair
                .split_once('=')
                .ok_or_else(|| format!("argument {pair:?} is missing '='"))?;
            raw.insert(k.to_ascii_lowercase(), v.to_string());
        }
        let mut map = ParamMap { raw };
        map.expand_range();
        Ok(map)
    }

    /// `range=AtoBbyC` sets `min=A max=B factor=C` in one attribute (§4.1).
    fn expand_range(&mut self) {
        let Some(range) = self.raw.get("range").cloned() else {
            return;
        };
        if let Some((ab, c)) = range.split_once("by") {
            if let Some((a, b)) = ab.split_once("to") {
                self.raw.entry("min".into()).or_insert_with(|| a.to_string());
                self.raw.entry("max".into()).or_insert_with(|| b.to_string());
                self.raw.entry("factor".into()).or_insert_with(|| c.to_string());
                return;
            }
        }
        log::warn!("malformed range attribute {range:?}, expected AtoBbyC");
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.raw.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.raw.contains_key(key)
    }

    /// Plain integer attribute: no `$VAR` expansion, falls back to `default`
    /// on any parse failure (§7 category 2).
    pub fn int(&self, key: &str, default: i64) -> i64 {
        match self.raw.get(key) {
            None => default,
            Some(v) => v.parse().unwrap_or_else(|_| {
                log::warn!("attribute {key}={v:?} is not a valid integer, using default {default}");
                default
            }),
        }
    }

    pub fn float(&self, key: &str, default: f64) -> f64 {
        match self.raw.get(key) {
            None => default,
            Some(v) => v.parse().unwrap_or_else(|_| {
                log::warn!("attribute {key}={v:?} is not a valid float, using default {default}");
                default
            }),
        }
    }

    /// Integer attribute with `$VAR` expansion (§4.1 "Dollar-variable
    /// expansion"): `$RANDOM` draws a fresh uniform int in `[0,
    /// DEFAULT_MAX)`, `$ZIPF` draws a fresh Zipf value, `$NAME` looks up a
    /// variable and falls back to `default` if unset or unparsable.
    pub fn int_expanded(
        &self,
        key: &str,
        default: i64,
        vars: &Variables,
        rng: &mut Uniform,
    ) -> i64 {
        let Some(raw) = self.raw.get(key) else {
            return default;
        };
        if let Some(name) = raw.strip_prefix('$') {
            return match name.to_ascii_uppercase().as_str() {
                "RANDOM" => rng.next_i64(DEFAULT_MAX),
                "ZIPF" => Zipf::new(crate::distribution::DEFAULT_ZIPF, crate::distribution::DEFAULT_ZIPF_THETA).next(),
                _ => {
                    let value = vars.get(name);
                    value.parse().unwrap_or_else(|_| {
                        log::warn!("variable ${name} is unset or not an integer, using default {default}");
                        default
                    })
                }
            };
        }
        raw.parse().unwrap_or_else(|_| {
            log::warn!("attribute {key}={raw:?} is not a valid integer, using default {default}");
            default
        })
    }

    pub fn string(&self, key: &str, default: &str) -> String {
        self.raw
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_pairs() {
        let p = ParamMap::parse("name=x min=1 max=10").unwrap();
        assert_eq!(p.get("name"), Some("x"));
        assert_eq!(p.int("min", 0), 1);
        assert_eq!(p.int("max", 0), 10);
    }

    #[test]
    fn missing_equals_errors() {
        assert!(ParamMap::parse("name=x badtoken").is_err());
    }

    #[test]
    fn range_shorthand_expands() {
        let p = ParamMap::parse("range=1to10by2").unwrap();
        assert_eq!(p.int("min", 0), 1);
        assert_eq!(p.int("max", 0), 10);
        assert_eq!(p.int("factor", 1), 2);
    }

    #[test]
    fn dollar_variable_expands_from_table() {
        let mut vars = Variables::new();
        vars.set("n", "42");
        let p = ParamMap::parse("max=$n").unwrap();
        let mut rng = Uniform::from_seed(1);
        assert_eq!(p.int_expanded("max", -1, &vars, &mut rng), 42);
    }

    #[test]
    fn dollar_variable_falls_back_when_unset() {
        let vars = Variables::new();
        let p = ParamMap::parse("max=$missing").unwrap();
        let mut rng = Uniform::from_seed(1);
        assert_eq!(p.int_expanded("max", 7, &vars, &mut rng), 7);
    }
}
