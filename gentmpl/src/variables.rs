//! The shared, case-insensitive variables table (§3 "Variables table",
//! §6 `set_variables`).

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A case-insensitive name -> value mapping, shared across every segment of
/// one compiled tree. Reads of an unset key yield the empty string; writes
/// are visible to any segment later in the depth-first traversal.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    map: HashMap<String, String>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> &str {
        self.map
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.map.contains_key(&name.to_ascii_lowercase())
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.map.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Apply a `set_variables` spec (§6): `none`, `{k=v,k2=v2,...}`, or a
    /// properties file path, one `key=value` per line. Later calls override
    /// earlier ones; this is additive, not a reset.
    pub fn apply_spec(&mut self, spec: &str) -> Result<()> {
        let spec = spec.trim();
        if spec.is_empty() || spec.eq_ignore_ascii_case("none") {
            return Ok(());
        }
        if let Some(inner) = spec.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            self.apply_inline(inner);
            return Ok(());
        }
        let contents = fs::read_to_string(Path::new(spec)).map_err(Error::Io)?;
        self.apply_properties(&contents);
        Ok(())
    }

    fn apply_inline(&mut self, inner: &str) {
        for pair in inner.split(',') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            if let Some((k, v)) = pair.split_once('=') {
                self.set(k.trim(), v.trim());
            } else {
                log::warn!("ignoring malformed inline variable assignment: {pair:?}");
            }
        }
    }

    fn apply_properties(&mut self, contents: &str) {
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((k, v)) = line.split_once('=') {
                self.set(k.trim(), v.trim());
            } else {
                log::warn!("ignoring malformed properties line: {line:?}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_reads_as_empty() {
        let vars = Variables::new();
        assert_eq!(vars.get("x"), "");
    }

    #[test]
    fn keys_are_case_insensitive() {
        let mut vars = Variables::new();
        vars.set("Foo", "bar");
        assert_eq!(vars.get("foo"), "bar");
        assert_eq!(vars.get("FOO"), "bar");
    }

    #[test]
    fn inline_spec_sets_multiple() {
        let mut vars = Variables::new();
        vars.apply_spec("{x=1,y=2}").unwrap();
        assert_eq!(vars.get("x"), "1");
        assert_eq!(vars.get("y"), "2");
    }

    #[test]
    fn none_spec_is_noop() {
        let mut vars = Variables::new();
        vars.set("x", "1");
        vars.apply_spec("none").unwrap();
        assert_eq!(vars.get("x"), "1");
    }

    #[test]
    fn later_spec_overrides_earlier() {
        let mut vars = Variables::new();
        vars.apply_spec("{x=1}").unwrap();
        vars.apply_spec("{x=2}").unwrap();
        assert_eq!(vars.get("x"), "2");
    }
}
