//! `gentmpl` — a template generation engine.
//!
//! Compiles a template (free text interleaved with `<?gen.KIND ...?>`
//! processing instructions) into a tree of segments, then walks that tree
//! to emit reproducible, statistically-shaped synthetic text: XML, SQL,
//! CSV, or anything else a test engineer wants driven by a seeded
//! generator (§1, §2).
//!
//! ```no_run
//! let mut tree = gentmpl::Tree::parse_string("<?gen.value order=serial max=3 ?>")?;
//! let out = tree.generate_to_string(0)?;
//! # Ok::<(), std::io::Error>(())
//! ```

pub mod calendar;
pub mod cond;
pub mod distribution;
pub mod error;
pub mod params;
mod parser;
pub mod rng;
pub mod segment;
pub mod sink;
pub mod text;
pub mod variables;

use parser::Parser;
use segment::Segment;
use sink::{Sink, StringSink};
use std::io;
use std::path::{Path, PathBuf};
use variables::Variables;

/// A compiled template: one root segment plus the variables table it was
/// compiled and is generated with (§6 "Compiled-tree API").
pub struct Tree {
    root: Segment,
    vars: Variables,
}

impl Tree {
    /// Load and compile a template from disk (§6 `parse_file`). Relative
    /// `gen.file` includes resolve against the parent directory of `path`.
    pub fn parse_file(path: impl AsRef<Path>) -> io::Result<Tree> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        if text.len() > parser::MAX_TEMPLATE_BYTES {
            return Err(error::Error::TemplateTooLarge { bytes: text.len() }.into());
        }
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::compile(&text, base_dir).map_err(Into::into)
    }

    /// Compile a template from an in-memory string (§6 `parse_string`).
    /// `gen.file` includes resolve against the process's current directory.
    pub fn parse_string(template: &str) -> io::Result<Tree> {
        if template.len() > parser::MAX_TEMPLATE_BYTES {
            return Err(error::Error::TemplateTooLarge { bytes: template.len() }.into());
        }
        Self::compile(template, PathBuf::new()).map_err(Into::into)
    }

    fn compile(text: &str, base_dir: PathBuf) -> error::Result<Tree> {
        let mut parser = Parser::new(text, 0, base_dir);
        let root = parser.parse_tree()?;
        let mut vars = Variables::new();
        for spec in &parser.pending_sources {
            if let Err(e) = vars.apply_spec(spec) {
                log::warn!("gen.variable source={spec:?} failed to load: {e}");
            }
        }
        root.init_variables(&mut vars);
        Ok(Tree { root, vars })
    }

    /// Apply a `set_variables` spec (§6): `none`, `{k=v,...}`, or a
    /// properties file path. May be called before or after parsing; later
    /// calls override earlier values.
    pub fn set_variables(&mut self, spec: &str) -> io::Result<()> {
        self.vars.apply_spec(spec).map_err(Into::into)
    }

    /// Stream generated output to `sink`, rooted at `context` (§6
    /// `generate`). Returns the exact number of bytes written.
    pub fn generate(&mut self, context: i64, sink: &mut dyn Sink) -> io::Result<usize> {
        self.root.generate(context, &mut self.vars, sink).map_err(Into::into)
    }

    /// Convenience wrapper returning the generated output as a `String`
    /// (§6 `generate_to_string`).
    pub fn generate_to_string(&mut self, context: i64) -> io::Result<String> {
        let mut sink = StringSink::new();
        self.generate(context, &mut sink)?;
        Ok(sink.into_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_only() {
        let mut tree = Tree::parse_string("Hello, World!").unwrap();
        assert_eq!(tree.generate_to_string(0).unwrap(), "Hello, World!");
    }

    #[test]
    fn serial_value_increments_across_calls() {
        let mut tree = Tree::parse_string("<?gen.value order=serial max=3 format=#0 ?>").unwrap();
        assert_eq!(tree.generate_to_string(0).unwrap(), "0");
        assert_eq!(tree.generate_to_string(0).unwrap(), "1");
        assert_eq!(tree.generate_to_string(0).unwrap(), "2");
    }

    #[test]
    fn context_and_block_sequence() {
        let mut tree = Tree::parse_string(
            "<?gen.begin count=3 context=combined ?>[<?gen.value order=context ?>]<?gen.end ?>",
        )
        .unwrap();
        assert_eq!(tree.generate_to_string(2).unwrap(), "[6][7][8]");
    }

    #[test]
    fn variable_default_then_override() {
        let mut tree = Tree::parse_string("<?gen.variable name=X default=alpha ?>").unwrap();
        assert_eq!(tree.generate_to_string(0).unwrap(), "alpha");
        tree.set_variables("{x=beta}").unwrap();
        assert_eq!(tree.generate_to_string(0).unwrap(), "beta");
    }

    #[test]
    fn words_inline_source_serial_cycle() {
        let mut tree =
            Tree::parse_string("<?gen.words count=2 order=serial source={a,b,c} ?>").unwrap();
        assert_eq!(tree.generate_to_string(0).unwrap(), "a b");
        assert_eq!(tree.generate_to_string(0).unwrap(), "c a");
    }

    #[test]
    fn date_ymd_at_context() {
        let mut tree =
            Tree::parse_string("<?gen.date order=context type=ymd start=1/1/2000 ?>").unwrap();
        assert_eq!(tree.generate_to_string(10).unwrap(), "20000111");
    }

    #[test]
    fn save_then_read_round_trips() {
        let mut tree =
            Tree::parse_string("<?gen.value save=X format=#0 ?> <?gen.variable name=X ?>").unwrap();
        let out = tree.generate_to_string(0).unwrap();
        let mut parts = out.split(' ');
        let first = parts.next().unwrap();
        let second = parts.next().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn range_shorthand_matches_explicit_bounds() {
        let mut via_range =
            Tree::parse_string("<?gen.value order=serial range=1to20by2 format=#0 ?>").unwrap();
        let mut via_explicit =
            Tree::parse_string("<?gen.value order=serial min=1 max=20 factor=2 format=#0 ?>").unwrap();
        for _ in 0..5 {
            assert_eq!(
                via_range.generate_to_string(0).unwrap(),
                via_explicit.generate_to_string(0).unwrap()
            );
        }
    }

    #[test]
    fn unknown_segment_kind_is_a_parse_error() {
        let err = Tree::parse_string("<?gen.bogus ?>").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn mismatched_block_name_is_a_parse_error() {
        let err = Tree::parse_string("<?gen.begin name=a ?>x<?gen.end name=b ?>").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn comment_produces_no_output() {
        let mut tree = Tree::parse_string("before<?gen.comment this is ignored ?>after").unwrap();
        assert_eq!(tree.generate_to_string(0).unwrap(), "beforeafter");
    }
}
