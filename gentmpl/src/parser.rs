//! The template parser (§4.1): turns template text into a tree rooted at an
//! implicit `count=1 context=combined` Block.

use crate::cond::Cond;
use crate::error::{Error, Result};
use crate::params::ParamMap;
use crate::segment::{Block, Common, ContextRule, DateSeg, DateType, FileSeg, Literal, Segment, Value, VariableSeg, Words};
use std::fs;
use std::path::{Path, PathBuf};

/// The ~100MB ceiling from §6 ("Fails if the template exceeds ~100 MB").
pub const MAX_TEMPLATE_BYTES: usize = 100_000_000;

/// File-include recursion cap (§4.2 "File", §5 "Recursion bound").
const MAX_INCLUDE_DEPTH: usize = 25;

enum Event<'a> {
    Eof,
    Literal(&'a str),
    Pi { kind: &'a str, args: &'a str, offset: usize },
}

pub struct Parser<'a> {
    text: &'a str,
    pos: usize,
    base_seed: u64,
    next_id: u64,
    include_depth: usize,
    base_dir: PathBuf,
    /// `gen.variable source=` specs, in encounter order, collected for the
    /// caller to apply once the tree is fully compiled (§4.2 "Variable"
    /// bulk-load mode: "consumed at init time and removed from the tree").
    pub pending_sources: Vec<String>,
}

impl<'a> Parser<'a> {
    pub fn new(text: &'a str, base_seed: u64, base_dir: PathBuf) -> Self {
        Parser {
            text,
            pos: 0,
            base_seed,
            next_id: 0,
            include_depth: 0,
            base_dir,
            pending_sources: Vec::new(),
        }
    }

    fn with_state(text: &'a str, base_seed: u64, next_id: u64, include_depth: usize, base_dir: PathBuf) -> Self {
        Parser {
            text,
            pos: 0,
            base_seed,
            next_id,
            include_depth,
            base_dir,
            pending_sources: Vec::new(),
        }
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Parse the whole template into the implicit root Block.
    pub fn parse_tree(&mut self) -> Result<Segment> {
        let children = self.parse_block_body(false, None)?;
        let params = ParamMap::parse("count=1 context=combined")
            .expect("literal argument string is always well-formed");
        let id = self.alloc_id();
        let common = Common::decode(id, self.base_seed, &params);
        Ok(Segment::Block(Block::new(common, children, ContextRule::Combined, None, None)))
    }

    /// Skip "non-space whitespace" (newlines, tabs, carriage returns)
    /// immediately following a `gen.begin`/`gen.end` marker (§4.1 "Block
    /// nesting").
    fn skip_layout_whitespace(&mut self) {
        let bytes = self.text.as_bytes();
        while self.pos < bytes.len() && matches!(bytes[self.pos], b'\n' | b'\t' | b'\r') {
            self.pos += 1;
        }
    }

    fn next_event(&mut self) -> Result<Event<'a>> {
        if self.pos >= self.text.len() {
            return Ok(Event::Eof);
        }
        match self.text[self.pos..].find("<?") {
            None => {
                let literal = &self.text[self.pos..];
                self.pos = self.text.len();
                Ok(Event::Literal(literal))
            }
            Some(0) => {
                let start = self.pos;
                let body_start = start + 2;
                let Some(rel_end) = self.text[body_start..].find("?>") else {
                    return Err(Error::Parse {
                        offset: start,
                        message: "unterminated processing instruction: missing '?>'".to_string(),
                    });
                };
                let body = self.text[body_start..body_start + rel_end].trim();
                self.pos = body_start + rel_end + 2;
                let Some(rest) = body.strip_prefix("gen.") else {
                    return Err(Error::Parse {
                        offset: start,
                        message: format!("processing instruction {body:?} does not start with 'gen.'"),
                    });
                };
                let (kind, args) = match rest.split_once(char::is_whitespace) {
                    Some((k, a)) => (k, a.trim_start()),
                    None => (rest, ""),
                };
                Ok(Event::Pi { kind, args, offset: start })
            }
            Some(rel) => {
                let literal = &self.text[self.pos..self.pos + rel];
                self.pos += rel;
                Ok(Event::Literal(literal))
            }
        }
    }

    /// Parse segments until EOF (`inside_block == false`) or a matching
    /// `gen.end` (`inside_block == true`).
    fn parse_block_body(&mut self, inside_block: bool, begin_name: Option<&str>) -> Result<Vec<Segment>> {
        let mut out = Vec::new();
        loop {
            match self.next_event()? {
                Event::Eof => {
                    if inside_block {
                        return Err(Error::Parse {
                            offset: self.pos,
                            message: "missing gen.end for gen.begin".to_string(),
                        });
                    }
                    return Ok(out);
                }
                Event::Literal(text) => {
                    if !text.is_empty() {
                        out.push(Segment::Literal(Literal { bytes: text.as_bytes().to_vec() }));
                    }
                }
                Event::Pi { kind, args, offset } => match kind {
                    "end" => {
                        if !inside_block {
                            return Err(Error::Parse {
                                offset,
                                message: "gen.end with no matching gen.begin".to_string(),
                            });
                        }
                        let params = ParamMap::parse(args).map_err(|message| Error::Parse { offset, message })?;
                        if let Some(end_name) = params.get("name") {
                            if begin_name != Some(end_name) {
                                return Err(Error::Parse {
                                    offset,
                                    message: format!(
                                        "gen.end name={end_name:?} does not match gen.begin name={begin_name:?}"
                                    ),
                                });
                            }
                        }
                        self.skip_layout_whitespace();
                        return Ok(out);
                    }
                    "begin" => {
                        let params = ParamMap::parse(args).map_err(|message| Error::Parse { offset, message })?;
                        let id = self.alloc_id();
                        let mut common = Common::decode(id, self.base_seed, &params);
                        if let Some(save) = common.save.take() {
                            log::warn!("gen.begin does not support save={save:?}, ignoring");
                        }
                        let context_rule = params.get("context").and_then(ContextRule::parse).unwrap_or_default();
                        let ratio = params.get("ratio").and_then(|s| s.parse::<f64>().ok());
                        let condition = params.get("while").map(Cond::parse);
                        let begin_name = params.get("name").map(str::to_string);
                        self.skip_layout_whitespace();
                        let children = self.parse_block_body(true, begin_name.as_deref())?;
                        out.push(Segment::Block(Block::new(common, children, context_rule, ratio, condition)));
                    }
                    "value" => out.push(self.build_value(args, offset)?),
                    "words" => out.push(self.build_words(args, offset)?),
                    "date" => out.push(self.build_date(args, offset)?),
                    "variable" => {
                        if let Some(seg) = self.build_variable(args, offset)? {
                            out.push(seg);
                        }
                    }
                    "file" => out.push(self.build_file(args, offset)?),
                    "comment" => {}
                    other => {
                        return Err(Error::Parse {
                            offset,
                            message: format!("unrecognized segment kind 'gen.{other}'"),
                        });
                    }
                },
            }
        }
    }

    fn build_value(&mut self, args: &str, offset: usize) -> Result<Segment> {
        let params = ParamMap::parse(args).map_err(|message| Error::Parse { offset, message })?;
        let id = self.alloc_id();
        let common = Common::decode(id, self.base_seed, &params);
        let format = params.string("format", "#0");
        let ratio = params.get("ratio").and_then(|s| s.parse::<f64>().ok());
        Ok(Segment::Value(Value { common, format, ratio }))
    }

    fn build_words(&mut self, args: &str, offset: usize) -> Result<Segment> {
        let params = ParamMap::parse(args).map_err(|message| Error::Parse { offset, message })?;
        let id = self.alloc_id();
        let common = Common::decode(id, self.base_seed, &params);
        let source = params.string("source", "");
        Ok(Segment::Words(Words::new(common, source)))
    }

    fn build_date(&mut self, args: &str, offset: usize) -> Result<Segment> {
        let params = ParamMap::parse(args).map_err(|message| Error::Parse { offset, message })?;
        let id = self.alloc_id();
        let common = Common::decode(id, self.base_seed, &params);
        let date_type = match params.get("type") {
            Some(t) => DateType::parse(t).unwrap_or_else(|| {
                log::warn!("date type={t:?} is not recognized, defaulting to ymd");
                DateType::Ymd
            }),
            None => DateType::Ymd,
        };
        let start_spec = params.string("start", "1/1/2000");
        Ok(Segment::Date(DateSeg::new(common, date_type, start_spec)))
    }

    fn build_variable(&mut self, args: &str, offset: usize) -> Result<Option<Segment>> {
        let params = ParamMap::parse(args).map_err(|message| Error::Parse { offset, message })?;
        if let Some(source) = params.get("source") {
            self.pending_sources.push(source.to_string());
            return Ok(None);
        }
        let name = params.string("name", "");
        let default = params.string("default", "");
        let increment = params.get("increment").and_then(|s| s.parse::<i64>().ok());
        Ok(Some(Segment::Variable(VariableSeg::new(name, default, increment))))
    }

    fn build_file(&mut self, args: &str, offset: usize) -> Result<Segment> {
        let params = ParamMap::parse(args).map_err(|message| Error::Parse { offset, message })?;
        let path = params.string("path", "");
        if self.include_depth >= MAX_INCLUDE_DEPTH {
            return Err(Error::IncludeDepthExceeded { depth: self.include_depth + 1 });
        }
        let resolved = self.base_dir.join(&path);
        let contents = fs::read_to_string(&resolved)?;
        if contents.len() > MAX_TEMPLATE_BYTES {
            return Err(Error::TemplateTooLarge { bytes: contents.len() });
        }
        let sub_base_dir = resolved
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.base_dir.clone());
        let mut sub = Parser::with_state(&contents, self.base_seed, self.next_id, self.include_depth + 1, sub_base_dir);
        let root = sub.parse_tree()?;
        self.next_id = sub.next_id;
        self.pending_sources.extend(sub.pending_sources);
        Ok(Segment::File(FileSeg { path, root: Box::new(root) }))
    }
}
