//! The process-wide word-list cache (§3 "Word-list cache", §4.2 Words).
//!
//! Named `text` after the teacher's own `tpchgen::text::TextPool`, which
//! plays the analogous role for TPC-H's comment-field text generation: a
//! lazily-populated, process-wide pool of words keyed by source. Populated
//! once per distinct source spec and never evicted (§5).

use crate::rng::Uniform;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

const LIST_SIZE: usize = 1000;
const WORD_SIZE: usize = 7;
const LOWERCASE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// A resolved, ordered word list: a source specification always resolves to
/// the same `WordList` for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct WordList {
    words: Vec<Vec<u8>>,
}

impl WordList {
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn word(&self, index: usize) -> &[u8] {
        if self.words.is_empty() {
            return &[];
        }
        &self.words[index % self.words.len()]
    }
}

fn cache() -> &'static Mutex<HashMap<String, WordList>> {
    static CACHE: OnceLock<Mutex<HashMap<String, WordList>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Resolve `source` to a [`WordList`], populating the global cache on first
/// use. `source` is one of: an inline `{w1,w2,...}` list, an existing file
/// path (tokenized), or anything else, which synthesizes a random word list
/// (§4.2 "Words").
pub fn resolve(source: &str, base_seed: u64) -> WordList {
    if let Some(cached) = cache().lock().unwrap().get(source) {
        return cached.clone();
    }
    let list = build(source, base_seed);
    cache()
        .lock()
        .unwrap()
        .entry(source.to_string())
        .or_insert(list)
        .clone()
}

fn build(source: &str, base_seed: u64) -> WordList {
    if let Some(inner) = source.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        let words = inner
            .split(',')
            .map(|w| w.trim().as_bytes().to_vec())
            .filter(|w| !w.is_empty())
            .collect();
        return WordList { words };
    }
    if Path::new(source).is_file() {
        match fs::read(source) {
            Ok(bytes) => return WordList { words: tokenize(&bytes) },
            Err(e) => {
                log::warn!("word list file {source:?} could not be read ({e}); synthesizing a random list instead");
            }
        }
    } else {
        log::warn!("word list source {source:?} is neither an inline list nor an existing file; synthesizing a random list");
    }
    WordList {
        words: synthesize(base_seed, source),
    }
}

/// A C/C++-style tokenizer: `#` and `//` start a line comment, `/* ... */` is
/// a block comment, newlines and form-feeds are whitespace separators,
/// anything else contributes to the current token.
fn tokenize(bytes: &[u8]) -> Vec<Vec<u8>> {
    let mut words = Vec::new();
    let mut current = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'#' => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                    i += 1;
                }
                i += 2;
            }
            b'\n' | b'\x0c' | b' ' | b'\t' | b'\r' => {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                i += 1;
            }
            _ => {
                current.push(b);
                i += 1;
            }
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Synthesize `LIST_SIZE` random lowercase ASCII words of length
/// `[1, 2*WORD_SIZE-1]` (average length `WORD_SIZE`), seeded so the same
/// source spec always synthesizes the same fallback list.
fn synthesize(base_seed: u64, source: &str) -> Vec<Vec<u8>> {
    let mut rng = Uniform::for_name(base_seed, Some(source));
    (0..LIST_SIZE)
        .map(|_| {
            let len = 1 + rng.next_i64((2 * WORD_SIZE - 1) as i64) as usize;
            (0..len)
                .map(|_| LOWERCASE_ALPHABET[rng.next_i64(LOWERCASE_ALPHABET.len() as i64) as usize])
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_list_parses() {
        let list = resolve("{a,b,c}", 1);
        assert_eq!(list.len(), 3);
        assert_eq!(list.word(0), b"a");
        assert_eq!(list.word(2), b"c");
    }

    #[test]
    fn synthesized_list_has_default_size() {
        let list = resolve("__unit_test_nonexistent_source__", 1);
        assert_eq!(list.len(), LIST_SIZE);
    }

    #[test]
    fn tokenizer_strips_comments() {
        let words = tokenize(b"alpha # a comment\nbeta // another\n/* block\ncomment */gamma");
        assert_eq!(
            words,
            vec![b"alpha".to_vec(), b"beta".to_vec(), b"gamma".to_vec()]
        );
    }

    #[test]
    fn cache_is_memoized() {
        let a = resolve("{x,y}", 1);
        let b = resolve("{x,y}", 99); // different seed, should still hit cache
        assert_eq!(a.len(), b.len());
    }
}
