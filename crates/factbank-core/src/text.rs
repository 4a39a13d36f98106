//! Text normalisation and character-offset helpers.
//!
//! FactBank offsets count characters, while Rust strings index bytes; every
//! helper here takes and returns character positions.

use crate::model::Span;

/// De-escape a raw FactBank sentence and normalise PTB-style quotes.
pub fn normalize_sentence(raw: &str) -> String {
  strip_escapes(raw).replace("``", "\"").replace("''", "\"")
}

/// Drop backslash escapes from a head or source text.
pub fn strip_escapes(raw: &str) -> String { raw.replace('\\', "") }

pub fn char_len(text: &str) -> usize { text.chars().count() }

/// Characters `start..end`, clamped to the text.
pub fn char_slice(text: &str, start: usize, end: usize) -> String {
  if end <= start {
    return String::new();
  }
  text.chars().skip(start).take(end - start).collect()
}

/// The span of `needle` if it occurs exactly once (non-overlapping) in
/// `haystack`.
pub fn find_unique(haystack: &str, needle: &str) -> Option<Span> {
  if needle.is_empty() {
    return None;
  }
  let mut hits = haystack.match_indices(needle);
  let (byte_start, _) = hits.next()?;
  if hits.next().is_some() {
    return None;
  }
  let start = char_len(&haystack[..byte_start]);
  Some(Span::new(start, start + char_len(needle)))
}
