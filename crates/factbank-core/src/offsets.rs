//! Recovery of sentence-relative offsets from FactBank's file offsets.
//!
//! The annotated offsets are file-relative and frequently drift by a few
//! characters from the sentence text they point into. A head that occurs
//! exactly once in its sentence is taken at face value; otherwise the search
//! fans out symmetrically from the approximate position until the head text
//! is found or both sides run off the sentence.

use std::collections::BTreeMap;

use tracing::warn;

use crate::{
  Error, Result,
  corpus::{RawOffsets, SentenceKey},
  model::{ErrorRecord, Span},
  text::{char_slice, find_unique},
};

/// Heads that name a non-lexicalised source and never get a text anchor.
pub const UNANCHORED_HEADS: [&str; 3] = ["AUTHOR", "GEN", "DUMMY"];

/// Outcome of [`OffsetResolver::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
  /// No textual anchor (AUTHOR and friends, or no offsets at all). Counts as
  /// success and becomes a `-1/-1` mention.
  Unanchored,
  Found(Span),
  /// Nothing matched; carries the best guess, which may lie outside the
  /// sentence. Already filed in the diagnostics log.
  NotFound { start: i64, end: i64 },
}

impl Resolution {
  pub fn is_success(&self) -> bool { !matches!(self, Self::NotFound { .. }) }

  pub fn span(&self) -> Option<Span> {
    match self {
      Self::Found(span) => Some(*span),
      _ => None,
    }
  }
}

/// One offset lookup and the context needed to report its failure.
#[derive(Debug, Clone, Copy)]
pub struct Lookup<'a> {
  pub key:         &'a SentenceKey,
  /// Normalised sentence text.
  pub sentence:    &'a str,
  pub head:        Option<&'a str>,
  pub approx:      RawOffsets,
  /// File offset of the sentence start.
  pub base_offset: Option<i64>,
  /// Free-text provenance for the diagnostics (the source descriptor).
  pub provenance:  &'a str,
}

/// Resolves offsets and keeps the diagnostics trail of every failure.
#[derive(Debug, Default)]
pub struct OffsetResolver {
  errors:      BTreeMap<SentenceKey, Vec<ErrorRecord>>,
  error_count: usize,
}

impl OffsetResolver {
  pub fn new() -> Self { Self::default() }

  /// Recover the sentence-relative span of `lookup.head`.
  ///
  /// Only fails when the search path is needed and the sentence has no file
  /// offset base; an unrecoverable head is reported as
  /// [`Resolution::NotFound`] instead.
  pub fn resolve(&mut self, lookup: Lookup<'_>) -> Result<Resolution> {
    let head = match lookup.head {
      Some(head) if !UNANCHORED_HEADS.contains(&head) => head,
      _ => return Ok(Resolution::Unanchored),
    };
    let head_len = head.chars().count() as i64;
    let approx_start = match (lookup.approx.start, lookup.approx.end) {
      (None, None) => return Ok(Resolution::Unanchored),
      (Some(start), _) => start,
      (None, Some(end)) => end - head_len,
    };

    if let Some(span) = find_unique(lookup.sentence, head) {
      return Ok(Resolution::Found(span));
    }

    let base = lookup.base_offset.ok_or_else(|| Error::MissingBaseOffset {
      file:     lookup.key.file.clone(),
      sentence: lookup.key.sentence,
    })?;
    let start = approx_start - base;

    if let Some(span) = expanding_search(lookup.sentence, head, start) {
      return Ok(Resolution::Found(span));
    }

    let end = start + head_len;
    self.record_failure(&lookup, head, start, end);
    Ok(Resolution::NotFound { start, end })
  }

  fn record_failure(&mut self, lookup: &Lookup<'_>, head: &str, start: i64, end: i64) {
    let sentence = lookup.sentence;
    let len = sentence.chars().count() as i64;
    let lo = start.clamp(0, len) as usize;
    let hi = end.clamp(0, len) as usize;

    let predicted_head = char_slice(sentence, lo, hi);
    let result_sentence = format!(
      "{}* {head} *{}",
      char_slice(sentence, 0, lo),
      char_slice(sentence, hi.max(lo), len as usize),
    );

    warn!(
      file = %lookup.key.file,
      sentence = lookup.key.sentence,
      head,
      predicted = %predicted_head,
      "could not recover offsets"
    );

    self.error_count += 1;
    self.errors.entry(lookup.key.clone()).or_default().push(ErrorRecord {
      file: lookup.key.file.clone(),
      file_sentence_id: lookup.key.sentence,
      offset_start: start,
      offset_end: end,
      predicted_head,
      head: head.to_owned(),
      raw_sentence: sentence.to_owned(),
      result_sentence,
      rel_source_text: lookup.provenance.to_owned(),
    });
  }

  /// Total failures so far.
  pub fn error_count(&self) -> usize { self.error_count }

  /// Failures filed under one sentence, in the order they happened.
  pub fn errors_for(&self, key: &SentenceKey) -> &[ErrorRecord] {
    self.errors.get(key).map(Vec::as_slice).unwrap_or_default()
  }

  /// All failures, grouped by sentence in processing order.
  pub fn into_errors(self) -> Vec<ErrorRecord> {
    self.errors.into_values().flatten().collect()
  }
}

/// Fan out from `start`: at each step test the left boundary, then the right
/// one (`start + 1 + step`), until either matches or both leave the text.
///
/// Positions where the head cannot fit are skipped up front, so a start far
/// outside the sentence costs no more than one pass over it.
fn expanding_search(sentence: &str, head: &str, start: i64) -> Option<Span> {
  let text: Vec<char> = sentence.chars().collect();
  let needle: Vec<char> = head.chars().collect();
  let last = text.len() as i64 - needle.len() as i64;
  if last < 0 {
    return None;
  }

  let matches_at = |at: i64| -> Option<Span> {
    let at = at as usize;
    (text[at..at + needle.len()] == needle[..]).then(|| Span::new(at, at + needle.len()))
  };

  let mut left = start.clamp(-1, last);
  let mut right = start.saturating_add(1).clamp(0, last + 1);
  loop {
    if left < 0 && right > last {
      return None;
    }
    if left >= 0
      && let Some(span) = matches_at(left)
    {
      return Some(span);
    }
    if right <= last
      && let Some(span) = matches_at(right)
    {
      return Some(span);
    }
    left -= 1;
    right += 1;
  }
}
