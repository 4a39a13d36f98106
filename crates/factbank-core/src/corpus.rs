//! The extracted FactBank data the pipeline consumes.
//!
//! Values here are already unquoted by the extraction layer but not yet
//! normalised: sentence and head texts still carry their backslash escapes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// `(file, file-local sentence index)`. Orders the way sentences must be
/// processed.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SentenceKey {
  pub file:     String,
  pub sentence: i64,
}

impl SentenceKey {
  pub fn new(file: impl Into<String>, sentence: i64) -> Self {
    Self { file: file.into(), sentence }
  }
}

/// Raw file-relative offsets; either side may be missing in the source data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOffsets {
  pub start: Option<i64>,
  pub end:   Option<i64>,
}

impl RawOffsets {
  pub fn new(start: i64, end: i64) -> Self {
    Self { start: Some(start), end: Some(end) }
  }

  pub fn absent() -> Self { Self::default() }
}

/// One input row of the `sentences` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceRow {
  pub key:  SentenceKey,
  pub text: String,
}

/// A `(relSourceId, relSourceText)` pair, e.g. `("s2_s1_s0", "Mary_John_AUTHOR")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredSource {
  pub local_id:   String,
  pub descriptor: String,
  pub approx:     RawOffsets,
}

impl DeclaredSource {
  /// Stand-in for sentences that declare no source at all.
  pub fn implicit_author() -> Self {
    Self {
      local_id:   "-1".into(),
      descriptor: "AUTHOR".into(),
      approx:     RawOffsets::absent(),
    }
  }
}

/// A factuality value a source holds toward an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredAttitude {
  /// Event id; the key into [`SentenceAnnotations::targets`].
  pub event_id: String,
  pub label:    String,
}

/// Where an event's head token sits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRef {
  pub token_loc: i64,
  pub head:      String,
}

/// Everything annotated on one sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceAnnotations {
  /// File offset of the sentence's first token.
  pub base_offset:   Option<i64>,
  pub sources:       Vec<DeclaredSource>,
  /// Keyed by the full local source id (`s2_s1_s0`).
  pub attitudes:     HashMap<String, Vec<DeclaredAttitude>>,
  pub targets:       HashMap<String, TargetRef>,
  pub token_offsets: HashMap<i64, RawOffsets>,
}

/// A full extraction: sentences plus their annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
  pub sentences:   Vec<SentenceRow>,
  pub annotations: HashMap<SentenceKey, SentenceAnnotations>,
}

impl Corpus {
  /// Annotation bundle for `key`, created on first use.
  pub fn annotations_mut(&mut self, key: &SentenceKey) -> &mut SentenceAnnotations {
    self.annotations.entry(key.clone()).or_default()
  }

  /// Sentences in processing order: by file, then file-local index. Input
  /// order breaks ties.
  pub fn ordered_sentences(&self) -> Vec<&SentenceRow> {
    let mut rows: Vec<&SentenceRow> = self.sentences.iter().collect();
    rows.sort_by(|a, b| a.key.cmp(&b.key));
    rows
  }
}
