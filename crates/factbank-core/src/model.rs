//! Record types of the master schema.
//!
//! Four append-only collections (sentences, mentions, sources, attitudes)
//! plus the diagnostics trail of offsets that could not be recovered. Every
//! record is immutable once built, except [`Attitude`]'s label which may move
//! from `Uu` to `ROB` exactly once.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ─── Surrogate ids ───────────────────────────────────────────────────────────

macro_rules! surrogate_id {
  ($(#[$doc:meta])* $name:ident) => {
    $(#[$doc])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
      Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(pub u32);

    impl $name {
      pub fn get(self) -> u32 { self.0 }
    }

    impl From<u32> for $name {
      fn from(raw: u32) -> Self { Self(raw) }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
      }
    }
  };
}

surrogate_id!(
  /// Dense id of a [`Sentence`], starting at 1.
  SentenceId
);
surrogate_id!(
  /// Dense id of a [`Mention`], starting at 1.
  MentionId
);
surrogate_id!(
  /// Dense id of a [`Source`], starting at 1.
  SourceId
);
surrogate_id!(
  /// Dense id of an [`Attitude`], starting at 1.
  AttitudeId
);

// ─── Spans ───────────────────────────────────────────────────────────────────

/// A half-open, sentence-relative character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
  pub start: usize,
  pub end:   usize,
}

impl Span {
  pub fn new(start: usize, end: usize) -> Self { Self { start, end } }

  pub fn len(&self) -> usize { self.end.saturating_sub(self.start) }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

// ─── Sentence ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
  pub sentence_id:      SentenceId,
  /// Origin file, unquoted (e.g. `wsj_0026.tml`).
  pub file:             String,
  pub file_sentence_id: i64,
  /// De-escaped, quote-normalised text; all offsets index into this.
  pub text:             String,
}

// ─── Mention ─────────────────────────────────────────────────────────────────

/// The syntactic phrase around a mention's head token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
  pub span: Span,
  pub text: String,
}

/// A deduplicated (sentence, text, offsets) occurrence.
///
/// `span` is `None` for non-lexicalised sources such as the implicit AUTHOR;
/// those are persisted with the `-1/-1` sentinel and never carry a phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
  pub mention_id:  MentionId,
  pub sentence_id: SentenceId,
  pub text:        String,
  pub span:        Option<Span>,
  pub phrase:      Option<Phrase>,
}

impl Mention {
  /// Token offsets in their persisted form, `(-1, -1)` when unanchored.
  pub fn token_offsets(&self) -> (i64, i64) {
    match self.span {
      Some(span) => (span.start as i64, span.end as i64),
      None => (-1, -1),
    }
  }
}

// ─── Source ──────────────────────────────────────────────────────────────────

/// Where a source hangs in its sentence's nesting tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentSource {
  /// Level-0 source (AUTHOR); persisted as `-1`.
  Root,
  Source(SourceId),
}

impl ParentSource {
  pub fn as_raw(self) -> i64 {
    match self {
      Self::Root => -1,
      Self::Source(id) => i64::from(id.get()),
    }
  }

  pub fn from_raw(raw: i64) -> Option<Self> {
    match raw {
      -1 => Some(Self::Root),
      id => u32::try_from(id).ok().filter(|id| *id > 0).map(|id| Self::Source(SourceId(id))),
    }
  }

  pub fn source(self) -> Option<SourceId> {
    match self {
      Self::Root => None,
      Self::Source(id) => Some(id),
    }
  }
}

impl Serialize for ParentSource {
  fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_i64(self.as_raw())
  }
}

impl<'de> Deserialize<'de> for ParentSource {
  fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    let raw = i64::deserialize(d)?;
    Self::from_raw(raw).ok_or_else(|| {
      serde::de::Error::custom(format!("invalid parent source id {raw}"))
    })
  }
}

/// An entity to whom belief attitudes are attributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
  pub source_id:     SourceId,
  pub sentence_id:   SentenceId,
  /// The mention naming this source.
  pub mention_id:    MentionId,
  pub parent:        ParentSource,
  /// `parent`'s level + 1; 0 for roots.
  pub nesting_level: u8,
  pub source_text:   String,
  /// Sentence-local id (`s0`, `s1`, ...). Only needed while the tree is
  /// built; never persisted.
  #[serde(skip)]
  pub local_id:      String,
}

// ─── Belief labels ───────────────────────────────────────────────────────────

/// A FactBank factuality value, plus `ROB` (reported belief).
///
/// `Uu` is the only label that can still change; every other value is
/// terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BeliefLabel {
  CertainPositive,
  CertainNegative,
  CertainUnderspecified,
  ProbablePositive,
  ProbableNegative,
  PossiblePositive,
  PossibleNegative,
  /// Underspecified commitment.
  Uu,
  /// Reported belief; only ever produced by promoting `Uu`.
  ReportedBelief,
  Unknown,
  /// Any label outside the alphabet above, kept verbatim.
  Other(String),
}

impl BeliefLabel {
  pub fn as_str(&self) -> &str {
    match self {
      Self::CertainPositive => "CT+",
      Self::CertainNegative => "CT-",
      Self::CertainUnderspecified => "CTu",
      Self::ProbablePositive => "PR+",
      Self::ProbableNegative => "PR-",
      Self::PossiblePositive => "PS+",
      Self::PossibleNegative => "PS-",
      Self::Uu => "Uu",
      Self::ReportedBelief => "ROB",
      Self::Unknown => "Unk",
      Self::Other(raw) => raw,
    }
  }

  /// Anything but `Uu` counts as a definite commitment for propagation.
  pub fn is_definite(&self) -> bool { !matches!(self, Self::Uu) }
}

impl From<&str> for BeliefLabel {
  fn from(s: &str) -> Self {
    match s {
      "CT+" => Self::CertainPositive,
      "CT-" => Self::CertainNegative,
      "CTu" => Self::CertainUnderspecified,
      "PR+" => Self::ProbablePositive,
      "PR-" => Self::ProbableNegative,
      "PS+" => Self::PossiblePositive,
      "PS-" => Self::PossibleNegative,
      "Uu" => Self::Uu,
      "ROB" => Self::ReportedBelief,
      "Unk" => Self::Unknown,
      other => Self::Other(other.to_owned()),
    }
  }
}

impl FromStr for BeliefLabel {
  type Err = std::convert::Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(Self::from(s)) }
}

impl fmt::Display for BeliefLabel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl Serialize for BeliefLabel {
  fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for BeliefLabel {
  fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(d)?;
    Ok(Self::from(raw.as_str()))
  }
}

/// The `label_type` column; FactBank only annotates belief.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
pub enum LabelType {
  #[default]
  Belief,
}

impl LabelType {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Belief => "Belief",
    }
  }
}

// ─── Attitude ────────────────────────────────────────────────────────────────

/// A labelled belief relation from a source toward a target mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attitude {
  pub attitude_id:       AttitudeId,
  pub source_id:         SourceId,
  pub target_mention_id: MentionId,
  label:                 BeliefLabel,
  pub label_type:        LabelType,
}

impl Attitude {
  pub fn new(
    attitude_id: AttitudeId,
    source_id: SourceId,
    target_mention_id: MentionId,
    label: BeliefLabel,
  ) -> Self {
    Self {
      attitude_id,
      source_id,
      target_mention_id,
      label,
      label_type: LabelType::Belief,
    }
  }

  pub fn label(&self) -> &BeliefLabel { &self.label }

  /// Rewrite `Uu` to `ROB`. Returns whether the label changed; a no-op for
  /// every other label, which makes repeated promotion idempotent.
  pub fn promote_to_reported_belief(&mut self) -> bool {
    if self.label == BeliefLabel::Uu {
      self.label = BeliefLabel::ReportedBelief;
      true
    } else {
      false
    }
  }
}

// ─── Diagnostics ─────────────────────────────────────────────────────────────

/// One unrecovered offset, as written to the `errors` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
  pub file:             String,
  pub file_sentence_id: i64,
  /// Best guess at the last attempted offsets; may fall outside the text.
  pub offset_start:     i64,
  pub offset_end:       i64,
  pub predicted_head:   String,
  pub head:             String,
  pub raw_sentence:     String,
  /// The sentence with the failed region replaced by `* head *`.
  pub result_sentence:  String,
  /// The source descriptor the lookup was made for.
  pub rel_source_text:  String,
}

// ─── Output bundle ───────────────────────────────────────────────────────────

/// Everything one run produces, in id order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MasterRecords {
  pub sentences: Vec<Sentence>,
  pub mentions:  Vec<Mention>,
  pub sources:   Vec<Source>,
  pub attitudes: Vec<Attitude>,
  pub errors:    Vec<ErrorRecord>,
}
