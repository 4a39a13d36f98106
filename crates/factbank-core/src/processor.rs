//! The sentence pipeline.
//!
//! Sentences are processed one at a time, by file then file-local index, so
//! that surrogate ids come out identical on every run. Per sentence, the
//! declared sources are built level by level (offsets resolved, naming
//! mention catalogued, parent attached) and each source's attitudes are
//! attached as it is built. One global `Uu` → `ROB` pass runs at the end.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::{
  Error, Result,
  corpus::{Corpus, DeclaredSource, SentenceAnnotations, SentenceRow},
  mentions::MentionCatalog,
  model::{BeliefLabel, MasterRecords, Sentence, SentenceId, Source, SourceId},
  offsets::{Lookup, OffsetResolver},
  parse::{DependencyParse, ParseProvider},
  propagate::AttitudeSet,
  sequence::Sequence,
  sources::{DEFAULT_MAX_NESTING_LEVEL, SourceDescriptor, SourceTree, plan_levels},
  text::{normalize_sentence, strip_escapes},
};

// ─── Configuration ───────────────────────────────────────────────────────────

/// What to do with a source whose parent was never declared. Children of a
/// declared parent that was dropped are always dropped with it.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
  /// Abort the run.
  #[default]
  Fail,
  /// Drop the source (and its attitudes), log it at error level.
  Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
  /// Deepest nesting level built; deeper sources are dropped with a warning.
  pub max_nesting_level:    u8,
  pub orphan_policy:        OrphanPolicy,
  /// Skip file-local sentence 0, FactBank's document header line.
  pub skip_header_sentence: bool,
}

impl Default for ProcessorConfig {
  fn default() -> Self {
    Self {
      max_nesting_level:    DEFAULT_MAX_NESTING_LEVEL,
      orphan_policy:        OrphanPolicy::Fail,
      skip_header_sentence: true,
    }
  }
}

// ─── Report ──────────────────────────────────────────────────────────────────

/// Counters for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
  pub started_at:        DateTime<Utc>,
  pub finished_at:       DateTime<Utc>,
  pub sentences:         usize,
  pub mentions:          usize,
  pub sources:           usize,
  pub attitudes:         usize,
  /// Offsets that could not be recovered; one `errors` row each.
  pub offset_errors:     usize,
  pub dropped_sources:   usize,
  pub dropped_attitudes: usize,
  /// Attitudes whose target event or token offsets were never declared.
  pub missing_targets:   usize,
  pub truncated_sources: usize,
  pub orphan_sources:    usize,
  /// `Uu` labels rewritten to `ROB`.
  pub promotions:        usize,
}

/// The records of a run and its report.
#[derive(Debug, Clone)]
pub struct Outcome {
  pub records: MasterRecords,
  pub report:  RunReport,
}

// ─── Processor ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Counters {
  dropped_sources:   usize,
  dropped_attitudes: usize,
  missing_targets:   usize,
  truncated_sources: usize,
  orphan_sources:    usize,
}

/// Turns a [`Corpus`] into [`MasterRecords`]. Single use: [`Self::run`]
/// consumes it.
pub struct SentenceProcessor<'p, P: ParseProvider> {
  config:       ProcessorConfig,
  parses:       &'p P,
  sentences:    Vec<Sentence>,
  sentence_ids: Sequence<SentenceId>,
  mentions:     MentionCatalog,
  sources:      Vec<Source>,
  source_ids:   Sequence<SourceId>,
  attitudes:    AttitudeSet,
  resolver:     OffsetResolver,
  counters:     Counters,
}

/// Per-sentence context threaded through source building.
struct SentenceScope<'s, D> {
  row:         &'s SentenceRow,
  sentence:    &'s Sentence,
  parse:       &'s D,
  annotations: &'s SentenceAnnotations,
}

impl<'p, P: ParseProvider> SentenceProcessor<'p, P> {
  pub fn new(parses: &'p P, config: ProcessorConfig) -> Self {
    Self {
      config,
      parses,
      sentences: Vec::new(),
      sentence_ids: Sequence::new(),
      mentions: MentionCatalog::new(),
      sources: Vec::new(),
      source_ids: Sequence::new(),
      attitudes: AttitudeSet::new(),
      resolver: OffsetResolver::new(),
      counters: Counters::default(),
    }
  }

  /// Process every sentence of `corpus`, then propagate `Uu` → `ROB`.
  ///
  /// Fails on structural defects only: an orphan source under
  /// [`OrphanPolicy::Fail`], a sentence without a parse, or a search that
  /// needs a missing file offset base.
  pub fn run(mut self, corpus: &Corpus) -> Result<Outcome> {
    let started_at = Utc::now();
    let empty = SentenceAnnotations::default();

    for row in corpus.ordered_sentences() {
      if self.config.skip_header_sentence && row.key.sentence == 0 {
        continue;
      }
      let annotations = corpus.annotations.get(&row.key).unwrap_or(&empty);
      self.process_sentence(row, annotations)?;
    }
    info!(sentences = self.sentences.len(), "sentence processing complete");

    let promotions = self.attitudes.propagate_reported_belief(&self.sources);

    let records = MasterRecords {
      sentences: self.sentences,
      mentions:  self.mentions.into_mentions(),
      sources:   self.sources,
      attitudes: self.attitudes.into_attitudes(),
      errors:    self.resolver.into_errors(),
    };
    let c = self.counters;
    let report = RunReport {
      started_at,
      finished_at: Utc::now(),
      sentences: records.sentences.len(),
      mentions: records.mentions.len(),
      sources: records.sources.len(),
      attitudes: records.attitudes.len(),
      offset_errors: records.errors.len(),
      dropped_sources: c.dropped_sources,
      dropped_attitudes: c.dropped_attitudes,
      missing_targets: c.missing_targets,
      truncated_sources: c.truncated_sources,
      orphan_sources: c.orphan_sources,
      promotions,
    };
    Ok(Outcome { records, report })
  }

  fn process_sentence(
    &mut self,
    row: &SentenceRow,
    annotations: &SentenceAnnotations,
  ) -> Result<()> {
    let sentence = Sentence {
      sentence_id:      self.sentence_ids.next_id(),
      file:             row.key.file.clone(),
      file_sentence_id: row.key.sentence,
      text:             normalize_sentence(&row.text),
    };

    let parses = self.parses;
    let parse = parses
      .parse(&row.key, &sentence.text)
      .map_err(|e| Error::Parse(Box::new(e)))?
      .ok_or_else(|| Error::MissingParse(sentence.text.clone()))?;

    let implicit;
    let declared: &[DeclaredSource] = if annotations.sources.is_empty() {
      implicit = [DeclaredSource::implicit_author()];
      &implicit
    } else {
      &annotations.sources
    };

    let (planned, truncated) = plan_levels(declared, self.config.max_nesting_level);
    let mut tree = SourceTree::new();
    for (descriptor, source) in &truncated {
      tree.mark_dropped(descriptor);
      warn!(
        file = %row.key.file,
        sentence = row.key.sentence,
        local_id = %source.local_id,
        level = descriptor.level,
        max = self.config.max_nesting_level,
        "source nested too deep; dropped"
      );
    }
    self.counters.truncated_sources += truncated.len();

    let scope = SentenceScope {
      row,
      sentence: &sentence,
      parse: &parse,
      annotations,
    };
    for (descriptor, source) in &planned {
      self.build_source(&scope, &mut tree, descriptor, source)?;
    }

    debug!(
      file = %row.key.file,
      sentence = row.key.sentence,
      id = %sentence.sentence_id,
      "sentence processed"
    );
    self.sentences.push(sentence);
    Ok(())
  }

  fn build_source<D: DependencyParse>(
    &mut self,
    scope: &SentenceScope<'_, D>,
    tree: &mut SourceTree,
    descriptor: &SourceDescriptor,
    declared: &DeclaredSource,
  ) -> Result<()> {
    let key = &scope.row.key;
    if tree.parent_dropped(descriptor) {
      warn!(
        file = %key.file,
        sentence = key.sentence,
        local_id = %declared.local_id,
        parent = ?descriptor.parent_local_id,
        "parent source was dropped; dropping its dependents"
      );
      tree.mark_dropped(descriptor);
      self.counters.dropped_sources += 1;
      return Ok(());
    }

    let head = strip_escapes(&descriptor.head);
    let resolution = self.resolver.resolve(Lookup {
      key,
      sentence: &scope.sentence.text,
      head: Some(&head),
      approx: declared.approx,
      base_offset: scope.annotations.base_offset,
      provenance: &declared.descriptor,
    })?;
    if !resolution.is_success() {
      tree.mark_dropped(descriptor);
      self.counters.dropped_sources += 1;
      return Ok(());
    }

    let Some(parent) = tree.parent_of(descriptor) else {
      let defect = Error::OrphanSource {
        file:     key.file.clone(),
        sentence: key.sentence,
        local_id: declared.local_id.clone(),
        parent:   descriptor.parent_local_id.clone(),
        level:    descriptor.level as u8,
      };
      return match self.config.orphan_policy {
        OrphanPolicy::Fail => Err(defect),
        OrphanPolicy::Skip => {
          error!(%defect, "dropping orphan source");
          tree.mark_dropped(descriptor);
          self.counters.orphan_sources += 1;
          Ok(())
        }
      };
    };

    let mention_id =
      self
        .mentions
        .catalog(scope.sentence, scope.parse, &head, resolution.span());
    let source_id = self.source_ids.next_id();
    self.sources.push(Source {
      source_id,
      sentence_id: scope.sentence.sentence_id,
      mention_id,
      parent,
      nesting_level: descriptor.level as u8,
      source_text: head,
      local_id: descriptor.local_id.clone(),
    });
    tree.insert(descriptor, source_id);

    self.attach_attitudes(scope, declared, source_id)
  }

  fn attach_attitudes<D: DependencyParse>(
    &mut self,
    scope: &SentenceScope<'_, D>,
    declared: &DeclaredSource,
    source_id: SourceId,
  ) -> Result<()> {
    let key = &scope.row.key;
    let Some(attitudes) = scope.annotations.attitudes.get(&declared.local_id) else {
      debug!(file = %key.file, sentence = key.sentence, local_id = %declared.local_id,
        "source declares no attitudes");
      return Ok(());
    };

    for attitude in attitudes {
      let target = scope.annotations.targets.get(&attitude.event_id);
      let approx = target.and_then(|t| scope.annotations.token_offsets.get(&t.token_loc));
      let (Some(target), Some(approx)) = (target, approx) else {
        debug!(file = %key.file, sentence = key.sentence, event = %attitude.event_id,
          "attitude target not declared; skipped");
        self.counters.missing_targets += 1;
        continue;
      };

      let head = strip_escapes(&target.head);
      let resolution = self.resolver.resolve(Lookup {
        key,
        sentence: &scope.sentence.text,
        head: Some(&head),
        approx: *approx,
        base_offset: scope.annotations.base_offset,
        provenance: &declared.descriptor,
      })?;
      if !resolution.is_success() {
        self.counters.dropped_attitudes += 1;
        continue;
      }

      let target_id =
        self
          .mentions
          .catalog(scope.sentence, scope.parse, &head, resolution.span());
      self
        .attitudes
        .record(source_id, target_id, BeliefLabel::from(attitude.label.as_str()));
    }
    Ok(())
  }
}
