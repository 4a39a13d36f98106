//! Attitude storage and the `Uu` → `ROB` rewrite.
//!
//! FactBank marks a source that merely reports an event as `Uu`
//! (underspecified). When a source further down the same reporting chain is
//! definitely committed to that event, every `Uu` held by its ancestors
//! toward the same target becomes `ROB` (reported belief).

use std::collections::HashMap;

use tracing::info;

use crate::{
  model::{Attitude, AttitudeId, BeliefLabel, MentionId, ParentSource, Source, SourceId},
  sequence::Sequence,
};

/// All attitudes of a run, indexed by (source, target).
#[derive(Debug, Default)]
pub struct AttitudeSet {
  attitudes: Vec<Attitude>,
  by_pair:   HashMap<(SourceId, MentionId), Vec<usize>>,
  sequence:  Sequence<AttitudeId>,
}

impl AttitudeSet {
  pub fn new() -> Self { Self::default() }

  pub fn record(
    &mut self,
    source_id: SourceId,
    target: MentionId,
    label: BeliefLabel,
  ) -> AttitudeId {
    let id = self.sequence.next_id();
    self.by_pair.entry((source_id, target)).or_default().push(self.attitudes.len());
    self.attitudes.push(Attitude::new(id, source_id, target, label));
    id
  }

  /// Attitudes `source_id` holds toward `target`, in creation order.
  pub fn between(
    &self,
    source_id: SourceId,
    target: MentionId,
  ) -> impl Iterator<Item = &Attitude> + '_ {
    self
      .by_pair
      .get(&(source_id, target))
      .into_iter()
      .flatten()
      .map(|&i| &self.attitudes[i])
  }

  pub fn iter(&self) -> impl Iterator<Item = &Attitude> + '_ { self.attitudes.iter() }

  pub fn len(&self) -> usize { self.attitudes.len() }

  pub fn is_empty(&self) -> bool { self.attitudes.is_empty() }

  pub fn into_attitudes(self) -> Vec<Attitude> { self.attitudes }

  /// Promote ancestor `Uu` attitudes to `ROB`; returns how many changed.
  ///
  /// Every attitude with a definite label walks its source's parent chain to
  /// the root. At each ancestor, any `Uu` attitude toward the same target is
  /// promoted, and the walk carries on regardless. The result is a fixed
  /// point: running it again changes nothing.
  pub fn propagate_reported_belief(&mut self, sources: &[Source]) -> usize {
    let parents: HashMap<SourceId, ParentSource> =
      sources.iter().map(|s| (s.source_id, s.parent)).collect();

    let mut changes = 0;
    for i in 0..self.attitudes.len() {
      let bottom = &self.attitudes[i];
      if !bottom.label().is_definite() {
        continue;
      }
      let target = bottom.target_mention_id;

      let mut current = parents.get(&bottom.source_id).and_then(|p| p.source());
      // Levels strictly decrease up a chain; the bound only stops malformed
      // input from cycling.
      let mut steps = 0;
      while let Some(ancestor) = current
        && steps < parents.len()
      {
        if let Some(indices) = self.by_pair.get(&(ancestor, target)) {
          for &j in indices {
            if self.attitudes[j].promote_to_reported_belief() {
              changes += 1;
            }
          }
        }
        current = parents.get(&ancestor).and_then(|p| p.source());
        steps += 1;
      }
    }

    info!(changes, "Uu to ROB propagation complete");
    changes
  }
}
