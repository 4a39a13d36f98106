//! Source nesting trees.
//!
//! FactBank flattens each sentence's tree of sources into underscore-joined
//! chains: local id `s2_s1_s0` with descriptor `Mary_John_AUTHOR` is Mary
//! (`s2`), reported by John (`s1`), reported by the author (`s0`). Each
//! chain is parsed once into a [`SourceDescriptor`]; built sources are
//! indexed by `(level, local id)` in a per-sentence [`SourceTree`].

use std::collections::{HashMap, HashSet};

use crate::{
  corpus::DeclaredSource,
  model::{ParentSource, SourceId},
};

pub const AUTHOR: &str = "AUTHOR";
pub const AUTHOR_LOCAL_ID: &str = "s0";

/// Deepest level FactBank annotates (AUTHOR is 0).
pub const DEFAULT_MAX_NESTING_LEVEL: u8 = 3;

/// A declared source, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
  /// Number of underscores in the descriptor, ignoring any `=` suffix.
  pub level:           usize,
  /// First segment of the local id (`s2` for `s2_s1_s0`).
  pub local_id:        String,
  /// Segment right after the first underscore (`s1` for `s2_s1_s0`).
  pub parent_local_id: Option<String>,
  /// The source's own text (`Mary` for `Mary_John_AUTHOR`).
  pub head:            String,
}

impl SourceDescriptor {
  pub fn parse(local_id: &str, descriptor: &str) -> Self {
    let descriptor = before(descriptor, '=');
    if descriptor == AUTHOR {
      return Self {
        level:           0,
        local_id:        AUTHOR_LOCAL_ID.to_owned(),
        parent_local_id: None,
        head:            AUTHOR.to_owned(),
      };
    }

    let level = descriptor.matches('_').count();
    Self {
      level,
      local_id: before(before(local_id, '='), '_').to_owned(),
      parent_local_id: if level == 0 { None } else { parent_local_id(local_id) },
      head: before(descriptor, '_').to_owned(),
    }
  }

  pub fn from_declared(declared: &DeclaredSource) -> Self {
    Self::parse(&declared.local_id, &declared.descriptor)
  }
}

/// `s1` for `s2_s1_s0`; `None` when the id has no underscore.
pub fn parent_local_id(local_id: &str) -> Option<String> {
  let (_, rest) = local_id.split_once('_')?;
  Some(before(before(rest, '_'), '=').to_owned())
}

fn before(s: &str, sep: char) -> &str {
  s.split_once(sep).map_or(s, |(head, _)| head)
}

/// A declared source next to its parsed descriptor.
pub type PlannedSource<'a> = (SourceDescriptor, &'a DeclaredSource);

/// Orders a sentence's declared sources for building: level by level, input
/// order within a level. Sources deeper than `max_level` come back
/// separately.
pub fn plan_levels(
  declared: &[DeclaredSource],
  max_level: u8,
) -> (Vec<PlannedSource<'_>>, Vec<PlannedSource<'_>>) {
  let (mut planned, truncated): (Vec<_>, Vec<_>) = declared
    .iter()
    .map(|d| (SourceDescriptor::from_declared(d), d))
    .partition(|(desc, _)| desc.level <= usize::from(max_level));
  planned.sort_by_key(|(desc, _)| desc.level);
  (planned, truncated)
}

/// The sources built so far for one sentence, plus the declared ones that
/// were dropped on the way.
#[derive(Debug, Default)]
pub struct SourceTree {
  nodes:   HashMap<(usize, String), SourceId>,
  dropped: HashSet<(usize, String)>,
}

impl SourceTree {
  pub fn new() -> Self { Self::default() }

  /// Register a built source. If two sources share a level and local id the
  /// first one stays the parent candidate.
  pub fn insert(&mut self, descriptor: &SourceDescriptor, id: SourceId) {
    self
      .nodes
      .entry((descriptor.level, descriptor.local_id.clone()))
      .or_insert(id);
  }

  /// Remember that `descriptor` was declared but not built.
  pub fn mark_dropped(&mut self, descriptor: &SourceDescriptor) {
    self.dropped.insert((descriptor.level, descriptor.local_id.clone()));
  }

  /// Whether `descriptor` lacks a parent only because that parent was
  /// dropped. A built source with the same level and id takes precedence.
  pub fn parent_dropped(&self, descriptor: &SourceDescriptor) -> bool {
    if descriptor.level == 0 || self.parent_of(descriptor).is_some() {
      return false;
    }
    descriptor.parent_local_id.as_ref().is_some_and(|parent| {
      self.dropped.contains(&(descriptor.level - 1, parent.clone()))
    })
  }

  /// Where `descriptor` attaches: the root for level 0, otherwise the
  /// source one level up whose local id is the descriptor's parent id.
  /// `None` means the tree has no such parent.
  pub fn parent_of(&self, descriptor: &SourceDescriptor) -> Option<ParentSource> {
    if descriptor.level == 0 {
      return Some(ParentSource::Root);
    }
    let parent = descriptor.parent_local_id.clone()?;
    self
      .nodes
      .get(&(descriptor.level - 1, parent))
      .copied()
      .map(ParentSource::Source)
  }
}
