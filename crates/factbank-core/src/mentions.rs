//! Deduplicated mention records.

use std::collections::HashMap;

use tracing::warn;

use crate::{
  model::{Mention, MentionId, Sentence, SentenceId, Span},
  parse::{DependencyParse, derive_head_span},
  sequence::Sequence,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MentionKey {
  sentence_id: SentenceId,
  text:        String,
  span:        Option<Span>,
}

/// Hands out one [`Mention`] per distinct (sentence, text, offsets).
#[derive(Debug, Default)]
pub struct MentionCatalog {
  ids:      HashMap<MentionKey, MentionId>,
  mentions: Vec<Mention>,
  sequence: Sequence<MentionId>,
}

impl MentionCatalog {
  pub fn new() -> Self { Self::default() }

  /// Id of the mention of `text` at `span` in `sentence`, creating it on
  /// first sight. Anchored mentions get their phrase from `parse`; a repeat
  /// lookup has no side effects.
  pub fn catalog<P>(
    &mut self,
    sentence: &Sentence,
    parse: &P,
    text: &str,
    span: Option<Span>,
  ) -> MentionId
  where
    P: DependencyParse + ?Sized,
  {
    let key = MentionKey {
      sentence_id: sentence.sentence_id,
      text: text.to_owned(),
      span,
    };
    if let Some(id) = self.ids.get(&key) {
      return *id;
    }

    let mention_id = self.sequence.next_id();
    let phrase = span.and_then(|span| {
      let phrase = derive_head_span(parse, &sentence.text, span);
      if phrase.is_none() {
        warn!(
          file = %sentence.file,
          sentence = sentence.file_sentence_id,
          text,
          start = span.start,
          end = span.end,
          "no parse token at mention offsets; storing it without a phrase"
        );
      }
      phrase
    });

    self.mentions.push(Mention {
      mention_id,
      sentence_id: sentence.sentence_id,
      text: text.to_owned(),
      span,
      phrase,
    });
    self.ids.insert(key, mention_id);
    mention_id
  }

  pub fn len(&self) -> usize { self.mentions.len() }

  pub fn is_empty(&self) -> bool { self.mentions.is_empty() }

  pub fn get(&self, id: MentionId) -> Option<&Mention> {
    self.mentions.get((id.get() as usize).checked_sub(1)?)
  }

  pub fn into_mentions(self) -> Vec<Mention> { self.mentions }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{fixture::FixtureParse, model::Phrase};

  fn sentence(id: u32) -> Sentence {
    Sentence {
      sentence_id:      SentenceId(id),
      file:             "wsj_0002.tml".into(),
      file_sentence_id: 1,
      text:             "John said Mary left.".into(),
    }
  }

  fn parse() -> FixtureParse {
    FixtureParse::new("John said Mary left.", &[
      ("John", 2, "nsubj"),
      ("said", 0, "ROOT"),
      ("Mary", 4, "nsubj"),
      ("left", 2, "ccomp"),
      (".", 2, "punct"),
    ])
  }

  #[test]
  fn repeated_lookup_returns_the_same_id() {
    let mut catalog = MentionCatalog::new();
    let (s, p) = (sentence(1), parse());
    let a = catalog.catalog(&s, &p, "left", Some(Span::new(15, 19)));
    let b = catalog.catalog(&s, &p, "left", Some(Span::new(15, 19)));
    assert_eq!(a, b);
    assert_eq!(a, MentionId(1));
    assert_eq!(catalog.len(), 1);
  }

  #[test]
  fn any_key_difference_makes_a_new_mention() {
    let mut catalog = MentionCatalog::new();
    let p = parse();
    let a = catalog.catalog(&sentence(1), &p, "left", Some(Span::new(15, 19)));
    let b = catalog.catalog(&sentence(2), &p, "left", Some(Span::new(15, 19)));
    let c = catalog.catalog(&sentence(1), &p, "said", Some(Span::new(5, 9)));
    assert_eq!((a, b, c), (MentionId(1), MentionId(2), MentionId(3)));
  }

  #[test]
  fn anchored_mentions_carry_a_phrase() {
    let mut catalog = MentionCatalog::new();
    let (s, p) = (sentence(1), parse());
    let id = catalog.catalog(&s, &p, "left", Some(Span::new(15, 19)));
    let mention = catalog.get(id).unwrap();
    assert_eq!(mention.token_offsets(), (15, 19));
    assert_eq!(
      mention.phrase,
      Some(Phrase { span: Span::new(0, 19), text: "John said Mary left".into() })
    );
  }

  #[test]
  fn unanchored_mentions_have_no_phrase() {
    let mut catalog = MentionCatalog::new();
    let (s, p) = (sentence(1), parse());
    let id = catalog.catalog(&s, &p, "AUTHOR", None);
    let mention = catalog.get(id).unwrap();
    assert_eq!(mention.token_offsets(), (-1, -1));
    assert!(mention.phrase.is_none());
  }
}
