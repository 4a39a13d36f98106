//! The dependency-parse capability and the head-span derivation built on it.
//!
//! The pipeline never talks to a parser directly. It asks a
//! [`ParseProvider`] for one [`DependencyParse`] per sentence and only uses
//! span lookup, head-of and children-of on it.

use crate::{
  corpus::SentenceKey,
  model::{Phrase, Span},
  text::char_slice,
};

/// Dependency label that never extends a phrase to the right.
pub const PUNCT_DEP: &str = "punct";

/// Index of a token within its sentence's parse.
pub type TokenIndex = usize;

/// A syntactic child of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependent<'a> {
  pub token: TokenIndex,
  pub dep:   &'a str,
  pub span:  Span,
}

/// Read access to one sentence's dependency parse. All spans are character
/// offsets into the normalised sentence text.
pub trait DependencyParse {
  /// The first token of the token run covering exactly `span`: `span.start`
  /// must open a token and `span.end` must close one.
  fn token_at(&self, span: Span) -> Option<TokenIndex>;

  fn token_span(&self, token: TokenIndex) -> Span;

  /// The syntactic head; a root is its own head.
  fn head_of(&self, token: TokenIndex) -> TokenIndex;

  /// Direct dependents in sentence order.
  fn children_of(&self, token: TokenIndex) -> Vec<Dependent<'_>>;
}

impl<T: DependencyParse + ?Sized> DependencyParse for &T {
  fn token_at(&self, span: Span) -> Option<TokenIndex> { (**self).token_at(span) }

  fn token_span(&self, token: TokenIndex) -> Span { (**self).token_span(token) }

  fn head_of(&self, token: TokenIndex) -> TokenIndex { (**self).head_of(token) }

  fn children_of(&self, token: TokenIndex) -> Vec<Dependent<'_>> {
    (**self).children_of(token)
  }
}

/// Hands out one parse per sentence.
pub trait ParseProvider {
  type Parse<'a>: DependencyParse
  where
    Self: 'a;
  type Error: std::error::Error + Send + Sync + 'static;

  /// The parse of `text`, or `None` if the provider has none for it.
  fn parse<'a>(
    &'a self,
    key: &SentenceKey,
    text: &str,
  ) -> Result<Option<Self::Parse<'a>>, Self::Error>;
}

/// Derive the phrase around the head token at `head`.
///
/// The token is looked up at `head`, then at `head` widened by one character
/// (annotations often stop one short of a word boundary). A dependent token
/// is swapped for its governor, one hop only. The phrase runs from the
/// leftmost child to the end of the rightmost non-punctuation child; a token
/// with no such children spans only itself.
///
/// Returns `None` when no token lines up with `head`.
pub fn derive_head_span<P>(parse: &P, sentence: &str, head: Span) -> Option<Phrase>
where
  P: DependencyParse + ?Sized,
{
  let token = parse
    .token_at(head)
    .or_else(|| parse.token_at(Span::new(head.start, head.end + 1)))?;
  let token = parse.head_of(token);

  let children = parse.children_of(token);
  let rightmost = children
    .iter()
    .filter(|child| child.dep != PUNCT_DEP)
    .max_by_key(|child| child.span.start);

  let span = match (children.iter().map(|c| c.span.start).min(), rightmost) {
    (Some(start), Some(last)) => Span::new(start, last.span.end),
    _ => parse.token_span(token),
  };

  Some(Phrase { span, text: char_slice(sentence, span.start, span.end) })
}
