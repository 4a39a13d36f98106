//! A parsed sentence and its dependency-parse view.

use factbank_core::{
  model::Span,
  parse::{Dependent, DependencyParse, TokenIndex},
};

/// One word line of a CoNLL-U sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub form:   String,
  /// 1-based head id; `0` for the root.
  pub head:   usize,
  pub deprel: String,
  /// Character span within the sentence text.
  pub span:   Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSentence {
  sent_id: Option<String>,
  text:    String,
  tokens:  Vec<Token>,
}

impl ParsedSentence {
  pub(crate) fn new(sent_id: Option<String>, text: String, tokens: Vec<Token>) -> Self {
    Self { sent_id, text, tokens }
  }

  pub fn sent_id(&self) -> Option<&str> { self.sent_id.as_deref() }

  pub fn text(&self) -> &str { &self.text }

  pub fn tokens(&self) -> &[Token] { &self.tokens }
}

impl DependencyParse for ParsedSentence {
  fn token_at(&self, span: Span) -> Option<TokenIndex> {
    let first = self.tokens.iter().position(|t| t.span.start == span.start)?;
    self.tokens[first..]
      .iter()
      .any(|t| t.span.end == span.end)
      .then_some(first)
  }

  fn token_span(&self, token: TokenIndex) -> Span { self.tokens[token].span }

  fn head_of(&self, token: TokenIndex) -> TokenIndex {
    match self.tokens[token].head {
      0 => token,
      head => head - 1,
    }
  }

  fn children_of(&self, token: TokenIndex) -> Vec<Dependent<'_>> {
    self
      .tokens
      .iter()
      .enumerate()
      .filter(|(_, t)| t.head == token + 1)
      .map(|(i, t)| Dependent { token: i, dep: &t.deprel, span: t.span })
      .collect()
  }
}
