//! Hand-built dependency parses for tests.

use std::{collections::HashMap, convert::Infallible};

use crate::{
  corpus::SentenceKey,
  model::Span,
  parse::{Dependent, DependencyParse, ParseProvider, TokenIndex},
};

#[derive(Debug, Clone)]
struct Token {
  span: Span,
  head: TokenIndex,
  dep:  String,
}

/// A parse built from `(form, 1-based head, dep)` triples; head `0` marks
/// the root. Forms are aligned against the text left to right.
#[derive(Debug, Clone)]
pub struct FixtureParse {
  tokens: Vec<Token>,
}

impl FixtureParse {
  pub fn new(text: &str, tokens: &[(&str, usize, &str)]) -> Self {
    let chars: Vec<char> = text.chars().collect();
    let mut cursor = 0;
    let tokens = tokens
      .iter()
      .enumerate()
      .map(|(i, (form, head, dep))| {
        let form: Vec<char> = form.chars().collect();
        let start = (cursor..chars.len())
          .find(|&at| chars[at..].starts_with(&form))
          .unwrap_or_else(|| panic!("token {form:?} not in {text:?}"));
        cursor = start + form.len();
        Token {
          span: Span::new(start, cursor),
          head: if *head == 0 { i } else { head - 1 },
          dep:  (*dep).to_owned(),
        }
      })
      .collect();
    Self { tokens }
  }
}

impl DependencyParse for FixtureParse {
  fn token_at(&self, span: Span) -> Option<TokenIndex> {
    let first = self.tokens.iter().position(|t| t.span.start == span.start)?;
    self.tokens[first..]
      .iter()
      .any(|t| t.span.end == span.end)
      .then_some(first)
  }

  fn token_span(&self, token: TokenIndex) -> Span { self.tokens[token].span }

  fn head_of(&self, token: TokenIndex) -> TokenIndex { self.tokens[token].head }

  fn children_of(&self, token: TokenIndex) -> Vec<Dependent<'_>> {
    self
      .tokens
      .iter()
      .enumerate()
      .filter(|(i, t)| t.head == token && *i != token)
      .map(|(i, t)| Dependent { token: i, dep: &t.dep, span: t.span })
      .collect()
  }
}

/// Parses keyed by sentence text.
#[derive(Debug, Default)]
pub struct FixtureBank {
  parses: HashMap<String, FixtureParse>,
}

impl FixtureBank {
  pub fn with(mut self, text: &str, tokens: &[(&str, usize, &str)]) -> Self {
    self.parses.insert(text.to_owned(), FixtureParse::new(text, tokens));
    self
  }
}

impl ParseProvider for FixtureBank {
  type Parse<'a> = &'a FixtureParse;
  type Error = Infallible;

  fn parse<'a>(
    &'a self,
    _key: &SentenceKey,
    text: &str,
  ) -> Result<Option<Self::Parse<'a>>, Self::Error> {
    Ok(self.parses.get(text))
  }
}
