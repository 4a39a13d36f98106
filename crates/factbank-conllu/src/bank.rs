//! [`ParseBank`]: parsed sentences looked up by their text.

use std::{collections::HashMap, convert::Infallible};

use factbank_core::{corpus::SentenceKey, parse::ParseProvider};
use tracing::debug;

use crate::{Result, parse::{parse_block, split_blocks}, sentence::ParsedSentence};

/// Every sentence of a CoNLL-U document, keyed by sentence text.
///
/// The pipeline asks for parses by normalised sentence text, so the
/// `# text` comments must match that text exactly.
#[derive(Debug, Default)]
pub struct ParseBank {
  by_text: HashMap<String, ParsedSentence>,
}

impl ParseBank {
  /// Parse a whole document. The first sentence with a given text wins.
  pub fn from_conllu(input: &str) -> Result<Self> {
    let mut by_text = HashMap::new();
    for block in split_blocks(input) {
      let sentence = parse_block(&block)?;
      if by_text.contains_key(sentence.text()) {
        debug!(text = sentence.text(), "duplicate sentence text; keeping the first parse");
        continue;
      }
      by_text.insert(sentence.text().to_owned(), sentence);
    }
    Ok(Self { by_text })
  }

  pub fn get(&self, text: &str) -> Option<&ParsedSentence> { self.by_text.get(text) }

  pub fn len(&self) -> usize { self.by_text.len() }

  pub fn is_empty(&self) -> bool { self.by_text.is_empty() }
}

impl ParseProvider for ParseBank {
  type Parse<'a> = &'a ParsedSentence;
  type Error = Infallible;

  fn parse<'a>(
    &'a self,
    _key: &SentenceKey,
    text: &str,
  ) -> Result<Option<Self::Parse<'a>>, Self::Error> {
    Ok(self.get(text))
  }
}
