//! CoNLL-U dependency parses for the FactBank pipeline.
//!
//! Reads parser output (UDPipe, Stanza, spaCy exports, ...) and exposes each
//! sentence through [`factbank_core::parse::DependencyParse`]. Pure
//! synchronous; no I/O. The caller reads the file.
//!
//! # Quick start
//!
//! ```no_run
//! use factbank_conllu::ParseBank;
//!
//! let conllu = "# text = It rained.\n\
//!               1\tIt\tit\tPRON\t_\t_\t2\tnsubj\t_\t_\n\
//!               2\trained\train\tVERB\t_\t_\t0\troot\t_\tSpaceAfter=No\n\
//!               3\t.\t.\tPUNCT\t_\t_\t2\tpunct\t_\t_\n";
//! let bank = ParseBank::from_conllu(conllu).unwrap();
//! assert!(bank.get("It rained.").is_some());
//! ```

mod bank;
pub mod error;
mod parse;
mod sentence;

pub use bank::ParseBank;
pub use error::{Error, Result};
pub use sentence::{ParsedSentence, Token};

/// Parse every sentence of a CoNLL-U document, in document order.
pub fn parse_many(input: &str) -> Result<Vec<ParsedSentence>> {
  parse::split_blocks(input).iter().map(parse::parse_block).collect()
}

#[cfg(test)]
mod tests {
  use factbank_core::{
    corpus::SentenceKey,
    model::Span,
    parse::{DependencyParse, ParseProvider, derive_head_span},
  };

  use super::*;

  const DOC: &str = "\
# sent_id = wsj_0001.tml:1
# text = John said Mary left.
1\tJohn\tJohn\tPROPN\t_\t_\t2\tnsubj\t_\t_
2\tsaid\tsay\tVERB\t_\t_\t0\troot\t_\t_
3\tMary\tMary\tPROPN\t_\t_\t4\tnsubj\t_\t_
4\tleft\tleave\tVERB\t_\t_\t2\tccomp\t_\tSpaceAfter=No
5\t.\t.\tPUNCT\t_\t_\t2\tpunct\t_\t_

# sent_id = wsj_0001.tml:2
# text = It rained.
1\tIt\tit\tPRON\t_\t_\t2\tnsubj\t_\t_
2\trained\train\tVERB\t_\t_\t0\troot\t_\tSpaceAfter=No
3\t.\t.\tPUNCT\t_\t_\t2\tpunct\t_\t_
";

  #[test]
  fn document_parses_in_order() {
    let sentences = parse_many(DOC).unwrap();
    assert_eq!(sentences.len(), 2);
    assert_eq!(sentences[0].sent_id(), Some("wsj_0001.tml:1"));
    assert_eq!(sentences[1].text(), "It rained.");
    assert_eq!(sentences[1].tokens()[2].span, Span::new(9, 10));
  }

  #[test]
  fn dependency_view() {
    let sentences = parse_many(DOC).unwrap();
    let s = &sentences[0];
    assert_eq!(s.token_at(Span::new(15, 19)), Some(3));
    assert_eq!(s.token_at(Span::new(15, 18)), None);
    assert_eq!(s.token_at(Span::new(10, 19)), Some(2));
    assert_eq!(s.head_of(3), 1);
    assert_eq!(s.head_of(1), 1);
    let deps: Vec<&str> = s.children_of(1).iter().map(|d| d.dep).collect();
    assert_eq!(deps, ["nsubj", "ccomp", "punct"]);
  }

  #[test]
  fn bank_serves_head_spans() {
    let bank = ParseBank::from_conllu(DOC).unwrap();
    assert_eq!(bank.len(), 2);
    let key = SentenceKey::new("wsj_0001.tml", 1);
    let parse = bank.parse(&key, "John said Mary left.").unwrap().unwrap();
    let phrase = derive_head_span(parse, "John said Mary left.", Span::new(15, 19)).unwrap();
    assert_eq!(phrase.text, "John said Mary left");

    assert!(bank.parse(&key, "Unknown sentence.").unwrap().is_none());
  }

  #[test]
  fn first_duplicate_wins() {
    let doc = format!("{DOC}\n# text = It rained.\n1\tIt\t_\t_\t_\t_\t0\troot\t_\t_\n");
    let bank = ParseBank::from_conllu(&doc).unwrap();
    assert_eq!(bank.len(), 2);
    assert_eq!(bank.get("It rained.").unwrap().tokens().len(), 3);
  }
}
