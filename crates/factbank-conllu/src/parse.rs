//! CoNLL-U block and word-line parser.
//!
//! Pipeline:
//!   raw &str
//!     └─ split_blocks()      → Vec<Block>   (blank-line separated)
//!          └─ parse_block()  → ParsedSentence
//!               ├─ comment lines   → text / sent_id
//!               ├─ parse_word_line → WordLine (multi-word and empty nodes skipped)
//!               └─ align_spans     → character spans per token

use factbank_core::model::Span;

use crate::{
  error::{Error, Result},
  sentence::{ParsedSentence, Token},
};

const COLUMNS: usize = 10;

// ─── Block splitting ─────────────────────────────────────────────────────────

/// Consecutive non-blank lines, tagged with the 1-based number of each line.
pub(crate) struct Block<'a> {
  lines: Vec<(usize, &'a str)>,
}

pub(crate) fn split_blocks(input: &str) -> Vec<Block<'_>> {
  let mut blocks = Vec::new();
  let mut current = Vec::new();
  for (i, raw) in input.split('\n').enumerate() {
    let line = raw.strip_suffix('\r').unwrap_or(raw);
    if line.trim().is_empty() {
      if !current.is_empty() {
        blocks.push(Block { lines: std::mem::take(&mut current) });
      }
    } else {
      current.push((i + 1, line));
    }
  }
  if !current.is_empty() {
    blocks.push(Block { lines: current });
  }
  blocks
}

// ─── Word lines ──────────────────────────────────────────────────────────────

struct WordLine {
  line:        usize,
  id:          usize,
  form:        String,
  head:        usize,
  deprel:      String,
  token_range: Option<Span>,
  space_after: bool,
}

/// `None` for multi-word token ranges (`3-4`) and empty nodes (`5.1`).
fn parse_word_line(line: usize, raw: &str) -> Result<Option<WordLine>> {
  let cols: Vec<&str> = raw.split('\t').collect();
  if cols.len() != COLUMNS {
    return Err(Error::ColumnCount { line, found: cols.len() });
  }
  if cols[0].contains('-') || cols[0].contains('.') {
    return Ok(None);
  }

  let number = |column: &'static str, value: &str| {
    value.parse::<usize>().map_err(|_| Error::InvalidField {
      line,
      column,
      value: value.to_owned(),
    })
  };

  let misc = cols[9];
  let token_range = misc_value(misc, "TokenRange")
    .map(|range| {
      let bad = || Error::InvalidField {
        line,
        column: "MISC",
        value: range.to_owned(),
      };
      let (start, end) = range.split_once(':').ok_or_else(bad)?;
      let start = start.parse::<usize>().map_err(|_| bad())?;
      let end = end.parse::<usize>().map_err(|_| bad())?;
      if end < start {
        return Err(bad());
      }
      Ok(Span::new(start, end))
    })
    .transpose()?;

  Ok(Some(WordLine {
    line,
    id: number("ID", cols[0])?,
    form: cols[1].to_owned(),
    head: number("HEAD", cols[6])?,
    deprel: cols[7].to_owned(),
    token_range,
    space_after: misc_value(misc, "SpaceAfter") != Some("No"),
  }))
}

/// Value of `key=value` inside a `|`-separated MISC column.
fn misc_value<'a>(misc: &'a str, key: &str) -> Option<&'a str> {
  misc
    .split('|')
    .filter_map(|entry| entry.split_once('='))
    .find(|(k, _)| *k == key)
    .map(|(_, v)| v)
}

// ─── Blocks ──────────────────────────────────────────────────────────────────

pub(crate) fn parse_block(block: &Block<'_>) -> Result<ParsedSentence> {
  let first_line = block.lines.first().map_or(0, |(n, _)| *n);
  let mut text: Option<String> = None;
  let mut sent_id: Option<String> = None;
  let mut words: Vec<WordLine> = Vec::new();

  for &(line, raw) in &block.lines {
    if let Some(comment) = raw.strip_prefix('#') {
      if let Some((key, value)) = comment.split_once('=') {
        match key.trim() {
          // only the separator space goes; the text itself is kept verbatim
          "text" => text = Some(value.strip_prefix(' ').unwrap_or(value).to_owned()),
          "sent_id" => sent_id = Some(value.trim().to_owned()),
          _ => {}
        }
      }
      continue;
    }
    if let Some(word) = parse_word_line(line, raw)? {
      if word.id != words.len() + 1 {
        return Err(Error::TokenOrder { line, expected: words.len() + 1 });
      }
      words.push(word);
    }
  }

  if words.is_empty() {
    return Err(Error::EmptySentence { line: first_line });
  }
  if let Some(w) = words.iter().find(|w| w.head > words.len()) {
    return Err(Error::HeadOutOfRange {
      line: w.line,
      head: w.head,
      len:  words.len(),
    });
  }

  let text = text.unwrap_or_else(|| reconstruct_text(&words));
  let spans = align_spans(&text, &words)?;
  let tokens = words
    .into_iter()
    .zip(spans)
    .map(|(w, span)| Token {
      form: w.form,
      head: w.head,
      deprel: w.deprel,
      span,
    })
    .collect();

  Ok(ParsedSentence::new(sent_id, text, tokens))
}

/// Rebuild the sentence from its forms when no `# text` comment exists.
fn reconstruct_text(words: &[WordLine]) -> String {
  let mut text = String::new();
  for (i, w) in words.iter().enumerate() {
    text.push_str(&w.form);
    if w.space_after && i + 1 < words.len() {
      text.push(' ');
    }
  }
  text
}

/// Character spans: `TokenRange` when given, otherwise the next occurrence
/// of the form at or after the end of the previous token.
fn align_spans(text: &str, words: &[WordLine]) -> Result<Vec<Span>> {
  let chars: Vec<char> = text.chars().collect();
  let mut cursor = 0;
  let mut spans = Vec::with_capacity(words.len());

  for w in words {
    let span = match w.token_range {
      Some(span) if span.end <= chars.len() => span,
      Some(_) => {
        return Err(Error::Unaligned {
          line: w.line,
          form: w.form.clone(),
          text: text.to_owned(),
        });
      }
      None => {
        let form: Vec<char> = w.form.chars().collect();
        let start = (cursor..chars.len())
          .find(|&at| chars[at..].starts_with(&form))
          .ok_or_else(|| Error::Unaligned {
            line: w.line,
            form: w.form.clone(),
            text: text.to_owned(),
          })?;
        Span::new(start, start + form.len())
      }
    };
    cursor = span.end;
    spans.push(span);
  }
  Ok(spans)
}
