//! Integration tests for the SQLite backends against in-memory databases.

use factbank_conllu::ParseBank;
use factbank_core::{
  ProcessorConfig, SentenceProcessor,
  corpus::{RawOffsets, SentenceKey},
  model::{
    Attitude, AttitudeId, BeliefLabel, ErrorRecord, MasterRecords, Mention,
    MentionId, ParentSource, Phrase, Sentence, SentenceId, Source, SourceId,
    Span,
  },
  store::{CorpusSource, MasterSink},
};
use rusqlite::params;

use crate::{Error, SqliteCorpus, SqliteMaster};

/// The subset of the FactBank tables the extraction reads.
const FACTBANK_TABLES: &str = "
CREATE TABLE sentences    (file TEXT, sentId INTEGER, sent TEXT);
CREATE TABLE offsets      (file TEXT, sentId INTEGER, tokLoc INTEGER,
                           offsetInit INTEGER, offsetEnd INTEGER);
CREATE TABLE fb_relSource (file TEXT, sentId INTEGER, relSourceId TEXT,
                           relSourceText TEXT);
CREATE TABLE fb_source    (file TEXT, sentId INTEGER, sourceId TEXT,
                           sourceLoc INTEGER);
CREATE TABLE tokens_tml   (file TEXT, sentId INTEGER, tokLoc INTEGER,
                           tmlTagId TEXT);
CREATE TABLE fb_factValue (file TEXT, sentId INTEGER, relSourceId TEXT,
                           eId TEXT, eText TEXT, factValue TEXT);
";

const FILE: &str = "'wsj_0991.tml'";
const SAID_LEFT: &str = "John said Mary left.";

const CONLLU: &str = "\
# text = John said Mary left.
1\tJohn\t_\t_\t_\t_\t2\tnsubj\t_\t_
2\tsaid\t_\t_\t_\t_\t0\troot\t_\t_
3\tMary\t_\t_\t_\t_\t4\tnsubj\t_\t_
4\tleft\t_\t_\t_\t_\t2\tccomp\t_\tSpaceAfter=No
5\t.\t_\t_\t_\t_\t2\tpunct\t_\t_

";

/// Word offsets of `SAID_LEFT`, relative to a file base of 1000.
const WORDS: [(i64, i64); 5] =
  [(1000, 1004), (1005, 1009), (1010, 1014), (1015, 1019), (1019, 1020)];

async fn factbank() -> SqliteCorpus {
  let conn = tokio_rusqlite::Connection::open_in_memory()
    .await
    .expect("in-memory connection");
  conn
    .call(|conn| {
      conn.execute_batch(FACTBANK_TABLES)?;

      conn.execute(
        "INSERT INTO sentences VALUES (?1, 0, ?2)",
        params![FILE, "'Header line.''"],
      )?;
      conn.execute(
        "INSERT INTO sentences VALUES (?1, 1, ?2)",
        params![FILE, format!("'{SAID_LEFT}''")],
      )?;
      // duplicate row; the extraction reads distinct sentences
      conn.execute(
        "INSERT INTO sentences VALUES (?1, 1, ?2)",
        params![FILE, format!("'{SAID_LEFT}''")],
      )?;

      conn.execute(
        "INSERT INTO offsets VALUES (?1, 0, 0, 0, 6)",
        params![FILE],
      )?;
      for (loc, (start, end)) in WORDS.iter().enumerate() {
        conn.execute(
          "INSERT INTO offsets VALUES (?1, 1, ?2, ?3, ?4)",
          params![FILE, loc as i64, start, end],
        )?;
      }

      for (id, text) in [("'s0'", "'AUTHOR''"), ("'s1_s0'", "'John_AUTHOR''")] {
        conn.execute(
          "INSERT INTO fb_relSource VALUES (?1, 1, ?2, ?3)",
          params![FILE, id, text],
        )?;
      }
      conn.execute(
        "INSERT INTO fb_source VALUES (?1, 1, 's1', 0)",
        params![FILE],
      )?;

      for (event, loc) in [("e1", 1), ("e2", 3)] {
        conn.execute(
          "INSERT INTO tokens_tml VALUES (?1, 1, ?2, ?3)",
          params![FILE, loc, event],
        )?;
      }
      for (source, event, head, label) in [
        ("'s0'", "e1", "'said'", "'CT+''"),
        ("'s0'", "e2", "'left'", "'Uu''"),
        ("'s1_s0'", "e2", "'left'", "'CT+''"),
      ] {
        conn.execute(
          "INSERT INTO fb_factValue VALUES (?1, 1, ?2, ?3, ?4, ?5)",
          params![FILE, source, event, head, label],
        )?;
      }
      Ok(())
    })
    .await
    .expect("seed factbank tables");
  SqliteCorpus::from_connection(conn)
}

async fn master() -> SqliteMaster {
  SqliteMaster::open_in_memory()
    .await
    .expect("in-memory master")
}

async fn count(master: &SqliteMaster, table: &'static str) -> i64 {
  master
    .conn
    .call(move |conn| {
      Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| {
        r.get(0)
      })?)
    })
    .await
    .unwrap()
}

// ─── Corpus extraction ───────────────────────────────────────────────────────

#[tokio::test]
async fn sentences_are_unquoted_and_distinct() {
  let corpus = factbank().await.load_corpus().await.unwrap();

  let rows: Vec<(&str, i64, &str)> = corpus
    .ordered_sentences()
    .into_iter()
    .map(|r| (r.key.file.as_str(), r.key.sentence, r.text.as_str()))
    .collect();
  assert_eq!(rows, vec![
    ("wsj_0991.tml", 0, "Header line."),
    ("wsj_0991.tml", 1, SAID_LEFT),
  ]);
}

#[tokio::test]
async fn annotations_are_grouped_per_sentence() {
  let corpus = factbank().await.load_corpus().await.unwrap();
  let a = &corpus.annotations[&SentenceKey::new("wsj_0991.tml", 1)];

  assert_eq!(a.base_offset, Some(1000));

  let sources: Vec<(&str, &str)> = a
    .sources
    .iter()
    .map(|s| (s.local_id.as_str(), s.descriptor.as_str()))
    .collect();
  assert_eq!(sources, vec![("s0", "AUTHOR"), ("s1_s0", "John_AUTHOR")]);
  // the sentence-level source offsets are shared by every source
  assert!(a.sources.iter().all(|s| s.approx == RawOffsets::new(1000, 1004)));

  let target = &a.targets["e2"];
  assert_eq!(target.token_loc, 3);
  assert_eq!(target.head, "left");
  assert_eq!(a.token_offsets[&3], RawOffsets::new(1015, 1019));

  let author: Vec<(&str, &str)> = a.attitudes["s0"]
    .iter()
    .map(|d| (d.event_id.as_str(), d.label.as_str()))
    .collect();
  assert_eq!(author, vec![("e1", "CT+"), ("e2", "Uu")]);
  assert_eq!(a.attitudes["s1_s0"].len(), 1);
}

#[tokio::test]
async fn header_sentence_keeps_its_own_base() {
  let corpus = factbank().await.load_corpus().await.unwrap();
  let header = &corpus.annotations[&SentenceKey::new("wsj_0991.tml", 0)];
  assert_eq!(header.base_offset, Some(0));
  assert!(header.sources.is_empty());
}

#[tokio::test]
async fn truncated_quoting_is_rejected() {
  let corpus = factbank().await;
  corpus
    .conn
    .call(|conn| {
      conn.execute("INSERT INTO sentences VALUES ('x', 2, '''')", [])?;
      Ok(())
    })
    .await
    .unwrap();

  let err = corpus.load_corpus().await.unwrap_err();
  assert!(matches!(err, Error::MalformedField { table: "sentences", .. }));
}

// ─── Master writes ───────────────────────────────────────────────────────────

fn records() -> MasterRecords {
  let sentence_id = SentenceId(1);
  MasterRecords {
    sentences: vec![Sentence {
      sentence_id,
      file: "wsj_0991.tml".into(),
      file_sentence_id: 1,
      text: SAID_LEFT.into(),
    }],
    mentions:  vec![
      Mention {
        mention_id: MentionId(1),
        sentence_id,
        text: "AUTHOR".into(),
        span: None,
        phrase: None,
      },
      Mention {
        mention_id: MentionId(2),
        sentence_id,
        text: "left".into(),
        span: Some(Span::new(15, 19)),
        phrase: Some(Phrase {
          span: Span::new(0, 19),
          text: "John said Mary left".into(),
        }),
      },
    ],
    sources:   vec![Source {
      source_id: SourceId(1),
      sentence_id,
      mention_id: MentionId(1),
      parent: ParentSource::Root,
      nesting_level: 0,
      source_text: "AUTHOR".into(),
      local_id: "s0".into(),
    }],
    attitudes: vec![Attitude::new(
      AttitudeId(1),
      SourceId(1),
      MentionId(2),
      BeliefLabel::ReportedBelief,
    )],
    errors:    vec![ErrorRecord {
      file:             "wsj_0991.tml".into(),
      file_sentence_id: 1,
      offset_start:     -3,
      offset_end:       1,
      predicted_head:   "Jo".into(),
      head:             "Bill".into(),
      raw_sentence:     SAID_LEFT.into(),
      result_sentence:  "* Bill *hn said Mary left.".into(),
      rel_source_text:  "Bill_AUTHOR".into(),
    }],
  }
}

#[tokio::test]
async fn write_master_persists_every_table() {
  let m = master().await;
  m.write_master(records()).await.unwrap();

  for (table, expected) in [
    ("sentences", 1),
    ("mentions", 2),
    ("sources", 1),
    ("attitudes", 1),
    ("errors", 1),
  ] {
    assert_eq!(count(&m, table).await, expected, "{table}");
  }
}

#[tokio::test]
async fn unanchored_mentions_use_sentinels() {
  let m = master().await;
  m.write_master(records()).await.unwrap();

  let (start, end, phrase): (i64, i64, Option<String>) = m
    .conn
    .call(|conn| {
      Ok(conn.query_row(
        "SELECT token_offset_start, token_offset_end, phrase_text
         FROM mentions WHERE token_text = 'AUTHOR'",
        [],
        |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
      )?)
    })
    .await
    .unwrap();
  assert_eq!((start, end, phrase), (-1, -1, None));

  let (parent, label): (i64, String) = m
    .conn
    .call(|conn| {
      Ok(conn.query_row(
        "SELECT s.parent_source_id, a.label
         FROM sources s JOIN attitudes a ON a.source_id = s.source_id",
        [],
        |r| Ok((r.get(0)?, r.get(1)?)),
      )?)
    })
    .await
    .unwrap();
  assert_eq!(parent, -1);
  assert_eq!(label, "ROB");
}

#[tokio::test]
async fn failed_write_leaves_no_partial_output() {
  let m = master().await;
  let mut bad = records();
  // second mention reuses the first id: the primary key rejects it
  bad.mentions[1].mention_id = MentionId(1);

  assert!(m.write_master(bad).await.is_err());
  assert_eq!(count(&m, "sentences").await, 0);
  assert_eq!(count(&m, "mentions").await, 0);
}

#[tokio::test]
async fn reopening_resets_the_schema() {
  let dir = std::env::temp_dir().join(format!("fb-master-{}", std::process::id()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("fb_master.db");

  let first = SqliteMaster::open(&path).await.unwrap();
  first.write_master(records()).await.unwrap();
  drop(first);

  let second = SqliteMaster::open(&path).await.unwrap();
  assert_eq!(count(&second, "mentions").await, 0);
  second.write_master(records()).await.unwrap();
  assert_eq!(count(&second, "mentions").await, 2);

  drop(second);
  std::fs::remove_dir_all(&dir).ok();
}

// ─── Full pipeline ───────────────────────────────────────────────────────────

#[tokio::test]
async fn factbank_to_master() {
  let corpus = factbank().await.load_corpus().await.unwrap();
  let parses = ParseBank::from_conllu(CONLLU).unwrap();
  let outcome = SentenceProcessor::new(&parses, ProcessorConfig::default())
    .run(&corpus)
    .unwrap();

  let r = &outcome.records;
  assert_eq!(r.sentences.len(), 1);
  assert_eq!(r.sources.len(), 2);
  assert_eq!(r.sources[1].parent, ParentSource::Source(r.sources[0].source_id));
  assert_eq!(r.sources[1].source_text, "John");
  assert!(r.errors.is_empty());
  // AUTHOR's Uu toward "left" is promoted by John's CT+
  assert_eq!(outcome.report.promotions, 1);

  let m = master().await;
  m.write_master(outcome.records).await.unwrap();
  let labels: Vec<String> = m
    .conn
    .call(|conn| {
      let mut stmt = conn.prepare("SELECT label FROM attitudes ORDER BY attitude_id")?;
      let rows = stmt
        .query_map([], |r| r.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
      Ok(rows)
    })
    .await
    .unwrap();
  assert_eq!(labels, vec!["CT+", "ROB", "CT+"]);
}
