//! SQL for the master schema and the FactBank extraction queries.

/// Master schema DDL. Tables are dropped and recreated so that a rerun
/// replaces the previous output rather than appending to it.
pub const MASTER_SCHEMA: &str = "
PRAGMA foreign_keys = ON;

DROP TABLE IF EXISTS errors;
DROP TABLE IF EXISTS attitudes;
DROP TABLE IF EXISTS sources;
DROP TABLE IF EXISTS mentions;
DROP TABLE IF EXISTS sentences;

CREATE TABLE sentences (
    sentence_id      INTEGER PRIMARY KEY,
    file             VARCHAR2(255),
    file_sentence_id INTEGER,
    sentence         VARCHAR2(255)
);

-- token offsets are -1/-1 and phrase columns NULL for unanchored mentions
CREATE TABLE mentions (
    token_id            INTEGER PRIMARY KEY,
    sentence_id         INTEGER NOT NULL REFERENCES sentences(sentence_id),
    token_text          VARCHAR2(255),
    token_offset_start  INTEGER,
    token_offset_end    INTEGER,
    phrase_text         VARCHAR2(255),
    phrase_offset_start INTEGER,
    phrase_offset_end   INTEGER
);

-- parent_source_id is -1 for level-0 sources, so it carries no FK
CREATE TABLE sources (
    source_id        INTEGER PRIMARY KEY,
    sentence_id      INTEGER NOT NULL REFERENCES sentences(sentence_id),
    token_id         INTEGER NOT NULL REFERENCES mentions(token_id),
    parent_source_id INTEGER NOT NULL,
    nesting_level    INTEGER NOT NULL,
    [source]         VARCHAR2(255)
);

CREATE TABLE attitudes (
    attitude_id     INTEGER PRIMARY KEY,
    source_id       INTEGER NOT NULL REFERENCES sources(source_id),
    target_token_id INTEGER NOT NULL REFERENCES mentions(token_id),
    label           VARCHAR2(255),
    label_type      VARCHAR2(255)
);

CREATE TABLE errors (
    error_id         INTEGER PRIMARY KEY AUTOINCREMENT,
    file             VARCHAR2(255),
    file_sentence_id INTEGER,
    offset_start     INTEGER,
    offset_end       INTEGER,
    predicted_head   VARCHAR2(255),
    head             VARCHAR2(255),
    raw_sentence     VARCHAR2(255),
    result_sentence  VARCHAR2(255),
    rel_source_text  VARCHAR2(255)
);

CREATE INDEX sources_sentence_idx   ON sources(sentence_id);
CREATE INDEX attitudes_source_idx   ON attitudes(source_id);
CREATE INDEX mentions_sentence_idx  ON mentions(sentence_id);
";

pub const SENTENCES_QUERY: &str = "
SELECT DISTINCT s.file, s.sentid, s.sent
FROM sentences s
ORDER BY s.file, s.sentid";

/// Offset of each sentence's first token: the file-to-sentence base.
pub const BASE_OFFSETS_QUERY: &str = "
SELECT o.file, o.sentId, o.offsetInit FROM offsets o WHERE o.tokLoc = 0";

pub const REL_SOURCES_QUERY: &str = "
SELECT file, sentId, relSourceId, relSourceText FROM fb_relSource";

pub const SOURCE_OFFSETS_QUERY: &str = "
SELECT s.file, s.sentId, o.offsetInit, o.offsetEnd
FROM fb_source s JOIN offsets o
  ON s.file = o.file AND s.sentId = o.sentId AND s.sourceLoc = o.tokLoc";

pub const TARGETS_QUERY: &str = "
SELECT o.file, o.sentId, o.tmlTagId, o.tokLoc, t.eText
FROM tokens_tml o JOIN fb_factValue t
  ON o.file = t.file AND o.sentId = t.sentId AND o.tmlTagId = t.eId";

pub const TOKEN_OFFSETS_QUERY: &str = "
SELECT file, sentId, tokLoc, offsetInit, offsetEnd FROM offsets";

pub const FACT_VALUES_QUERY: &str = "
SELECT file, sentId, relSourceId, eId, factValue FROM fb_factValue";
