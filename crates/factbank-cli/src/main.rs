//! `fb2master`: rebuild the FactBank belief annotations as a master schema.
//!
//! Reads the relational FactBank extraction and a CoNLL-U parse of every
//! sentence, reconciles sources, mentions and attitudes, and writes the
//! result to a fresh SQLite database.
//!
//! # Usage
//!
//! ```text
//! fb2master --source-db factbank_data.db --parses factbank.conllu
//! fb2master --config fb2master.toml --report run.json
//! ```

mod settings;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use factbank_conllu::ParseBank;
use factbank_core::{
  RunReport, SentenceProcessor,
  store::{CorpusSource as _, MasterSink as _},
};
use factbank_store_sqlite::{SqliteCorpus, SqliteMaster};
use settings::Settings;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(author, version, about = "Reconcile FactBank annotations into a master schema")]
pub struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "fb2master.toml")]
  config: PathBuf,

  /// FactBank database to read.
  #[arg(long, value_name = "FILE")]
  source_db: Option<PathBuf>,

  /// Master database to write; its tables are recreated.
  #[arg(long, value_name = "FILE")]
  master_db: Option<PathBuf>,

  /// CoNLL-U file with a dependency parse of every sentence.
  #[arg(long, value_name = "FILE")]
  parses: Option<PathBuf>,

  /// Write a JSON run report here.
  #[arg(long, value_name = "FILE")]
  report: Option<PathBuf>,

  /// Deepest source nesting level to build.
  #[arg(long)]
  max_nesting_level: Option<u8>,

  /// What to do with a source whose parent could not be built.
  #[arg(long, value_enum)]
  orphan_policy: Option<OrphanArg>,

  /// Also process file-local sentence 0 (the document header).
  #[arg(long)]
  keep_header_sentence: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrphanArg {
  /// Abort the run.
  Fail,
  /// Drop the source and its attitudes.
  Skip,
}

impl OrphanArg {
  fn as_str(self) -> &'static str {
    match self {
      Self::Fail => "fail",
      Self::Skip => "skip",
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli)?;
  info!(
    source_db = %settings.source_db.display(),
    master_db = %settings.master_db.display(),
    parses = %settings.parses.display(),
    "starting run"
  );

  let conllu = tokio::fs::read_to_string(&settings.parses)
    .await
    .with_context(|| format!("failed to read {}", settings.parses.display()))?;
  let parses = ParseBank::from_conllu(&conllu).context("failed to parse CoNLL-U input")?;
  info!(sentences = parses.len(), "dependency parses loaded");

  let corpus = SqliteCorpus::open(&settings.source_db)
    .await
    .with_context(|| format!("failed to open {}", settings.source_db.display()))?
    .load_corpus()
    .await
    .context("failed to extract FactBank annotations")?;
  info!(sentences = corpus.sentences.len(), "corpus loaded");

  let outcome = SentenceProcessor::new(&parses, settings.processor.clone())
    .run(&corpus)
    .context("failed to reconcile annotations")?;

  let master = SqliteMaster::open(&settings.master_db)
    .await
    .with_context(|| format!("failed to open {}", settings.master_db.display()))?;
  master
    .write_master(outcome.records)
    .await
    .context("failed to write master records")?;

  summarize(&outcome.report);
  if let Some(path) = &settings.report {
    let json = serde_json::to_string_pretty(&outcome.report)?;
    tokio::fs::write(path, json)
      .await
      .with_context(|| format!("failed to write report to {}", path.display()))?;
    info!(path = %path.display(), "run report written");
  }
  Ok(())
}

fn summarize(report: &RunReport) {
  info!(
    sentences = report.sentences,
    mentions = report.mentions,
    sources = report.sources,
    attitudes = report.attitudes,
    promotions = report.promotions,
    elapsed_ms = (report.finished_at - report.started_at).num_milliseconds(),
    "run complete"
  );
  if report.truncated_sources + report.orphan_sources + report.missing_targets > 0 {
    warn!(
      truncated = report.truncated_sources,
      orphans = report.orphan_sources,
      missing_targets = report.missing_targets,
      "some annotations were not reconciled"
    );
  }
  if report.offset_errors == 0 {
    info!("0 errors; data integrity verified");
  } else {
    warn!(
      errors = report.offset_errors,
      dropped_sources = report.dropped_sources,
      dropped_attitudes = report.dropped_attitudes,
      "offsets could not be resolved; see the errors table"
    );
  }
}
