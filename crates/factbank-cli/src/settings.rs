//! Layered run settings: defaults, then `fb2master.toml`, then
//! `FB2MASTER_*` environment variables, then command-line flags.

use std::path::PathBuf;

use anyhow::Context as _;
use factbank_core::ProcessorConfig;
use serde::Deserialize;

use crate::Cli;

pub const ENV_PREFIX: &str = "FB2MASTER";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// FactBank database to read.
  #[serde(default = "default_source_db")]
  pub source_db: PathBuf,

  /// Master database to (re)create.
  #[serde(default = "default_master_db")]
  pub master_db: PathBuf,

  /// CoNLL-U dependency parses of every corpus sentence.
  #[serde(default = "default_parses")]
  pub parses: PathBuf,

  /// Where to write the JSON run report, if anywhere.
  #[serde(default)]
  pub report: Option<PathBuf>,

  #[serde(default)]
  pub processor: ProcessorConfig,
}

fn default_source_db() -> PathBuf { PathBuf::from("factbank_data.db") }

fn default_master_db() -> PathBuf { PathBuf::from("fb_master.db") }

fn default_parses() -> PathBuf { PathBuf::from("factbank.conllu") }

fn path_value(path: &Option<PathBuf>) -> Option<String> {
  path.as_ref().map(|p| p.to_string_lossy().into_owned())
}

impl Settings {
  pub fn load(cli: &Cli) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(cli.config.clone()).required(false))
      .add_source(
        config::Environment::with_prefix(ENV_PREFIX)
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .set_override_option("source_db", path_value(&cli.source_db))?
      .set_override_option("master_db", path_value(&cli.master_db))?
      .set_override_option("parses", path_value(&cli.parses))?
      .set_override_option("report", path_value(&cli.report))?
      .set_override_option(
        "processor.max_nesting_level",
        cli.max_nesting_level.map(i64::from),
      )?
      .set_override_option(
        "processor.orphan_policy",
        cli.orphan_policy.map(|p| p.as_str().to_owned()),
      )?
      .set_override_option(
        "processor.skip_header_sentence",
        cli.keep_header_sentence.then_some(false),
      )?
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise Settings")
  }
}
