//! SQLite backends for the FactBank pipeline.
//!
//! [`SqliteCorpus`] reads the relational FactBank extraction and
//! [`SqliteMaster`] writes the reconciled master schema. Both wrap
//! [`tokio_rusqlite`] so database access runs off the async runtime.

mod corpus;
mod encode;
mod master;
mod schema;

pub mod error;

pub use corpus::SqliteCorpus;
pub use error::{Error, Result};
pub use master::SqliteMaster;
pub use schema::MASTER_SCHEMA;

#[cfg(test)]
mod tests;
