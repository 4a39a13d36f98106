//! Core types and algorithms for turning FactBank annotations into the
//! master belief schema.
//!
//! This crate is deliberately free of database and parser dependencies.
//! Storage and the dependency parser plug in through the traits in
//! [`store`] and [`parse`].

pub mod corpus;
pub mod error;
pub mod mentions;
pub mod model;
pub mod offsets;
pub mod parse;
pub mod processor;
pub mod propagate;
pub mod sequence;
pub mod sources;
pub mod store;
pub mod text;

pub use error::{Error, Result};
pub use processor::{OrphanPolicy, Outcome, ProcessorConfig, RunReport, SentenceProcessor};

#[cfg(test)]
mod fixture;
