//! entity-linker library
//!
//! Joins the finance and procurement registries and links their records by
//! fuzzy name similarity.

pub mod commands;
pub mod config;
pub mod error;
pub mod linker;
pub mod output;
pub mod pipeline;
pub mod table;

pub use error::TableError;
pub use linker::{BestMatch, LocalityGate, Matcher, Metric, Record, Scorer};
pub use table::Table;
