//! Fuzzy linkage of records across two registries.

pub mod batch;
pub mod fuzzy;
pub mod index;
pub mod matcher;

pub use batch::{link_all, Link, LinkRow};
pub use fuzzy::{Metric, Scorer};
pub use index::{coverage, LocalityCoverage, LocalityIndex};
pub use matcher::{records, BestMatch, LocalityGate, Matcher, Record};
