//! Command implementations.

pub mod clusters;
pub mod export;
pub mod links;
pub mod matching;
