//! Best-match search over a candidate pool.

use serde::Serialize;

use super::fuzzy::Scorer;
use crate::error::Result;
use crate::table::Table;

/// A row reduced to the two fields the linker needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Row index in the source table
    pub row: usize,
    pub name: String,
    pub locality: String,
}

impl Record {
    pub fn new(row: usize, name: impl Into<String>, locality: impl Into<String>) -> Self {
        Self {
            row,
            name: name.into(),
            locality: locality.into(),
        }
    }
}

/// Extract records from a table, one per row.
///
/// Without a locality column every record gets an empty locality.
pub fn records(table: &Table, name_column: &str, locality_column: Option<&str>) -> Result<Vec<Record>> {
    let names = table.column(name_column)?;
    let localities = match locality_column {
        Some(column) => table.column(column)?,
        None => vec![""; names.len()],
    };

    Ok(names
        .into_iter()
        .zip(localities)
        .enumerate()
        .map(|(row, (name, locality))| Record::new(row, name, locality))
        .collect())
}

/// Equality predicate on target and candidate localities, applied before
/// scoring.
///
/// A blank locality is unknown, not a value: while the gate is active it
/// equals nothing, not even another blank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocalityGate {
    /// Score every candidate
    #[default]
    Off,
    /// Localities must be byte-equal
    Exact,
    /// Localities must be equal after trimming and lowercasing
    IgnoreCase,
}

impl LocalityGate {
    pub fn is_active(&self) -> bool {
        !matches!(self, LocalityGate::Off)
    }

    /// Whether `candidate` may be scored against a target in `target`.
    pub fn allows(&self, target: &str, candidate: &str) -> bool {
        if !self.is_active() {
            return true;
        }
        match (self.key(target), self.key(candidate)) {
            (Some(target), Some(candidate)) => target == candidate,
            _ => false,
        }
    }

    /// Grouping key consistent with [`allows`](Self::allows); `None` for a
    /// blank locality.
    pub fn key(&self, locality: &str) -> Option<String> {
        let key = match self {
            LocalityGate::IgnoreCase => locality.trim().to_lowercase(),
            _ => locality.to_string(),
        };
        (!key.is_empty()).then_some(key)
    }
}

/// Winning candidate and its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestMatch<'a> {
    pub candidate: &'a Record,
    pub score: u8,
}

impl<'a> BestMatch<'a> {
    pub fn name(&self) -> &'a str {
        &self.candidate.name
    }

    pub fn locality(&self) -> &'a str {
        &self.candidate.locality
    }
}

/// Finds the best-scoring candidate for a target record.
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher {
    pub scorer: Scorer,
    pub gate: LocalityGate,
    /// A score must exceed this to count; `None` accepts any score.
    pub min_score: Option<u8>,
}

impl Matcher {
    pub fn new(scorer: Scorer, gate: LocalityGate, min_score: Option<u8>) -> Self {
        Self {
            scorer,
            gate,
            min_score,
        }
    }

    /// Scan `candidates` in order and keep the highest score.
    ///
    /// Candidates rejected by the locality gate are skipped without scoring.
    /// A later candidate replaces the running best only with a strictly
    /// higher score, so the first of several equal maxima wins. Returns
    /// `None` for an empty pool, a pool the gate rejects entirely, or when no
    /// score exceeds `min_score`.
    pub fn find_best_match<'a, I>(&self, target: &Record, candidates: I) -> Option<BestMatch<'a>>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut best: Option<BestMatch<'a>> = None;

        for candidate in candidates {
            if !self.gate.allows(&target.locality, &candidate.locality) {
                continue;
            }

            let score = self.scorer.score(&target.name, &candidate.name);
            if self.min_score.is_some_and(|min| score <= min) {
                continue;
            }

            if best.map_or(true, |b| score > b.score) {
                best = Some(BestMatch { candidate, score });
            }
        }

        best
    }
}
