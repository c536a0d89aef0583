//! Batch driver: best match for every primary record.

use std::fmt;

use serde::Serialize;

use super::index::LocalityIndex;
use super::matcher::{BestMatch, Matcher, Record};

/// Log progress every this many targets.
const PROGRESS_EVERY: usize = 1000;

/// Outcome for one primary record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link<'a> {
    pub target: &'a Record,
    pub best: Option<BestMatch<'a>>,
}

impl fmt::Display for Link<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.best {
            Some(best) => write!(f, "{} --> ({}, {})", self.target.name, best.name(), best.score),
            None => write!(f, "{} --> (no match)", self.target.name),
        }
    }
}

/// Flat, serializable view of a [`Link`].
#[derive(Debug, Clone, Serialize)]
pub struct LinkRow {
    pub target: String,
    pub locality: String,
    pub matched_name: Option<String>,
    pub matched_locality: Option<String>,
    pub score: Option<u8>,
}

impl From<&Link<'_>> for LinkRow {
    fn from(link: &Link<'_>) -> Self {
        Self {
            target: link.target.name.clone(),
            locality: link.target.locality.clone(),
            matched_name: link.best.map(|b| b.name().to_string()),
            matched_locality: link.best.map(|b| b.locality().to_string()),
            score: link.best.map(|b| b.score),
        }
    }
}

/// Match every `primary` record against `secondary`.
///
/// With an active locality gate only the target's locality bucket is
/// scanned; buckets keep pool order, so results equal a gated full scan.
pub fn link_all<'a>(primary: &'a [Record], secondary: &'a [Record], matcher: &Matcher) -> Vec<Link<'a>> {
    let index = matcher
        .gate
        .is_active()
        .then(|| LocalityIndex::build(secondary, matcher.gate));

    if let Some(index) = &index {
        tracing::info!("Indexed {} candidates into {} localities", secondary.len(), index.len());
    }

    let mut links = Vec::with_capacity(primary.len());
    let mut matched = 0usize;

    for (idx, target) in primary.iter().enumerate() {
        let best = match &index {
            Some(index) => matcher.find_best_match(target, index.candidates(&target.locality).iter().copied()),
            None => matcher.find_best_match(target, secondary),
        };

        if best.is_some() {
            matched += 1;
        }
        links.push(Link { target, best });

        let done = idx + 1;
        if done % PROGRESS_EVERY == 0 {
            tracing::info!("Match progress: {}/{}, matched: {}", done, primary.len(), matched);
        }
    }

    tracing::info!("Matching complete: {} targets, {} matched", primary.len(), matched);
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linker::fuzzy::Scorer;
    use crate::linker::matcher::LocalityGate;

    fn recs(entries: &[(&str, &str)]) -> Vec<Record> {
        entries
            .iter()
            .enumerate()
            .map(|(i, (name, loc))| Record::new(i, *name, *loc))
            .collect()
    }

    #[test]
    fn test_indexed_links_equal_gated_full_scan() {
        let finance = recs(&[
            ("Acme Corporation", "US"),
            ("Beta Holdings", "FR"),
            ("Gamma GmbH", "DE"),
            ("Delta LLC", "us"),
            ("Epsilon AG", ""),
        ]);
        let procurement = recs(&[
            ("Beta Holding SA", "FR"),
            ("Acme Corp", "US"),
            ("Acme Co", "US"),
            ("Delta", "US"),
            ("Acme Corporation", "FR"),
            ("Epsilon AG", ""),
        ]);

        for gate in [LocalityGate::Exact, LocalityGate::IgnoreCase] {
            let matcher = Matcher::new(Scorer::default(), gate, Some(40));
            let links = link_all(&finance, &procurement, &matcher);

            for link in &links {
                let full = matcher.find_best_match(link.target, &procurement);
                assert_eq!(link.best, full, "gate {gate:?}, target {}", link.target.name);
            }
            assert!(links[4].best.is_none());
        }
    }

    #[test]
    fn test_every_target_gets_a_link() {
        let finance = recs(&[("Acme", "US"), ("Nobody", "JP")]);
        let procurement = recs(&[("Acme", "US")]);
        let matcher = Matcher::new(Scorer::default(), LocalityGate::Exact, None);

        let links = link_all(&finance, &procurement, &matcher);

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].to_string(), "Acme --> (Acme, 100)");
        assert_eq!(links[1].to_string(), "Nobody --> (no match)");
    }

    #[test]
    fn test_link_row_flattens_match() {
        let finance = recs(&[("Acme Corporation", "US")]);
        let procurement = recs(&[("Acme Corp", "US")]);

        let links = link_all(&finance, &procurement, &Matcher::default());
        let row = LinkRow::from(&links[0]);

        assert_eq!(row.matched_name.as_deref(), Some("Acme Corp"));
        assert_eq!(row.matched_locality.as_deref(), Some("US"));
        assert_eq!(row.score, Some(72));
    }
}
