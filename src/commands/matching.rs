//! `match` command: print the best match for every target record.

use std::path::Path;

use anyhow::Result;

use crate::config::{ColumnMap, Side};
use crate::linker::{link_all, LinkRow, Matcher};
use crate::output::OutputControls;
use crate::pipeline;

/// Match one registry against the other and print one line per target.
///
/// Text lines read `<target> --> (<match>, <score>)`, or
/// `<target> --> (no match)`.
pub fn run(
    data_dir: &Path,
    columns: &ColumnMap,
    matcher: &Matcher,
    primary: Side,
    limit: Option<usize>,
    output: &OutputControls,
) -> Result<()> {
    let datasets = pipeline::load_datasets(data_dir)?;
    let sets = pipeline::extract_records(&datasets, columns)?;

    let (targets, candidates) = match primary {
        Side::Finance => (&sets.finance, &sets.procurement),
        Side::Procurement => (&sets.procurement, &sets.finance),
    };
    let targets = match limit {
        Some(n) => &targets[..n.min(targets.len())],
        None => &targets[..],
    };

    tracing::info!(
        "Matching {} {:?} targets against {} candidates",
        targets.len(),
        primary,
        candidates.len()
    );
    let links = link_all(targets, candidates, matcher);

    if output.json {
        let rows: Vec<LinkRow> = links.iter().map(LinkRow::from).collect();
        output.print(&rows);
    } else {
        for link in &links {
            println!("{}", link);
        }
    }

    Ok(())
}
