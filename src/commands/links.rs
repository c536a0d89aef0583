//! `links` command: id mapping of linked finance and procurement records.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::{ColumnMap, IdColumns, Side};
use crate::linker::{link_all, Matcher};
use crate::output::OutputControls;
use crate::pipeline;

/// Summary of a written id mapping.
#[derive(Debug, Serialize)]
pub struct LinksSummary {
    pub success: bool,
    pub output: String,
    pub primary: Side,
    pub targets: usize,
    pub linked: usize,
    pub id_columns: IdColumns,
    pub min_score: Option<u8>,
    pub generated_at: String,
}

/// Link every `primary` record and write one id pair per match to
/// `output_path`.
pub fn run(
    data_dir: &Path,
    columns: &ColumnMap,
    ids: &IdColumns,
    matcher: &Matcher,
    primary: Side,
    output_path: &Path,
    output: &OutputControls,
) -> Result<()> {
    let datasets = pipeline::load_datasets(data_dir)?;
    let sets = pipeline::extract_records(&datasets, columns)?;

    let (targets, candidates) = match primary {
        Side::Finance => (&sets.finance, &sets.procurement),
        Side::Procurement => (&sets.procurement, &sets.finance),
    };
    let links = link_all(targets, candidates, matcher);

    let table = pipeline::id_mapping_table(&datasets, ids, primary, &links)?;
    table
        .save(output_path)
        .with_context(|| format!("Failed to write id mapping to {:?}", output_path))?;
    tracing::info!("Wrote {} id pairs to {:?}", table.len(), output_path);

    if output.json {
        output.print(&LinksSummary {
            success: true,
            output: output_path.display().to_string(),
            primary,
            targets: targets.len(),
            linked: table.len(),
            id_columns: ids.clone(),
            min_score: matcher.min_score,
            generated_at: chrono::Utc::now().to_rfc3339(),
        });
    } else {
        println!(
            "Linked {} of {} targets to {}",
            table.len(),
            targets.len(),
            output_path.display()
        );
    }

    Ok(())
}
