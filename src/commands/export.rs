//! `export` command: procurement table augmented with finance matches.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::ColumnMap;
use crate::linker::{link_all, LocalityGate, Matcher, Metric};
use crate::output::OutputControls;
use crate::pipeline;

/// Summary of a finished export.
#[derive(Debug, Serialize)]
pub struct ExportSummary {
    pub success: bool,
    pub output: String,
    pub rows: usize,
    pub matched: usize,
    pub min_score: Option<u8>,
    pub metric: Metric,
    pub gate: LocalityGate,
    pub generated_at: String,
}

/// Match every procurement row against finance entities and write the
/// augmented procurement table to `output_path`.
pub fn run(
    data_dir: &Path,
    columns: &ColumnMap,
    matcher: &Matcher,
    output_path: &Path,
    output: &OutputControls,
) -> Result<()> {
    let datasets = pipeline::load_datasets(data_dir)?;
    let sets = pipeline::extract_records(&datasets, columns)?;

    let links = link_all(&sets.procurement, &sets.finance, matcher);
    let matched = links.iter().filter(|l| l.best.is_some()).count();

    let table = pipeline::export_table(&datasets.procurement, &links)?;
    table
        .save(output_path)
        .with_context(|| format!("Failed to write export to {:?}", output_path))?;
    tracing::info!("Wrote {} rows to {:?}", table.len(), output_path);

    if output.json {
        output.print(&ExportSummary {
            success: true,
            output: output_path.display().to_string(),
            rows: table.len(),
            matched,
            min_score: matcher.min_score,
            metric: matcher.scorer.metric,
            gate: matcher.gate,
            generated_at: chrono::Utc::now().to_rfc3339(),
        });
    } else {
        println!(
            "Exported {} rows ({} matched) to {}",
            table.len(),
            matched,
            output_path.display()
        );
    }

    Ok(())
}
