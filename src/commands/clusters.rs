//! `clusters` command: record counts per locality on both sides.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::config::ColumnMap;
use crate::linker::{coverage, LocalityCoverage, LocalityGate};
use crate::output::OutputControls;
use crate::pipeline;

#[derive(Debug, Serialize)]
struct ClusterReport<'a> {
    localities: &'a [LocalityCoverage],
    finance_only: Vec<&'a str>,
    procurement_only: Vec<&'a str>,
}

/// Group both registries by locality and list one-sided localities.
pub fn run(data_dir: &Path, columns: &ColumnMap, gate: LocalityGate, output: &OutputControls) -> Result<()> {
    let datasets = pipeline::load_datasets(data_dir)?;
    let sets = pipeline::extract_records(&datasets, columns)?;

    // Grouping needs a key even when matching would not gate
    let gate = if gate.is_active() { gate } else { LocalityGate::Exact };
    let report = coverage(&sets.finance, &sets.procurement, gate);

    let finance_only: Vec<&str> = report
        .iter()
        .filter(|c| c.finance_only())
        .map(|c| c.locality.as_str())
        .collect();
    let procurement_only: Vec<&str> = report
        .iter()
        .filter(|c| c.procurement_only())
        .map(|c| c.locality.as_str())
        .collect();

    if output.json {
        output.print(&ClusterReport {
            localities: &report,
            finance_only,
            procurement_only,
        });
        return Ok(());
    }

    println!("{:<20} {:>10} {:>12}", "LOCALITY", "FINANCE", "PROCUREMENT");
    println!("{}", "-".repeat(44));
    for c in &report {
        println!("{:<20} {:>10} {:>12}", display_locality(&c.locality), c.finance, c.procurement);
    }

    for locality in &finance_only {
        println!("{} in finance but not procurement", display_locality(locality));
    }
    for locality in &procurement_only {
        println!("{} in procurement but not finance", display_locality(locality));
    }

    Ok(())
}

fn display_locality(locality: &str) -> &str {
    if locality.is_empty() {
        "(blank)"
    } else {
        locality
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_locality_is_labelled() {
        assert_eq!(display_locality(""), "(blank)");
        assert_eq!(display_locality("US"), "US");
    }
}
