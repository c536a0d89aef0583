//! Load → join → extract → match → export, as plain functions.
//!
//! Nothing here holds state between calls; each step takes its inputs and
//! returns its outputs.

use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::config::{
    ColumnMap, DatasetLayout, IdColumns, Side, EXPORT_COLUMNS, FINANCE, LINK_SCORE_COLUMN,
    PROCUREMENT,
};
use crate::linker::{records, Link, Record};
use crate::table::{join, Table};

/// Both joined registries.
#[derive(Debug, Clone)]
pub struct Datasets {
    pub finance: Table,
    pub procurement: Table,
}

/// Records extracted from both registries, in table row order.
#[derive(Debug, Clone)]
pub struct RecordSets {
    pub finance: Vec<Record>,
    pub procurement: Vec<Record>,
}

/// Load every table of a dataset and outer-join them on its key.
pub fn load_dataset(layout: &DatasetLayout, data_dir: &Path) -> Result<Table> {
    let mut tables = Vec::with_capacity(layout.files.len());
    for path in layout.paths(data_dir) {
        let table = Table::load(&path)
            .with_context(|| format!("Failed to load {} table {:?}", layout.name, path))?;
        tracing::info!("Loaded {} rows from {:?}", table.len(), path);
        tables.push(table);
    }

    let joined = join::outer_join_all(&tables, layout.key)
        .with_context(|| format!("Failed to join {} tables on '{}'", layout.name, layout.key))?
        .ok_or_else(|| anyhow!("Dataset '{}' has no tables", layout.name))?;

    tracing::info!(
        "Joined {} dataset: {} rows, {} columns",
        layout.name,
        joined.len(),
        joined.headers().len()
    );
    Ok(joined.renamed(layout.name))
}

/// Load and join the finance and procurement registries.
pub fn load_datasets(data_dir: &Path) -> Result<Datasets> {
    Ok(Datasets {
        finance: load_dataset(&FINANCE, data_dir)?,
        procurement: load_dataset(&PROCUREMENT, data_dir)?,
    })
}

/// Pull name/locality records out of both joined tables.
pub fn extract_records(datasets: &Datasets, columns: &ColumnMap) -> Result<RecordSets> {
    let finance = records(
        &datasets.finance,
        &columns.finance_name,
        columns.finance_locality.as_deref(),
    )
    .context("Failed to read finance records")?;

    let procurement = records(
        &datasets.procurement,
        &columns.procurement_name,
        columns.procurement_locality.as_deref(),
    )
    .context("Failed to read procurement records")?;

    Ok(RecordSets { finance, procurement })
}

/// Procurement table with `entity_name` and `locality` of each row's best
/// finance match, empty where nothing cleared the threshold.
///
/// `links` must have procurement records as targets.
pub fn export_table(procurement: &Table, links: &[Link<'_>]) -> Result<Table> {
    let mut values = vec![vec![String::new(); EXPORT_COLUMNS.len()]; procurement.len()];
    for link in links {
        if let (Some(best), Some(slot)) = (link.best, values.get_mut(link.target.row)) {
            *slot = vec![best.name().to_string(), best.locality().to_string()];
        }
    }

    procurement
        .clone()
        .with_columns(&EXPORT_COLUMNS, values)
        .context("Failed to add match columns to procurement table")
}

/// One `finance id, procurement id, score` row per linked pair, in link
/// order. Targets without a match are left out.
///
/// `primary` says which registry the link targets came from; the id columns
/// are written finance first either way.
pub fn id_mapping_table(
    datasets: &Datasets,
    ids: &IdColumns,
    primary: Side,
    links: &[Link<'_>],
) -> Result<Table> {
    let finance_ids = datasets
        .finance
        .column(&ids.finance)
        .context("Failed to read finance ids")?;
    let procurement_ids = datasets
        .procurement
        .column(&ids.procurement)
        .context("Failed to read procurement ids")?;
    let id_at = |column: &[&str], row: usize| column.get(row).copied().unwrap_or_default().to_string();

    let rows = links
        .iter()
        .filter_map(|link| {
            let best = link.best?;
            let (finance_row, procurement_row) = match primary {
                Side::Finance => (link.target.row, best.candidate.row),
                Side::Procurement => (best.candidate.row, link.target.row),
            };
            Some(vec![
                id_at(&finance_ids[..], finance_row),
                id_at(&procurement_ids[..], procurement_row),
                best.score.to_string(),
            ])
        })
        .collect();

    Ok(Table::new(
        "links",
        vec![ids.finance.clone(), ids.procurement.clone(), LINK_SCORE_COLUMN.to_string()],
        rows,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linker::{link_all, LocalityGate, Matcher, Scorer};

    #[test]
    fn test_export_fills_only_matched_rows() {
        let procurement = Table::new(
            "procurement",
            vec!["geo_id".into(), "name".into(), "country_iso2".into()],
            vec![
                vec!["g1".into(), "Acme Corp".into(), "US".into()],
                vec!["g2".into(), "Unknown Vendor".into(), "JP".into()],
            ],
        );
        let targets = records(&procurement, "name", Some("country_iso2")).unwrap();
        let finance = vec![Record::new(0, "Acme Corporation", "US")];
        let matcher = Matcher::new(Scorer::default(), LocalityGate::Exact, Some(44));

        let links = link_all(&targets, &finance, &matcher);
        let exported = export_table(&procurement, &links).unwrap();

        assert_eq!(exported.headers().len(), 5);
        assert_eq!(exported.cell(0, "entity_name").unwrap(), Some("Acme Corporation"));
        assert_eq!(exported.cell(0, "locality").unwrap(), Some("US"));
        assert_eq!(exported.cell(1, "entity_name").unwrap(), Some(""));
        assert_eq!(exported.cell(1, "locality").unwrap(), Some(""));
    }

    #[test]
    fn test_id_mapping_orders_finance_first() {
        let datasets = Datasets {
            finance: Table::new(
                "finance",
                vec!["factset_entity_id".into(), "entity_name".into()],
                vec![
                    vec!["E1".into(), "Acme Corporation".into()],
                    vec!["E2".into(), "Zeta".into()],
                ],
            ),
            procurement: Table::new(
                "procurement",
                vec!["vendor_id".into(), "name".into()],
                vec![vec!["V1".into(), "Acme Corp".into()]],
            ),
        };
        let sets = extract_records(
            &datasets,
            &ColumnMap::for_locality(crate::config::LocalityField::Anywhere),
        )
        .unwrap();
        let matcher = Matcher::new(Scorer::default(), LocalityGate::Off, Some(50));

        let from_finance = link_all(&sets.finance, &sets.procurement, &matcher);
        let table = id_mapping_table(&datasets, &IdColumns::default(), Side::Finance, &from_finance).unwrap();
        assert_eq!(table.headers(), &["factset_entity_id", "vendor_id", "score"]);
        assert_eq!(table.rows(), &[vec!["E1".to_string(), "V1".into(), "72".into()]]);

        let from_procurement = link_all(&sets.procurement, &sets.finance, &matcher);
        let table =
            id_mapping_table(&datasets, &IdColumns::default(), Side::Procurement, &from_procurement).unwrap();
        assert_eq!(table.rows(), &[vec!["E1".to_string(), "V1".into(), "72".into()]]);
    }

    #[test]
    fn test_id_mapping_requires_id_columns() {
        let datasets = Datasets {
            finance: Table::new("finance", vec!["entity_name".into()], vec![]),
            procurement: Table::new("procurement", vec!["vendor_id".into()], vec![]),
        };

        let err = id_mapping_table(&datasets, &IdColumns::default(), Side::Finance, &[]).unwrap_err();
        assert!(format!("{:#}", err).contains("factset_entity_id"));
    }

    #[test]
    fn test_missing_locality_column_is_reported() {
        let datasets = Datasets {
            finance: Table::new("finance", vec!["entity_name".into()], vec![]),
            procurement: Table::new("procurement", vec!["name".into()], vec![]),
        };
        let columns = ColumnMap::for_locality(crate::config::LocalityField::Country);

        let err = extract_records(&datasets, &columns).unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("finance records"));
        assert!(chain.contains("iso_country_y"));
    }
}
