//! Run configuration: data directory, dataset layouts and column choices.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Serialize;

use crate::linker::LocalityGate;

/// Environment variable overriding the default data directory.
pub const DATA_DIR_ENV: &str = "ENTITY_LINKER_DATA_DIR";

/// Columns appended to the procurement table by `export`.
pub const EXPORT_COLUMNS: [&str; 2] = ["entity_name", "locality"];

/// Default score `export` matches must exceed.
pub const EXPORT_MIN_SCORE: u8 = 44;

/// Score column written after the two id columns by `links`.
pub const LINK_SCORE_COLUMN: &str = "score";

/// Resolve the data directory.
///
/// Tries in order:
/// 1. explicit path (from `--data-dir`)
/// 2. ENTITY_LINKER_DATA_DIR env var
/// 3. `./data`
///
/// A leading `~` is expanded.
pub fn resolve_data_dir(explicit: Option<&str>) -> PathBuf {
    let raw = match explicit {
        Some(path) => path.to_string(),
        None => std::env::var(DATA_DIR_ENV).unwrap_or_else(|_| "data".to_string()),
    };
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
}

/// Where a dataset's tables live and how they join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetLayout {
    pub name: &'static str,
    pub dir: &'static str,
    pub files: &'static [&'static str],
    pub key: &'static str,
}

impl DatasetLayout {
    /// Table paths under `data_dir`, in join order.
    pub fn paths(&self, data_dir: &Path) -> Vec<PathBuf> {
        self.files
            .iter()
            .map(|file| data_dir.join(self.dir).join(file))
            .collect()
    }
}

/// Finance entity registry: structure, address, coverage.
pub const FINANCE: DatasetLayout = DatasetLayout {
    name: "finance",
    dir: "finance",
    files: &[
        "factset__ent_entity_structure.csv",
        "factset__ent_entity_address.csv",
        "factset__ent_entity_coverage.csv",
    ],
    key: "factset_entity_id",
};

/// Procurement vendor registry: geo and vendor dimensions.
pub const PROCUREMENT: DatasetLayout = DatasetLayout {
    name: "procurement",
    dir: "procurement",
    files: &["mdl__dim_geo.csv", "mdl__dim_vendor.csv"],
    key: "geo_id",
};

/// Which record set supplies the targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Side {
    #[default]
    Finance,
    Procurement,
}

/// Geographic field used as the locality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LocalityField {
    /// ISO country code
    #[default]
    Country,
    /// City name
    City,
    /// No locality; every candidate is scored
    #[value(name = "none")]
    #[serde(rename = "none")]
    Anywhere,
}

impl LocalityField {
    /// Gate matching this field.
    pub fn gate(&self, ignore_case: bool) -> LocalityGate {
        match (self, ignore_case) {
            (LocalityField::Anywhere, _) => LocalityGate::Off,
            (_, true) => LocalityGate::IgnoreCase,
            (_, false) => LocalityGate::Exact,
        }
    }
}

/// Identifier columns written by `links`, finance first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdColumns {
    pub finance: String,
    pub procurement: String,
}

impl Default for IdColumns {
    fn default() -> Self {
        Self {
            finance: FINANCE.key.to_string(),
            procurement: "vendor_id".to_string(),
        }
    }
}

impl IdColumns {
    /// Replace defaults with any explicitly given columns.
    pub fn with_overrides(mut self, finance: Option<String>, procurement: Option<String>) -> Self {
        if let Some(c) = finance {
            self.finance = c;
        }
        if let Some(c) = procurement {
            self.procurement = c;
        }
        self
    }
}

/// Name and locality columns for both joined tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMap {
    pub finance_name: String,
    pub finance_locality: Option<String>,
    pub procurement_name: String,
    pub procurement_locality: Option<String>,
}

impl ColumnMap {
    /// Default columns for a locality field.
    pub fn for_locality(field: LocalityField) -> Self {
        let (finance_locality, procurement_locality) = match field {
            LocalityField::Country => (Some("iso_country_y"), Some("country_iso2")),
            LocalityField::City => (Some("location_city"), Some("city")),
            LocalityField::Anywhere => (None, None),
        };

        Self {
            finance_name: "entity_name".to_string(),
            finance_locality: finance_locality.map(String::from),
            procurement_name: "name".to_string(),
            procurement_locality: procurement_locality.map(String::from),
        }
    }

    /// Replace defaults with any explicitly given columns.
    pub fn with_overrides(
        mut self,
        finance_name: Option<String>,
        finance_locality: Option<String>,
        procurement_name: Option<String>,
        procurement_locality: Option<String>,
    ) -> Self {
        if let Some(c) = finance_name {
            self.finance_name = c;
        }
        if finance_locality.is_some() {
            self.finance_locality = finance_locality;
        }
        if let Some(c) = procurement_name {
            self.procurement_name = c;
        }
        if procurement_locality.is_some() {
            self.procurement_locality = procurement_locality;
        }
        self
    }
}
