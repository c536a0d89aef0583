//! Full outer join of two tables on a shared key column.

use std::collections::{BTreeSet, HashMap, HashSet};

use super::Table;
use crate::error::{Result, TableError};

/// Suffix for overlapping non-key columns from the left table.
pub const LEFT_SUFFIX: &str = "_x";
/// Suffix for overlapping non-key columns from the right table.
pub const RIGHT_SUFFIX: &str = "_y";

/// Full outer join on `key`.
///
/// - Output columns: left columns in order, then right columns without the key.
/// - Non-key columns present on both sides get `_x` / `_y` suffixes.
/// - Keys repeated on both sides produce the cross product of their rows.
/// - Rows are ordered by key; within a key, left order then right order.
/// - Rows with no partner keep empty cells for the other side.
pub fn outer_join(left: &Table, right: &Table, key: &str) -> Result<Table> {
    let left_key = left.column_index(key)?;
    let right_key = right.column_index(key)?;
    let name = format!("{}+{}", left.name(), right.name());

    let headers = joined_headers(left, right, key, &name)?;

    let left_rows = rows_by_key(left, left_key);
    let right_rows = rows_by_key(right, right_key);

    let keys: BTreeSet<&str> = left_rows.keys().chain(right_rows.keys()).copied().collect();

    let left_width = left.headers().len();
    let right_width = right.headers().len() - 1;
    let mut rows = Vec::with_capacity(left.len().max(right.len()));

    for k in keys {
        let lefts = left_rows.get(k).map(Vec::as_slice).unwrap_or_default();
        let rights = right_rows.get(k).map(Vec::as_slice).unwrap_or_default();

        match (lefts.is_empty(), rights.is_empty()) {
            (false, false) => {
                for &l in lefts {
                    for &r in rights {
                        let mut row = left.rows()[l].clone();
                        row.extend(without_key(&right.rows()[r], right_key));
                        rows.push(row);
                    }
                }
            }
            (false, true) => {
                for &l in lefts {
                    let mut row = left.rows()[l].clone();
                    row.resize(left_width + right_width, String::new());
                    rows.push(row);
                }
            }
            (true, false) => {
                for &r in rights {
                    let mut row = vec![String::new(); left_width];
                    row[left_key] = k.to_string();
                    row.extend(without_key(&right.rows()[r], right_key));
                    rows.push(row);
                }
            }
            (true, true) => {}
        }
    }

    tracing::debug!(
        "Joined {} ({} rows) with {} ({} rows) on '{}': {} rows",
        left.name(),
        left.len(),
        right.name(),
        right.len(),
        key,
        rows.len()
    );

    Ok(Table::new(name, headers, rows))
}

/// Join several tables left to right on the same key.
pub fn outer_join_all(tables: &[Table], key: &str) -> Result<Option<Table>> {
    let mut iter = tables.iter();
    let Some(first) = iter.next() else {
        return Ok(None);
    };

    let mut joined = first.clone();
    for table in iter {
        joined = outer_join(&joined, table, key)?;
    }
    Ok(Some(joined))
}

fn joined_headers(left: &Table, right: &Table, key: &str, name: &str) -> Result<Vec<String>> {
    let left_names: HashSet<&str> = left.headers().iter().map(String::as_str).collect();
    let right_names: HashSet<&str> = right.headers().iter().map(String::as_str).collect();

    let suffixed = |column: &str, other: &HashSet<&str>, suffix: &str| {
        if column != key && other.contains(column) {
            format!("{column}{suffix}")
        } else {
            column.to_string()
        }
    };

    let mut headers: Vec<String> = left
        .headers()
        .iter()
        .map(|h| suffixed(h, &right_names, LEFT_SUFFIX))
        .collect();
    headers.extend(
        right
            .headers()
            .iter()
            .filter(|h| h.as_str() != key)
            .map(|h| suffixed(h, &left_names, RIGHT_SUFFIX)),
    );

    let mut seen = HashSet::new();
    for h in &headers {
        if !seen.insert(h.as_str()) {
            return Err(TableError::DuplicateColumn {
                table: name.to_string(),
                column: h.clone(),
            });
        }
    }

    Ok(headers)
}

fn rows_by_key(table: &Table, key_idx: usize) -> HashMap<&str, Vec<usize>> {
    let mut map: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, row) in table.rows().iter().enumerate() {
        map.entry(row[key_idx].as_str()).or_default().push(i);
    }
    map
}

fn without_key(row: &[String], key_idx: usize) -> impl Iterator<Item = String> + '_ {
    row.iter()
        .enumerate()
        .filter(move |(i, _)| *i != key_idx)
        .map(|(_, v)| v.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str, headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            name,
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_outer_join_keeps_unmatched_rows_from_both_sides() {
        let structure = table("structure", &["id", "entity_name"], &[&["e2", "Beta"], &["e1", "Acme"]]);
        let address = table("address", &["id", "city"], &[&["e1", "Boston"], &["e3", "Paris"]]);

        let joined = outer_join(&structure, &address, "id").unwrap();

        assert_eq!(joined.headers(), &["id", "entity_name", "city"]);
        assert_eq!(
            joined.rows(),
            &[
                vec!["e1".to_string(), "Acme".into(), "Boston".into()],
                vec!["e2".to_string(), "Beta".into(), String::new()],
                vec!["e3".to_string(), String::new(), "Paris".into()],
            ]
        );
    }

    #[test]
    fn test_overlapping_columns_get_suffixes() {
        let structure = table("structure", &["id", "iso_country"], &[&["e1", "US"]]);
        let address = table("address", &["id", "iso_country"], &[&["e1", "CA"]]);

        let joined = outer_join(&structure, &address, "id").unwrap();

        assert_eq!(joined.headers(), &["id", "iso_country_x", "iso_country_y"]);
        assert_eq!(joined.cell(0, "iso_country_y").unwrap(), Some("CA"));
    }

    #[test]
    fn test_repeated_keys_produce_cross_product() {
        let left = table("l", &["id", "a"], &[&["k", "1"], &["k", "2"]]);
        let right = table("r", &["id", "b"], &[&["k", "x"], &["k", "y"]]);

        let joined = outer_join(&left, &right, "id").unwrap();

        let pairs: Vec<(String, String)> = joined
            .rows()
            .iter()
            .map(|r| (r[1].clone(), r[2].clone()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("1".into(), "x".into()),
                ("1".into(), "y".into()),
                ("2".into(), "x".into()),
                ("2".into(), "y".into()),
            ]
        );
    }

    #[test]
    fn test_missing_key_column_is_fatal() {
        let left = table("geo", &["geo_id", "city"], &[]);
        let right = table("vendor", &["vendor_id", "name"], &[]);

        let err = outer_join(&left, &right, "geo_id").unwrap_err();
        assert_eq!(err.to_string(), "table 'vendor': missing column 'geo_id'");
    }

    #[test]
    fn test_suffix_collision_is_rejected() {
        let left = table("l", &["id", "city", "city_x"], &[]);
        let right = table("r", &["id", "city"], &[]);

        let err = outer_join(&left, &right, "id").unwrap_err();
        assert!(matches!(err, TableError::DuplicateColumn { .. }));
    }

    #[test]
    fn test_outer_join_all_chains_left_to_right() {
        let a = table("a", &["id", "name"], &[&["1", "Acme"]]);
        let b = table("b", &["id", "city"], &[&["1", "Boston"]]);
        let c = table("c", &["id", "iso"], &[&["2", "FR"]]);

        let joined = outer_join_all(&[a, b, c], "id").unwrap().unwrap();

        assert_eq!(joined.headers(), &["id", "name", "city", "iso"]);
        assert_eq!(joined.len(), 2);
        assert_eq!(joined.cell(1, "iso").unwrap(), Some("FR"));
        assert!(outer_join_all(&[], "id").unwrap().is_none());
    }
}
