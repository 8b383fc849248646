//! Batch validation against the feature schema

use crate::schema::FeatureSchema;
use crate::types::{effective_columns, RawRow};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Columns the schema requires but the batch lacks, plus columns the batch
/// carries that the schema does not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("missing columns: {missing:?} (extra: {extra:?})")]
pub struct SchemaMismatch {
    /// Required columns absent from every row, in schema order
    pub missing: Vec<String>,

    /// Unknown columns, in first-seen order
    pub extra: Vec<String>,
}

/// Check a batch's effective column set against the schema.
///
/// Presence is decided over the whole batch: a column counts as present if any
/// row supplies it. The batch is rejected only when required columns are
/// missing; extra columns alone never fail validation. An empty schema accepts
/// every batch.
pub fn validate(rows: &[RawRow], schema: &FeatureSchema) -> Result<(), SchemaMismatch> {
    let names = schema.names();
    if names.is_empty() {
        return Ok(());
    }

    let present = effective_columns(rows);
    let present_set: HashSet<&str> = present.iter().map(String::as_str).collect();
    let missing: Vec<String> = names
        .iter()
        .filter(|name| !present_set.contains(name.as_str()))
        .cloned()
        .collect();

    if missing.is_empty() {
        debug!("Batch covers all {} schema columns", names.len());
        return Ok(());
    }

    let known: HashSet<&str> = names.iter().map(String::as_str).collect();
    let extra: Vec<String> = present
        .iter()
        .filter(|column| !known.contains(column.as_str()))
        .cloned()
        .collect();

    Err(SchemaMismatch { missing, extra })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Map, Value};
    use std::collections::BTreeSet;

    fn schema(names: &[&str]) -> FeatureSchema {
        FeatureSchema::new(
            Some(names.iter().map(|s| s.to_string()).collect()),
            Map::new(),
        )
        .unwrap()
    }

    fn rows(value: Value) -> Vec<RawRow> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r.as_object().cloned().unwrap())
            .collect()
    }

    #[test]
    fn test_missing_column_rejected() {
        let result = validate(&rows(json!([{"city": "x"}])), &schema(&["age", "city"]));
        assert_eq!(
            result,
            Err(SchemaMismatch {
                missing: vec!["age".into()],
                extra: vec![],
            })
        );
    }

    #[test]
    fn test_extra_reported_with_missing() {
        let result = validate(
            &rows(json!([{"zip": 1, "city": "x", "note": "n"}])),
            &schema(&["age", "city", "income"]),
        );
        let mismatch = result.unwrap_err();
        assert_eq!(mismatch.missing, vec!["age", "income"]);
        assert_eq!(mismatch.extra, vec!["zip", "note"]);
    }

    #[test]
    fn test_extra_alone_tolerated() {
        let result = validate(
            &rows(json!([{"age": 1, "city": "x", "zip": 2}])),
            &schema(&["age", "city"]),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_sparse_rows_pass_batch_wide() {
        let result = validate(
            &rows(json!([{"age": 1}, {"city": "x"}])),
            &schema(&["age", "city"]),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_empty_schema_accepts_anything() {
        let result = validate(&rows(json!([{"whatever": 1}])), &FeatureSchema::default());
        assert!(result.is_ok());
    }

    #[test]
    fn test_many_distinct_keys_validate_quickly() {
        let n = 100_000;
        let batch: Vec<RawRow> = vec![(0..n).map(|i| (format!("k{i}"), json!(i))).collect()];

        let start = std::time::Instant::now();
        let mismatch = validate(&batch, &schema(&["age"])).unwrap_err();
        assert!(start.elapsed() < std::time::Duration::from_secs(5));

        assert_eq!(mismatch.missing, vec!["age"]);
        assert_eq!(mismatch.extra.len(), n);
        assert_eq!(mismatch.extra[0], "k0");
        assert_eq!(mismatch.extra[n - 1], format!("k{}", n - 1));

        let start = std::time::Instant::now();
        let frame = crate::coerce::coerce(&batch, &FeatureSchema::default()).unwrap();
        assert!(start.elapsed() < std::time::Duration::from_secs(5));
        assert_eq!(frame.columns().len(), n);
    }

    fn column_name() -> impl Strategy<Value = String> {
        "[a-f]{1,2}"
    }

    proptest! {
        #[test]
        fn prop_missing_and_extra_are_set_differences(
            names in prop::collection::btree_set(column_name(), 1..6),
            batch in prop::collection::vec(prop::collection::btree_set(column_name(), 0..6), 1..5),
        ) {
            let names: Vec<String> = names.into_iter().collect();
            let schema = FeatureSchema::new(Some(names.clone()), Map::new()).unwrap();
            let rows: Vec<RawRow> = batch
                .iter()
                .map(|keys| keys.iter().map(|k| (k.clone(), json!(1))).collect())
                .collect();

            let present: BTreeSet<String> = batch.iter().flatten().cloned().collect();
            let expected_missing: BTreeSet<String> = names
                .iter()
                .filter(|n| !present.contains(*n))
                .cloned()
                .collect();
            let expected_extra: BTreeSet<String> = present
                .iter()
                .filter(|c| !names.contains(c))
                .cloned()
                .collect();

            match validate(&rows, &schema) {
                Ok(()) => prop_assert!(expected_missing.is_empty()),
                Err(mismatch) => {
                    prop_assert!(!expected_missing.is_empty());
                    let missing: BTreeSet<String> = mismatch.missing.into_iter().collect();
                    let extra: BTreeSet<String> = mismatch.extra.into_iter().collect();
                    prop_assert_eq!(missing, expected_missing);
                    prop_assert_eq!(extra, expected_extra);
                }
            }
        }
    }
}
