//! Tabular masking and deanonymization driver
//!
//! Applies the engine column-wise over JSON object rows. Bound columns
//! absent from the input and categories without a pool are skipped with
//! a warning, never an error; null and nested cells always pass through
//! unchanged.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::core::engine::Pseudonymizer;
use crate::core::store::MappingStore;
use crate::domain::binding::ColumnBindings;
use crate::domain::category::EntityCategory;
use crate::domain::result::Result;
use crate::domain::table::{cell_text, resolve_column};

/// Replaces bound cells with fakes, accumulating mappings in the engine
///
/// Cells are matched by their canonical string rendering, so a numeric
/// phone column masks the same way as its string form. Generation
/// failures (an exhausted pool, a missing pool hit at mint time) abort
/// the run; the caller persists the artifact only after success.
pub fn anonymize_table(
    engine: &mut Pseudonymizer,
    rows: &[Value],
    bindings: &ColumnBindings,
) -> Result<Vec<Value>> {
    let active = effective_bindings(engine, rows, bindings);

    let mut masked_cells = 0usize;
    let mut output = Vec::with_capacity(rows.len());
    for row in rows {
        let mut row = row.clone();
        if let Some(object) = row.as_object_mut() {
            for (column, category) in &active {
                let key = match resolve_column(object, column) {
                    Some(key) => key,
                    None => continue,
                };
                let text = match cell_text(&object[&key]) {
                    Some(text) => text,
                    None => continue,
                };
                let fake = engine.ensure(*category, &text)?;
                object.insert(key, Value::String(fake));
                masked_cells += 1;
            }
        }
        output.push(row);
    }

    info!(
        rows = rows.len(),
        columns = active.len(),
        cells = masked_cells,
        "Anonymized table"
    );
    Ok(output)
}

/// Restores originals from the backward tables
///
/// A cell with no backward entry is left unchanged; restoring can never
/// fail, only fall short.
pub fn deanonymize_table(
    store: &MappingStore,
    rows: &[Value],
    bindings: &ColumnBindings,
) -> Vec<Value> {
    let mut restored_cells = 0usize;
    let mut output = Vec::with_capacity(rows.len());
    for row in rows {
        let mut row = row.clone();
        if let Some(object) = row.as_object_mut() {
            for (column, category) in bindings.iter() {
                let key = match resolve_column(object, column) {
                    Some(key) => key,
                    None => continue,
                };
                let text = match cell_text(&object[&key]) {
                    Some(text) => text,
                    None => continue,
                };
                if let Some(original) = store.lookup_backward(category, &text) {
                    let original = original.to_string();
                    object.insert(key, Value::String(original));
                    restored_cells += 1;
                }
            }
        }
        output.push(row);
    }

    debug!(rows = rows.len(), cells = restored_cells, "Deanonymized table");
    output
}

/// Filters bindings down to columns that exist and categories that can mint
fn effective_bindings(
    engine: &Pseudonymizer,
    rows: &[Value],
    bindings: &ColumnBindings,
) -> Vec<(String, EntityCategory)> {
    let mut active = Vec::new();
    for (column, category) in bindings.iter() {
        let present = rows.iter().any(|row| {
            row.as_object()
                .map_or(false, |object| resolve_column(object, column).is_some())
        });
        if !present {
            warn!(column = %column, "Column not found in input, skipping");
            continue;
        }
        if !engine.has_pool(category) {
            warn!(
                column = %column,
                category = %category,
                "No fake value pool for category, skipping column"
            );
            continue;
        }
        active.push((column.to_string(), category));
    }
    active
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generator::{FakeValueGenerator, GeneratorSettings};
    use crate::core::pool::FakeValuePool;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn engine() -> Pseudonymizer {
        let mut pools = BTreeMap::new();
        pools.insert(
            EntityCategory::Company,
            FakeValuePool::new(vec![
                "Hayes Group".to_string(),
                "Ortiz LLC".to_string(),
                "Slone Inc".to_string(),
            ]),
        );
        pools.insert(
            EntityCategory::Phone,
            FakeValuePool::new(vec!["555-0100".to_string(), "555-0199".to_string()]),
        );
        let generator = FakeValueGenerator::new(pools, GeneratorSettings::default(), Some(5));
        Pseudonymizer::new(generator)
    }

    fn bindings() -> ColumnBindings {
        ColumnBindings::from_pairs(vec![
            ("name".to_string(), EntityCategory::Company),
            ("phone".to_string(), EntityCategory::Phone),
        ])
        .unwrap()
    }

    #[test]
    fn test_anonymize_replaces_bound_cells_consistently() {
        let mut engine = engine();
        let rows = vec![
            json!({"name": "infosys", "industry": "it"}),
            json!({"name": "wipro", "industry": "it"}),
            json!({"name": "infosys", "industry": "consulting"}),
        ];

        let masked = anonymize_table(&mut engine, &rows, &bindings()).unwrap();

        // repeated original gets the same fake
        assert_eq!(masked[0]["name"], masked[2]["name"]);
        assert_ne!(masked[0]["name"], masked[1]["name"]);
        assert_ne!(masked[0]["name"], json!("infosys"));
        // unbound columns untouched
        assert_eq!(masked[0]["industry"], "it");
    }

    #[test]
    fn test_anonymize_skips_null_cells() {
        let mut engine = engine();
        let rows = vec![json!({"name": null}), json!({"name": "infosys"})];

        let masked = anonymize_table(&mut engine, &rows, &bindings()).unwrap();
        assert_eq!(masked[0]["name"], Value::Null);
        assert_ne!(masked[1]["name"], json!("infosys"));
    }

    #[test]
    fn test_anonymize_matches_columns_case_insensitively() {
        let mut engine = engine();
        let rows = vec![json!({"Name": "infosys"})];

        let masked = anonymize_table(&mut engine, &rows, &bindings()).unwrap();
        assert_ne!(masked[0]["Name"], json!("infosys"));
        // the key keeps its original spelling
        assert!(masked[0].get("Name").is_some());
    }

    #[test]
    fn test_anonymize_renders_numeric_cells_as_strings() {
        let mut engine = engine();
        let rows = vec![json!({"phone": 5550123_u64})];

        let masked = anonymize_table(&mut engine, &rows, &bindings()).unwrap();
        assert!(masked[0]["phone"].is_string());
        assert_eq!(
            engine
                .store()
                .lookup_forward(EntityCategory::Phone, "5550123"),
            masked[0]["phone"].as_str()
        );
    }

    #[test]
    fn test_missing_column_is_skipped_not_fatal() {
        let mut engine = engine();
        let rows = vec![json!({"industry": "it"})];

        let masked = anonymize_table(&mut engine, &rows, &bindings()).unwrap();
        assert_eq!(masked, rows);
        assert!(engine.store().is_empty());
    }

    #[test]
    fn test_unpooled_category_is_skipped_not_fatal() {
        let mut engine = engine(); // no Email pool configured
        let bindings = ColumnBindings::from_pairs(vec![
            ("name".to_string(), EntityCategory::Company),
            ("email".to_string(), EntityCategory::Email),
        ])
        .unwrap();
        let rows = vec![json!({"name": "infosys", "email": "x@infosys.com"})];

        let masked = anonymize_table(&mut engine, &rows, &bindings).unwrap();
        assert_ne!(masked[0]["name"], json!("infosys"));
        assert_eq!(masked[0]["email"], "x@infosys.com");
    }

    #[test]
    fn test_non_object_rows_pass_through() {
        let mut engine = engine();
        let rows = vec![json!("not a row"), json!({"name": "infosys"})];

        let masked = anonymize_table(&mut engine, &rows, &bindings()).unwrap();
        assert_eq!(masked[0], json!("not a row"));
        assert_ne!(masked[1]["name"], json!("infosys"));
    }

    #[test]
    fn test_deanonymize_restores_originals() {
        let mut engine = engine();
        let rows = vec![
            json!({"name": "infosys", "phone": "030-555-0101"}),
            json!({"name": "wipro", "phone": null}),
        ];
        let masked = anonymize_table(&mut engine, &rows, &bindings()).unwrap();
        let store = engine.into_store();

        let restored = deanonymize_table(&store, &masked, &bindings());
        assert_eq!(restored, rows);
    }

    #[test]
    fn test_deanonymize_miss_leaves_cell_unchanged() {
        let store = MappingStore::new();
        let rows = vec![json!({"name": "Unknown Corp"})];

        let restored = deanonymize_table(&store, &rows, &bindings());
        assert_eq!(restored, rows);
    }

    #[test]
    fn test_numeric_round_trip_restores_string_rendering() {
        let mut engine = engine();
        let rows = vec![json!({"phone": 5550123_u64})];
        let masked = anonymize_table(&mut engine, &rows, &bindings()).unwrap();
        let store = engine.into_store();

        let restored = deanonymize_table(&store, &masked, &bindings());
        // masking rendered the number, so the restored cell is its string form
        assert_eq!(restored[0]["phone"], json!("5550123"));
    }
}
