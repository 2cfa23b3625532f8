//! Integration tests for SQL literal masking and unmasking

use cloak::core::engine::Pseudonymizer;
use cloak::core::generator::{FakeValueGenerator, GeneratorSettings};
use cloak::core::pool;
use cloak::core::sql::SqlSubstituter;
use cloak::core::store::MappingStore;
use cloak::core::tabular;
use cloak::domain::{ColumnBindings, EntityCategory};
use serde_json::json;
use test_case::test_case;

/// Store with fixed assignments for exact output assertions
fn fixture_store() -> MappingStore {
    let mut store = MappingStore::new();
    store
        .record(EntityCategory::Company, "Initech", "Hayes Group")
        .unwrap();
    store
        .record(EntityCategory::Email, "ap@initech.example", "kara11@example.net")
        .unwrap();
    store
        .record(EntityCategory::Url, "initech.example", "hayes.kim.co")
        .unwrap();
    store
}

#[test]
fn test_masks_literals_across_a_script() {
    let store = fixture_store();
    let sql = SqlSubstituter::new(&store);

    let script = "\
-- vendor cleanup for Initech
SELECT * FROM deals WHERE vendor = 'Initech';
UPDATE contacts SET email = 'ap@initech.example' WHERE vendor = 'Initech';
DELETE FROM visits WHERE host = \"initech.example\";";

    let masked = sql.mask(script).unwrap();

    // literals rewritten, everything else byte-identical
    assert_eq!(
        masked,
        "\
-- vendor cleanup for Initech
SELECT * FROM deals WHERE vendor = 'Hayes Group';
UPDATE contacts SET email = 'kara11@example.net' WHERE vendor = 'Hayes Group';
DELETE FROM visits WHERE host = \"hayes.kim.co\";"
    );
}

#[test_case(
    "WHERE vendor = 'Initech'",
    "WHERE vendor = 'Hayes Group'" ;
    "single quoted"
)]
#[test_case(
    "WHERE vendor = \"Initech\"",
    "WHERE vendor = \"Hayes Group\"" ;
    "double quoted"
)]
#[test_case(
    "WHERE vendor = Initech",
    "WHERE vendor = Hayes Group" ;
    "bare value"
)]
fn quote_style_is_preserved(statement: &str, expected: &str) {
    let store = fixture_store();
    let sql = SqlSubstituter::new(&store);
    assert_eq!(sql.mask(statement).unwrap(), expected);
}

#[test]
fn test_unmask_restores_exact_statement() {
    let store = fixture_store();
    let sql = SqlSubstituter::new(&store);

    let statement =
        "SELECT id FROM deals WHERE vendor = 'Initech' AND email = 'ap@initech.example'";
    let masked = sql.mask(statement).unwrap();
    assert_ne!(masked, statement);
    assert_eq!(sql.unmask(&masked).unwrap(), statement);
}

#[test]
fn test_identifiers_and_keywords_survive() {
    let store = fixture_store();
    let sql = SqlSubstituter::new(&store);

    // table and column names are not mapped values, so they pass through
    let masked = sql
        .mask("SELECT vendor, email FROM deals WHERE vendor = 'Initech'")
        .unwrap();
    assert!(masked.starts_with("SELECT vendor, email FROM deals WHERE vendor = "));
    assert!(masked.ends_with("'Hayes Group'"));
}

#[test]
fn test_comment_content_is_never_masked() {
    let store = fixture_store();
    let sql = SqlSubstituter::new(&store);

    let masked = sql
        .mask("SELECT 1 -- belongs to Initech\n/* Initech audit */")
        .unwrap();
    assert_eq!(masked, "SELECT 1 -- belongs to Initech\n/* Initech audit */");
}

#[test]
fn test_escaped_quote_literal_passes_untouched() {
    let store = fixture_store();
    let sql = SqlSubstituter::new(&store);

    let statement = "WHERE name = 'O''Brien'";
    assert_eq!(sql.mask(statement).unwrap(), statement);
}

#[test]
fn test_sql_masking_agrees_with_row_masking() {
    let pools = pool::default_pools(100, Some(17));
    let generator = FakeValueGenerator::new(pools, GeneratorSettings::default(), Some(17));
    let mut engine = Pseudonymizer::new(generator);

    let bindings =
        ColumnBindings::from_pairs(vec![("vendor".to_string(), EntityCategory::Company)]).unwrap();
    let rows = vec![json!({"vendor": "Initech"})];
    let masked_rows = tabular::anonymize_table(&mut engine, &rows, &bindings).unwrap();
    let fake = masked_rows[0]["vendor"].as_str().unwrap();

    // the same artifact masks a query the same way it masked the table
    let store = engine.into_store();
    let sql = SqlSubstituter::new(&store);
    let masked = sql.mask("SELECT * FROM deals WHERE vendor = 'Initech'").unwrap();
    assert_eq!(masked, format!("SELECT * FROM deals WHERE vendor = '{fake}'"));
}
