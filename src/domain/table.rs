//! Tabular data model
//!
//! Tables are sequences of JSON object rows. Cells are plain JSON values,
//! so the same rows round-trip through files, APIs, and the engine without
//! a bespoke record type.

use serde_json::Value;

/// A single table row: column name to cell value
pub type Row = serde_json::Map<String, Value>;

/// Resolves a bound column name against a row's actual keys, ignoring case
///
/// Returns the key as spelled in the row so the caller can index the row
/// directly. Rows with two keys differing only in case resolve to the
/// first match.
pub fn resolve_column(row: &Row, column: &str) -> Option<String> {
    row.keys()
        .find(|key| key.eq_ignore_ascii_case(column))
        .cloned()
}

/// Renders a scalar cell to the text the engine operates on
///
/// Strings pass through, numbers and booleans are rendered in their JSON
/// form. Nulls and nested structures return `None` and are left untouched
/// by every operation.
pub fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        let mut row = Row::new();
        row.insert("Company".to_string(), value);
        row
    }

    #[test]
    fn test_resolve_column_ignores_case() {
        let row = row(json!("Infosys"));
        assert_eq!(resolve_column(&row, "company"), Some("Company".to_string()));
        assert_eq!(resolve_column(&row, "COMPANY"), Some("Company".to_string()));
        assert_eq!(resolve_column(&row, "phone"), None);
    }

    #[test]
    fn test_cell_text_for_scalars() {
        assert_eq!(cell_text(&json!("Infosys")), Some("Infosys".to_string()));
        assert_eq!(cell_text(&json!(42)), Some("42".to_string()));
        assert_eq!(cell_text(&json!(true)), Some("true".to_string()));
    }

    #[test]
    fn test_cell_text_skips_null_and_nested() {
        assert_eq!(cell_text(&Value::Null), None);
        assert_eq!(cell_text(&json!([1, 2])), None);
        assert_eq!(cell_text(&json!({"nested": 1})), None);
    }
}
