//! CLI command implementations
//!
//! This module contains all CLI command implementations, plus the row and
//! text file helpers they share.

pub mod anonymize;
pub mod deanonymize;
pub mod init;
pub mod inspect;
pub mod mask;
pub mod unmask;
pub mod validate;

use std::io::Read;

use serde_json::Value;

use crate::domain::errors::CloakError;
use crate::domain::result::Result;

/// On-disk layout of a row file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFormat {
    /// One JSON array of row objects
    JsonArray,
    /// One JSON object per line
    NdJson,
}

/// Reads rows from a JSON array or NDJSON file, detecting the layout
///
/// Detection looks at the first non-whitespace byte: `[` means a JSON
/// array, anything else is treated as NDJSON. The detected format is
/// returned so the output can be written the same way.
pub(crate) fn read_rows(path: &str) -> Result<(Vec<Value>, RowFormat)> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| CloakError::Io(format!("Failed to read input file {path}: {e}")))?;
    parse_rows(&contents)
}

fn parse_rows(contents: &str) -> Result<(Vec<Value>, RowFormat)> {
    if contents.trim_start().starts_with('[') {
        let rows: Vec<Value> = serde_json::from_str(contents)?;
        return Ok((rows, RowFormat::JsonArray));
    }

    let mut rows = Vec::new();
    for (number, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row: Value = serde_json::from_str(line).map_err(|e| {
            CloakError::Serialization(format!("Invalid JSON on line {}: {e}", number + 1))
        })?;
        rows.push(row);
    }
    Ok((rows, RowFormat::NdJson))
}

/// Writes rows in the given format, creating parent directories
pub(crate) fn write_rows(path: &str, rows: &[Value], format: RowFormat) -> Result<()> {
    let contents = match format {
        RowFormat::JsonArray => serde_json::to_string_pretty(rows)?,
        RowFormat::NdJson => {
            let mut lines = String::new();
            for row in rows {
                lines.push_str(&serde_json::to_string(row)?);
                lines.push('\n');
            }
            lines
        }
    };

    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CloakError::Io(format!("Failed to create {}: {e}", parent.display())))?;
        }
    }
    std::fs::write(path, contents)
        .map_err(|e| CloakError::Io(format!("Failed to write output file {path}: {e}")))?;
    Ok(())
}

/// Reads text from a file, or from stdin when no path is given
pub(crate) fn read_text(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| CloakError::Io(format!("Failed to read input file {path}: {e}"))),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| CloakError::Io(format!("Failed to read stdin: {e}")))?;
            Ok(buffer)
        }
    }
}

/// Parses a `column=category` override list into configuration entries
///
/// The CLI accepts `--bind "vendor=company,city=location"`; each pair is
/// folded into the `[columns]` section before validation, overriding any
/// file-configured binding for the same column.
pub(crate) fn parse_bind_overrides(spec: &str) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    for entry in spec.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        match entry.split_once('=') {
            Some((column, category)) if !column.trim().is_empty() => {
                pairs.push((column.trim().to_string(), category.trim().to_string()));
            }
            _ => {
                return Err(CloakError::Configuration(format!(
                    "Invalid binding override '{entry}'. Expected column=category"
                )));
            }
        }
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_rows_json_array() {
        let (rows, format) = parse_rows(r#"[{"name": "ibm"}, {"name": "wipro"}]"#).unwrap();
        assert_eq!(format, RowFormat::JsonArray);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], "ibm");
    }

    #[test]
    fn test_parse_rows_ndjson() {
        let contents = "{\"name\": \"ibm\"}\n\n{\"name\": \"wipro\"}\n";
        let (rows, format) = parse_rows(contents).unwrap();
        assert_eq!(format, RowFormat::NdJson);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["name"], "wipro");
    }

    #[test]
    fn test_parse_rows_reports_bad_line() {
        let contents = "{\"name\": \"ibm\"}\nnot json\n";
        let result = parse_rows(contents);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("line 2"));
    }

    #[test]
    fn test_row_file_round_trip() {
        let mut input = NamedTempFile::new().unwrap();
        input
            .write_all(b"{\"name\": \"ibm\"}\n{\"name\": \"wipro\"}\n")
            .unwrap();
        input.flush().unwrap();

        let (rows, format) = read_rows(input.path().to_str().unwrap()).unwrap();
        assert_eq!(format, RowFormat::NdJson);

        let dir = tempfile::tempdir().unwrap();
        let out_path = dir.path().join("out.ndjson");
        write_rows(out_path.to_str().unwrap(), &rows, format).unwrap();

        let (reread, _) = read_rows(out_path.to_str().unwrap()).unwrap();
        assert_eq!(reread, rows);
    }

    #[test]
    fn test_write_rows_json_array_is_pretty() {
        let dir = tempfile::tempdir().unwrap();
        let out_path = dir.path().join("out.json");
        let rows = vec![json!({"name": "ibm"})];

        write_rows(out_path.to_str().unwrap(), &rows, RowFormat::JsonArray).unwrap();
        let written = std::fs::read_to_string(&out_path).unwrap();
        assert!(written.starts_with('['));
        assert!(written.contains('\n'));
    }

    #[test]
    fn test_parse_bind_overrides() {
        let pairs = parse_bind_overrides("vendor=company, city = location").unwrap();
        assert_eq!(
            pairs,
            vec![
                ("vendor".to_string(), "company".to_string()),
                ("city".to_string(), "location".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_bind_overrides_rejects_bare_column() {
        let result = parse_bind_overrides("vendor");
        assert!(result.is_err());
    }
}
