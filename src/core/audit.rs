//! Audit trail for anonymization runs

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use crate::core::store::{MappingStore, RunMetadata};
use crate::domain::errors::CloakError;
use crate::domain::result::Result;

/// Audit record for one anonymization run
#[derive(Debug, Serialize)]
struct AuditRecord {
    run_id: String,
    timestamp: String,
    total_assignments: usize,
    categories: Vec<CategoryRecord>,
}

/// Per-category audit entry (with hashed originals)
#[derive(Debug, Serialize)]
struct CategoryRecord {
    category: String,
    assignments: usize,
    /// SHA-256 over the category's originals (never log plaintext values)
    originals_digest: String,
}

/// Appends one JSON-lines record per anonymization run
pub struct AuditLogger {
    log_path: PathBuf,
    enabled: bool,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(log_path: PathBuf, enabled: bool) -> Result<Self> {
        if enabled {
            // Ensure parent directory exists
            if let Some(parent) = log_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|err| {
                        CloakError::Audit(format!(
                            "Failed to create audit log directory {}: {err}",
                            parent.display()
                        ))
                    })?;
                }
            }
        }

        Ok(Self { log_path, enabled })
    }

    /// Record a completed anonymization run
    pub fn record_run(&self, metadata: &RunMetadata, store: &MappingStore) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let categories = metadata
            .categories_touched
            .iter()
            .map(|category| CategoryRecord {
                category: category.to_string(),
                assignments: store.count(*category),
                originals_digest: digest_originals(store, *category),
            })
            .collect();

        let record = AuditRecord {
            run_id: metadata.run_id.to_string(),
            timestamp: metadata.timestamp.to_rfc3339(),
            total_assignments: store.total_entries(),
            categories,
        };

        self.write_record(&record)
    }

    /// Write an audit record to the log file
    fn write_record(&self, record: &AuditRecord) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|err| {
                CloakError::Audit(format!(
                    "Failed to open audit log {}: {err}",
                    self.log_path.display()
                ))
            })?;

        let json_line = serde_json::to_string(record)
            .map_err(|err| CloakError::Audit(format!("Failed to serialize audit record: {err}")))?;
        writeln!(file, "{json_line}")
            .map_err(|err| CloakError::Audit(format!("Failed to write audit record: {err}")))?;

        Ok(())
    }
}

/// SHA-256 over the newline-joined originals of one category
///
/// The underlying table iterates in sorted order, so the digest is stable
/// for a given set of originals regardless of insertion order.
fn digest_originals(store: &MappingStore, category: crate::domain::EntityCategory) -> String {
    let mut hasher = Sha256::new();
    if let Some(table) = store.forward_table(category) {
        for original in table.keys() {
            hasher.update(original.as_bytes());
            hasher.update(b"\n");
        }
    }
    let result = hasher.finalize();
    format!("{result:x}")
}
