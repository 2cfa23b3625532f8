//! Entity classifier adapters
//!
//! Classifiers assign an [`EntityCategory`] to a table column by looking
//! at a sample of its values. Two implementations are provided behind the
//! [`EntityClassifier`] trait:
//!
//! - [`patterns::PatternClassifier`] - offline heuristic backed by a
//!   regex pattern registry
//! - [`remote::RemoteClassifier`] - NER inference service reached over
//!   HTTP
//!
//! Both apply the same majority rule: a column is bound to the most
//! frequent label only when that label was seen at least `min_matches`
//! times across the sample. Columns whose names look like opaque
//! identifiers, dates, or free-form descriptions are never submitted.

pub mod patterns;
pub mod remote;

use std::collections::HashMap;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ClassifierConfig;
use crate::domain::binding::ColumnBindings;
use crate::domain::category::EntityCategory;
use crate::domain::errors::CloakError;
use crate::domain::result::Result;
use crate::domain::table::{cell_text, resolve_column};

pub use patterns::{PatternClassifier, PatternRegistry};
pub use remote::RemoteClassifier;

/// Column name fragments that mark a column as free-form prose
///
/// Prose columns hold sentences rather than repeated entity values, so a
/// value sample from them is noise to every classifier backend.
const DESCRIPTIVE_COLUMN_HINTS: &[&str] = &[
    "description",
    "remarks",
    "notes",
    "comments",
    "observations",
    "details",
    "summary",
    "explanation",
    "reviews",
    "feedback",
    "testimonials",
    "opinions",
    "assessment",
    "suggestions",
    "experience",
    "status",
    "incident_report",
    "case_notes",
    "audit_notes",
    "findings",
    "status_update",
    "history",
    "progress_report",
    "additional_info",
    "clarifications",
    "justification",
    "annotations",
    "excerpts",
    "statement",
    "explanation_text",
    "reason",
];

/// Trait for entity classifier implementations
///
/// A classifier inspects up to `sample_size` values drawn from one column
/// and answers with the category the column most likely holds, or `None`
/// when no candidate clears the majority threshold.
///
/// # Errors
///
/// Implementations return an error only for infrastructure failures
/// (unreachable endpoint, malformed response). "No confident label" is
/// the `Ok(None)` case, not an error.
#[async_trait]
pub trait EntityClassifier: Send + Sync {
    /// Classify one column's value sample against the candidate categories
    async fn classify(
        &self,
        samples: &[String],
        candidates: &[EntityCategory],
    ) -> Result<Option<EntityCategory>>;
}

/// Why a column was withheld from classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnGuard {
    /// Name contains "id": opaque identifiers must survive masking untouched
    Identifier,
    /// Name contains "date": temporal columns are out of scope
    Date,
    /// Name matches a free-form prose hint
    Descriptive,
}

impl ColumnGuard {
    /// Checks a column name against the guard rules
    ///
    /// Matching is by lowercase substring, so `incident_id` and
    /// `Incident_ID` are both guarded. The identifier rule runs first:
    /// a name like `incident_report` is guarded as an identifier because
    /// of the "id" inside "incident", not as prose.
    pub fn for_name(column: &str) -> Option<Self> {
        let lowered = column.to_lowercase();
        if lowered.contains("id") {
            return Some(Self::Identifier);
        }
        if lowered.contains("date") {
            return Some(Self::Date);
        }
        if DESCRIPTIVE_COLUMN_HINTS
            .iter()
            .any(|hint| lowered.contains(hint))
        {
            return Some(Self::Descriptive);
        }
        None
    }

    /// Guard name for log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Date => "date",
            Self::Descriptive => "descriptive",
        }
    }
}

/// Picks the winning category from label counts
///
/// Returns the most frequent category provided its count reaches
/// `min_matches`. Ties resolve to the earlier category in
/// [`EntityCategory::ALL`] so repeated runs over the same sample agree.
pub fn majority_label(
    counts: &HashMap<EntityCategory, usize>,
    min_matches: usize,
) -> Option<EntityCategory> {
    let mut best: Option<(EntityCategory, usize)> = None;
    for category in EntityCategory::ALL {
        let count = counts.get(&category).copied().unwrap_or(0);
        if count == 0 {
            continue;
        }
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((category, count)),
        }
    }
    best.filter(|(_, count)| *count >= min_matches)
        .map(|(category, _)| category)
}

/// Draws up to `limit` scalar values from one column across the rows
///
/// Null cells, nested values, and blank strings are passed over; numbers
/// and booleans are rendered the same way the masking driver renders them.
pub fn sample_column(rows: &[Value], column: &str, limit: usize) -> Vec<String> {
    let mut samples = Vec::new();
    for row in rows.iter().filter_map(Value::as_object) {
        if samples.len() >= limit {
            break;
        }
        let key = match resolve_column(row, column) {
            Some(key) => key,
            None => continue,
        };
        let text = match row.get(&key).and_then(cell_text) {
            Some(text) => text,
            None => continue,
        };
        if text.trim().is_empty() {
            continue;
        }
        samples.push(text);
    }
    samples
}

/// Classifies unbound columns and merges the findings into the bindings
///
/// Every column present in the rows that has no configured binding and
/// passes the [`ColumnGuard`] rules is sampled and submitted to the
/// classifier, up to `max_concurrency` columns in flight at once. The
/// returned bindings keep the configured entries first, followed by the
/// classified columns in their first-seen order.
///
/// # Errors
///
/// Classifier failures abort resolution. Columns the classifier declines
/// to label are simply left unbound.
pub async fn resolve_unbound_columns(
    classifier: &dyn EntityClassifier,
    rows: &[Value],
    bindings: &ColumnBindings,
    config: &ClassifierConfig,
) -> Result<ColumnBindings> {
    let mut probes: Vec<(String, Vec<String>)> = Vec::new();
    for row in rows.iter().filter_map(Value::as_object) {
        for column in row.keys() {
            if bindings.contains(column) {
                continue;
            }
            if probes
                .iter()
                .any(|(seen, _)| seen.eq_ignore_ascii_case(column))
            {
                continue;
            }
            if let Some(guard) = ColumnGuard::for_name(column) {
                debug!(
                    column = %column,
                    guard = guard.as_str(),
                    "Column withheld from classification"
                );
                continue;
            }
            let samples = sample_column(rows, column, config.sample_size);
            if samples.is_empty() {
                debug!(column = %column, "No scalar samples for column, skipping");
                continue;
            }
            probes.push((column.clone(), samples));
        }
    }

    if probes.is_empty() {
        return Ok(bindings.clone());
    }

    let candidates = EntityCategory::ALL;
    let jobs = probes
        .into_iter()
        .enumerate()
        .map(|(index, (column, samples))| async move {
            let outcome = classifier.classify(&samples, &candidates).await;
            (index, column, outcome)
        });

    let mut classified: Vec<(usize, String, EntityCategory)> = Vec::new();
    let mut in_flight = stream::iter(jobs).buffer_unordered(config.max_concurrency.max(1));
    while let Some((index, column, outcome)) = in_flight.next().await {
        match outcome? {
            Some(category) => {
                info!(
                    column = %column,
                    category = %category,
                    "Classifier bound column"
                );
                classified.push((index, column, category));
            }
            None => {
                debug!(column = %column, "No majority label for column");
            }
        }
    }
    classified.sort_by_key(|(index, _, _)| *index);

    let mut pairs: Vec<(String, EntityCategory)> = bindings
        .iter()
        .map(|(column, category)| (column.to_string(), category))
        .collect();
    pairs.extend(
        classified
            .into_iter()
            .map(|(_, column, category)| (column, category)),
    );
    ColumnBindings::from_pairs(pairs)
}

/// Builds the classifier named by the configuration
///
/// Mode `"off"` disables classification entirely; callers then work from
/// configured bindings alone.
///
/// # Errors
///
/// Returns an error for an unknown mode, a `remote` mode without an
/// endpoint, or an unloadable pattern file.
pub fn from_config(config: &ClassifierConfig) -> Result<Option<Box<dyn EntityClassifier>>> {
    let mode = config.mode.to_lowercase();
    match mode.as_str() {
        "off" => Ok(None),
        "pattern" => {
            let registry = match &config.pattern_file {
                Some(path) => PatternRegistry::from_file(path)?,
                None => PatternRegistry::default_patterns()?,
            };
            Ok(Some(Box::new(PatternClassifier::new(
                registry,
                config.min_matches,
            ))))
        }
        "remote" => Ok(Some(Box::new(RemoteClassifier::new(config)?))),
        _ => Err(CloakError::Configuration(format!(
            "Unsupported classifier mode: {mode}. Supported modes: off, pattern, remote"
        ))),
    }
}
