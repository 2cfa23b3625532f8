//! Remote NER classifier client
//!
//! Posts column samples to an external named-entity-recognition service
//! and folds the returned entity labels into engine categories. The wire
//! contract is one JSON request `{"texts": [...], "labels": [...]}` and
//! one response `{"entities": [{"label": "..."}]}`; extra response fields
//! are ignored.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::adapters::classifier::{majority_label, EntityClassifier};
use crate::config::ClassifierConfig;
use crate::domain::category::EntityCategory;
use crate::domain::errors::{ClassifierError, CloakError};
use crate::domain::result::Result;

/// Classifier backed by an HTTP NER inference endpoint
///
/// The endpoint is taken from configuration and already validated as an
/// absolute URL by the time this constructor runs. One request carries
/// the whole sample for one column.
pub struct RemoteClassifier {
    endpoint: String,
    client: Client,
    min_matches: usize,
}

impl RemoteClassifier {
    /// Builds a classifier from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no endpoint is set or the
    /// HTTP client cannot be constructed.
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        let endpoint = config.endpoint.clone().ok_or_else(|| {
            CloakError::Configuration("Classifier mode 'remote' requires an endpoint".to_string())
        })?;

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CloakError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint,
            client,
            min_matches: config.min_matches,
        })
    }

    /// Endpoint this classifier talks to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// NER label vocabulary sent for a candidate category
///
/// Finer-grained labels ("city", "country") recall better than the bare
/// category name; [`EntityCategory::from_classifier_label`] folds them
/// back together on the way in.
fn probe_labels(category: EntityCategory) -> &'static [&'static str] {
    match category {
        EntityCategory::Company => &["company"],
        EntityCategory::Url => &["url"],
        EntityCategory::Person => &["person"],
        EntityCategory::Location => &["city", "location", "country"],
        EntityCategory::Phone => &["phone number"],
        EntityCategory::Email => &["email"],
    }
}

#[async_trait]
impl EntityClassifier for RemoteClassifier {
    async fn classify(
        &self,
        samples: &[String],
        candidates: &[EntityCategory],
    ) -> Result<Option<EntityCategory>> {
        if samples.is_empty() {
            return Ok(None);
        }

        let labels: Vec<&str> = candidates
            .iter()
            .flat_map(|&category| probe_labels(category).iter().copied())
            .collect();
        let body = json!({ "texts": samples, "labels": labels });

        debug!(
            endpoint = %self.endpoint,
            samples = samples.len(),
            "Sending classification request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClassifierError::Timeout(e.to_string())
                } else {
                    ClassifierError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            let error = if status.is_server_error() {
                ClassifierError::ServerError {
                    status: status.as_u16(),
                    message,
                }
            } else {
                ClassifierError::ClientError {
                    status: status.as_u16(),
                    message,
                }
            };
            return Err(error.into());
        }

        let parsed: ClassifyResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::InvalidResponse(e.to_string()))?;

        let mut counts: HashMap<EntityCategory, usize> = HashMap::new();
        for entity in &parsed.entities {
            match EntityCategory::from_classifier_label(&entity.label) {
                Some(category) if candidates.contains(&category) => {
                    *counts.entry(category).or_insert(0) += 1;
                }
                Some(_) => {}
                None => {
                    warn!(label = %entity.label, "Ignoring unknown label from classifier");
                }
            }
        }
        Ok(majority_label(&counts, self.min_matches))
    }
}

/// Response from the inference endpoint
#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    entities: Vec<RemoteEntity>,
}

/// One recognized entity; only the label matters here
#[derive(Debug, Deserialize)]
struct RemoteEntity {
    label: String,
}
