//! Configuration schema types
//!
//! This module defines the configuration structure for Cloak, loaded from
//! TOML with environment variable substitution and `CLOAK_*` overrides.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::core::generator::GeneratorSettings;
use crate::domain::ColumnBindings;

/// Main configuration structure for Cloak
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloakConfig {
    /// Application settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Column bindings: column name mapped to an entity category name
    #[serde(default)]
    pub columns: BTreeMap<String, String>,

    /// Fake value pool settings
    #[serde(default)]
    pub pools: PoolConfig,

    /// Replacement generator settings
    #[serde(default)]
    pub generator: GeneratorSettings,

    /// Column classifier settings
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Audit trail settings
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CloakConfig {
    /// Validate the full configuration
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.validate_columns()?;
        self.pools.validate()?;
        self.validate_generator()?;
        self.classifier.validate()?;
        self.audit.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Parses the `[columns]` section into bindings
    pub fn column_bindings(&self) -> crate::domain::Result<ColumnBindings> {
        ColumnBindings::try_from(&self.columns)
    }

    fn validate_columns(&self) -> Result<(), String> {
        ColumnBindings::try_from(&self.columns)
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    fn validate_generator(&self) -> Result<(), String> {
        if self.generator.fallback_ceiling == 0 {
            return Err("generator.fallback_ceiling must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Application-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid application.log_level: {}. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Fake value pool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of candidates seeded per category pool
    #[serde(default = "default_pool_size")]
    pub size: usize,

    /// Seed for reproducible pool generation
    #[serde(default)]
    pub rng_seed: Option<u64>,

    /// Optional JSON pool file overriding the built-in providers
    #[serde(default)]
    pub pool_file: Option<PathBuf>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            size: default_pool_size(),
            rng_seed: None,
            pool_file: None,
        }
    }
}

impl PoolConfig {
    fn validate(&self) -> Result<(), String> {
        if !(1..=100_000).contains(&self.size) {
            return Err(format!(
                "pools.size must be between 1 and 100000, got {}",
                self.size
            ));
        }
        Ok(())
    }
}

/// Column classifier settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Classifier mode: "off", "pattern" or "remote"
    #[serde(default = "default_classifier_mode")]
    pub mode: String,

    /// Endpoint URL of the remote classifier service
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Optional TOML file overriding the built-in pattern registry
    #[serde(default)]
    pub pattern_file: Option<PathBuf>,

    /// Values sampled per unbound column
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// Minimum matching samples before a column binds to a category
    #[serde(default = "default_min_matches")]
    pub min_matches: usize,

    /// Columns classified concurrently
    #[serde(default = "default_classifier_concurrency")]
    pub max_concurrency: usize,

    /// HTTP timeout for remote classification requests
    #[serde(default = "default_classifier_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            mode: default_classifier_mode(),
            endpoint: None,
            pattern_file: None,
            sample_size: default_sample_size(),
            min_matches: default_min_matches(),
            max_concurrency: default_classifier_concurrency(),
            timeout_seconds: default_classifier_timeout_seconds(),
        }
    }
}

impl ClassifierConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_modes = ["off", "pattern", "remote"];
        if !valid_modes.contains(&self.mode.as_str()) {
            return Err(format!(
                "Invalid classifier.mode: {}. Must be one of: {}",
                self.mode,
                valid_modes.join(", ")
            ));
        }

        if self.mode == "remote" {
            match &self.endpoint {
                Some(endpoint) => {
                    let parsed = url::Url::parse(endpoint).map_err(|e| {
                        format!("Invalid classifier.endpoint '{endpoint}': {e}")
                    })?;
                    if !matches!(parsed.scheme(), "http" | "https") {
                        return Err(format!(
                            "classifier.endpoint must use http or https, got scheme '{}'",
                            parsed.scheme()
                        ));
                    }
                }
                None => {
                    return Err(
                        "classifier.endpoint is required when classifier.mode is 'remote'"
                            .to_string(),
                    );
                }
            }
        }

        if self.sample_size == 0 {
            return Err("classifier.sample_size must be at least 1".to_string());
        }

        if self.min_matches == 0 {
            return Err("classifier.min_matches must be at least 1".to_string());
        }

        if self.min_matches > self.sample_size {
            return Err(format!(
                "classifier.min_matches ({}) cannot exceed classifier.sample_size ({})",
                self.min_matches, self.sample_size
            ));
        }

        if self.max_concurrency == 0 || self.max_concurrency > 32 {
            return Err(format!(
                "classifier.max_concurrency must be between 1 and 32, got {}",
                self.max_concurrency
            ));
        }

        if self.timeout_seconds == 0 {
            return Err("classifier.timeout_seconds must be at least 1".to_string());
        }

        Ok(())
    }
}

/// Audit trail settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable the append-only audit trail
    #[serde(default)]
    pub enabled: bool,

    /// Audit log path (JSON lines, one record per run)
    #[serde(default = "default_audit_log_path")]
    pub log_path: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
        }
    }
}

impl AuditConfig {
    fn validate(&self) -> Result<(), String> {
        if self.enabled && self.log_path.trim().is_empty() {
            return Err("audit.log_path cannot be empty when audit.enabled is true".to_string());
        }
        Ok(())
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_logging_enabled")]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Log rotation: "daily", "hourly" or "never"
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: default_logging_enabled(),
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err(
                "logging.local_path cannot be empty when logging.local_enabled is true"
                    .to_string(),
            );
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation: {}. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        Ok(())
    }
}

// Default value functions

fn default_log_level() -> String {
    "info".to_string()
}

fn default_pool_size() -> usize {
    crate::core::pool::DEFAULT_POOL_SIZE
}

fn default_classifier_mode() -> String {
    "pattern".to_string()
}

fn default_sample_size() -> usize {
    10
}

fn default_min_matches() -> usize {
    5
}

fn default_classifier_concurrency() -> usize {
    4
}

fn default_classifier_timeout_seconds() -> u64 {
    30
}

fn default_audit_log_path() -> String {
    "cloak_audit.jsonl".to_string()
}

fn default_logging_enabled() -> bool {
    true
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntityCategory;

    fn full_config() -> CloakConfig {
        let toml_str = r#"
            [application]
            log_level = "debug"

            [columns]
            vendor = "company"
            contact_email = "email"
            city = "location"

            [pools]
            size = 500
            rng_seed = 42

            [generator]
            synthesis_retries = 8
            fallback_ceiling = 1000

            [classifier]
            mode = "remote"
            endpoint = "http://localhost:8080/classify"
            sample_size = 10
            min_matches = 5
            max_concurrency = 2
            timeout_seconds = 15

            [audit]
            enabled = true
            log_path = "audit/cloak_audit.jsonl"

            [logging]
            local_enabled = true
            local_path = "logs"
            local_rotation = "daily"
        "#;
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: CloakConfig = toml::from_str("").unwrap();

        assert_eq!(config.application.log_level, "info");
        assert!(config.columns.is_empty());
        assert_eq!(config.pools.size, 1000);
        assert_eq!(config.pools.rng_seed, None);
        assert_eq!(config.generator.synthesis_retries, 16);
        assert_eq!(config.classifier.mode, "pattern");
        assert_eq!(config.classifier.sample_size, 10);
        assert_eq!(config.classifier.min_matches, 5);
        assert!(!config.audit.enabled);
        assert!(config.logging.local_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config_parses_and_validates() {
        let config = full_config();

        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.columns.len(), 3);
        assert_eq!(config.pools.size, 500);
        assert_eq!(config.pools.rng_seed, Some(42));
        assert_eq!(config.generator.synthesis_retries, 8);
        assert_eq!(config.classifier.mode, "remote");
        assert_eq!(
            config.classifier.endpoint.as_deref(),
            Some("http://localhost:8080/classify")
        );
        assert!(config.audit.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_column_bindings_parse_from_section() {
        let config = full_config();
        let bindings = config.column_bindings().unwrap();

        assert_eq!(bindings.len(), 3);
        assert_eq!(
            bindings.category_for("vendor"),
            Some(EntityCategory::Company)
        );
        assert_eq!(
            bindings.category_for("Contact_Email"),
            Some(EntityCategory::Email)
        );
    }

    #[test]
    fn test_unknown_column_category_rejected() {
        let mut config = full_config();
        config
            .columns
            .insert("ssn".to_string(), "social_security".to_string());

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("social_security"));
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = full_config();
        config.application.log_level = "verbose".to_string();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("log_level"));
    }

    #[test]
    fn test_pool_size_out_of_range() {
        let mut config = full_config();
        config.pools.size = 0;
        assert!(config.validate().is_err());

        config.pools.size = 200_000;
        assert!(config.validate().is_err());

        config.pools.size = 100_000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generator_fallback_ceiling_must_be_positive() {
        let mut config = full_config();
        config.generator.fallback_ceiling = 0;

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("fallback_ceiling"));
    }

    #[test]
    fn test_invalid_classifier_mode_rejected() {
        let mut config = full_config();
        config.classifier.mode = "gliner".to_string();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("classifier.mode"));
    }

    #[test]
    fn test_remote_mode_requires_endpoint() {
        let mut config = full_config();
        config.classifier.endpoint = None;

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("endpoint"));
    }

    #[test]
    fn test_remote_endpoint_must_be_http_or_https() {
        let mut config = full_config();
        config.classifier.endpoint = Some("ftp://models.example.com/classify".to_string());

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("http"));
    }

    #[test]
    fn test_remote_endpoint_must_parse_as_url() {
        let mut config = full_config();
        config.classifier.endpoint = Some("not a url".to_string());

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_endpoint_ignored_when_mode_is_pattern() {
        let mut config = full_config();
        config.classifier.mode = "pattern".to_string();
        config.classifier.endpoint = None;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_min_matches_cannot_exceed_sample_size() {
        let mut config = full_config();
        config.classifier.sample_size = 5;
        config.classifier.min_matches = 6;

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("min_matches"));
    }

    #[test]
    fn test_classifier_concurrency_bounds() {
        let mut config = full_config();
        config.classifier.max_concurrency = 0;
        assert!(config.validate().is_err());

        config.classifier.max_concurrency = 33;
        assert!(config.validate().is_err());

        config.classifier.max_concurrency = 32;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_audit_requires_log_path_when_enabled() {
        let mut config = full_config();
        config.audit.log_path = "  ".to_string();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("audit.log_path"));
    }

    #[test]
    fn test_invalid_rotation_rejected() {
        let mut config = full_config();
        config.logging.local_rotation = "weekly".to_string();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("local_rotation"));
    }

    #[test]
    fn test_classifier_default_matches_documented_defaults() {
        let config = ClassifierConfig::default();

        assert_eq!(config.mode, "pattern");
        assert_eq!(config.endpoint, None);
        assert_eq!(config.pattern_file, None);
        assert_eq!(config.sample_size, 10);
        assert_eq!(config.min_matches, 5);
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.timeout_seconds, 30);
    }
}
