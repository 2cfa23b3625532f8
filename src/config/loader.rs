//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::CloakConfig;
use crate::domain::errors::CloakError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into CloakConfig
/// 4. Applies environment variable overrides (CLOAK_* prefix)
/// 5. Validates the configuration
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use cloak::config::loader::load_config;
///
/// let config = load_config("cloak.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CloakConfig> {
    let path = path.as_ref();

    // Check if file exists
    if !path.exists() {
        return Err(CloakError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    // Read file contents
    let contents = fs::read_to_string(path).map_err(|e| {
        CloakError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    // Perform environment variable substitution
    let contents = substitute_env_vars(&contents)?;

    // Parse TOML
    let mut config: CloakConfig = toml::from_str(&contents)
        .map_err(|e| CloakError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    // Apply environment variable overrides
    apply_env_overrides(&mut config)?;

    // Validate configuration
    config.validate().map_err(|e| {
        CloakError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are passed through untouched, so examples in comments
/// never fail the load. Every referenced variable must be set; missing
/// names are collected and reported together.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        // Skip comment lines - don't process env vars in comments
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(CloakError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the CLOAK_* prefix
///
/// Environment variables follow the pattern: CLOAK_<SECTION>_<KEY>
/// For example: CLOAK_CLASSIFIER_ENDPOINT, CLOAK_POOLS_SIZE
fn apply_env_overrides(config: &mut CloakConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("CLOAK_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Pool overrides
    if let Ok(val) = std::env::var("CLOAK_POOLS_SIZE") {
        if let Ok(size) = val.parse() {
            config.pools.size = size;
        }
    }
    if let Ok(val) = std::env::var("CLOAK_POOLS_RNG_SEED") {
        if let Ok(seed) = val.parse() {
            config.pools.rng_seed = Some(seed);
        }
    }
    if let Ok(val) = std::env::var("CLOAK_POOLS_POOL_FILE") {
        config.pools.pool_file = Some(PathBuf::from(val));
    }

    // Classifier overrides
    if let Ok(val) = std::env::var("CLOAK_CLASSIFIER_MODE") {
        config.classifier.mode = val;
    }
    if let Ok(val) = std::env::var("CLOAK_CLASSIFIER_ENDPOINT") {
        config.classifier.endpoint = Some(val);
    }
    if let Ok(val) = std::env::var("CLOAK_CLASSIFIER_SAMPLE_SIZE") {
        if let Ok(size) = val.parse() {
            config.classifier.sample_size = size;
        }
    }
    if let Ok(val) = std::env::var("CLOAK_CLASSIFIER_MIN_MATCHES") {
        if let Ok(min) = val.parse() {
            config.classifier.min_matches = min;
        }
    }

    // Audit overrides
    if let Ok(val) = std::env::var("CLOAK_AUDIT_ENABLED") {
        config.audit.enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("CLOAK_AUDIT_LOG_PATH") {
        config.audit.log_path = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("CLOAK_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("CLOAK_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
