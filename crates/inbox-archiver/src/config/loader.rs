use std::fs;
use std::path::Path;

use jsonschema::Validator;
use serde::Deserialize;
use serde_json::Value;

use crate::config::schema::Config;
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../schema/config-v1.json");

/// Reads the config file at `path` and validates it.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })
        .and_then(|content| load_config_from_str(&content))
}

/// Parses config JSON. The raw document is checked against the embedded
/// schema before it is deserialized. Semantic checks the schema cannot
/// express run last.
pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let raw: Value = serde_json::from_str(content)?;
    check_schema(&raw)?;

    let config = Config::deserialize(raw)?;
    validate_config(&config)?;
    Ok(config)
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Validation { message }
}

fn schema_validator() -> Result<Validator, ConfigError> {
    let schema: Value = serde_json::from_str(SCHEMA_JSON)
        .map_err(|e| invalid(format!("Invalid embedded schema JSON: {}", e)))?;
    jsonschema::validator_for(&schema)
        .map_err(|e| invalid(format!("Failed to compile JSON schema: {}", e)))
}

fn check_schema(raw: &Value) -> Result<(), ConfigError> {
    let problems: Vec<String> = schema_validator()?
        .iter_errors(raw)
        .map(|e| e.to_string())
        .collect();

    if problems.is_empty() {
        return Ok(());
    }
    Err(ConfigError::SchemaValidation {
        errors: problems.join("; "),
    })
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(invalid(format!(
            "Unsupported config version: {}",
            config.version
        )));
    }

    if config.label_name.trim().is_empty() {
        return Err(invalid("label_name must not be empty".to_string()));
    }

    for rule in &config.skip_rules {
        if rule.account_name.trim().is_empty() {
            return Err(ConfigError::InvalidSkipRule {
                account: rule.account_name.clone(),
                reason: "account_name must not be empty".to_string(),
            });
        }

        // An empty substring would match every subject.
        if rule.subject_substrings.iter().any(|s| s.is_empty()) {
            return Err(ConfigError::InvalidSkipRule {
                account: rule.account_name.clone(),
                reason: "subject substrings must not be empty".to_string(),
            });
        }
    }

    Ok(())
}
