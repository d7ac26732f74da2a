//! Engine-wide form policy.
//!
//! The configuration is stored in `Formwork.json` files, searched upward from
//! a working directory.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// The standard configuration filename.
pub const CONFIG_FILENAME: &str = "Formwork.json";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
}

/// How several error messages on one field collapse into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorMethod {
    #[default]
    First,
    /// Every message, joined with `", "`
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FormConfig {
    /// Whether a field is required when the bound object declares no validators.
    pub required_by_default: bool,
    pub error_method: ErrorMethod,
    /// Prepended to every field error message.
    pub error_prefix: Option<String>,
    /// Wire value of a checked checkbox.
    pub checked_value: String,
    /// Wire value of an unchecked checkbox.
    pub unchecked_value: String,
    /// Whether single selects offer a blank option.
    pub include_blank_choice: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            required_by_default: false,
            error_method: ErrorMethod::First,
            error_prefix: None,
            checked_value: "1".to_string(),
            unchecked_value: "0".to_string(),
            include_blank_choice: true,
        }
    }
}

impl FormConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_str(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn parse_str(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Find the configuration file by searching upward from the given directory.
    pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
        let mut current = start_dir.to_path_buf();
        loop {
            let config_path = current.join(CONFIG_FILENAME);
            if config_path.exists() {
                return Some(config_path);
            }
            if !current.pop() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_uses_defaults() {
        let config = FormConfig::parse_str("{}").unwrap();
        assert_eq!(config, FormConfig::default());
        assert_eq!(config.checked_value, "1");
        assert!(config.include_blank_choice);
    }

    #[test]
    fn test_parse_kebab_case_keys() {
        let config = FormConfig::parse_str(
            r#"{
                "required-by-default": true,
                "error-method": "all",
                "error-prefix": "Oops:",
                "checked-value": "yes",
                "unchecked-value": "no",
                "include-blank-choice": false
            }"#,
        )
        .unwrap();
        assert!(config.required_by_default);
        assert_eq!(config.error_method, ErrorMethod::All);
        assert_eq!(config.error_prefix.as_deref(), Some("Oops:"));
        assert_eq!(config.checked_value, "yes");
        assert_eq!(config.unchecked_value, "no");
        assert!(!config.include_blank_choice);
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        assert!(matches!(
            FormConfig::parse_str(r#"{"required": true}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = FormConfig::load(Path::new("/definitely/not/here/Formwork.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_find_config_file_searches_upward() {
        let root = std::env::temp_dir().join(format!("formwork-config-{}", std::process::id()));
        let nested = root.join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.join(CONFIG_FILENAME), "{}").unwrap();

        assert_eq!(
            FormConfig::find_config_file(&nested),
            Some(root.join(CONFIG_FILENAME))
        );
        assert_eq!(FormConfig::load(&root.join(CONFIG_FILENAME)).unwrap(), FormConfig::default());

        std::fs::remove_dir_all(&root).unwrap();
    }
}
