//! Dashboard configuration.
//!
//! Built once by the front end and handed to `SheetsClient`, `HrDataService`
//! and `GeminiClient` constructors. Sources, later overriding earlier:
//! built-in defaults, `~/.hrdash/config.json`, process environment.
//! Missing credentials are not a load failure; the feature that needs them
//! fails with `HrError::Configuration` when used.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::HrError;
use crate::parse::{FallbackPolicy, SheetSchema};

pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro-latest";

/// Environment keys, in lookup order per setting.
const ENV_CONFIG_PATH: &str = "HRDASH_CONFIG";
const ENV_SPREADSHEET_ID: &[&str] = &["HRDASH_SPREADSHEET_ID"];
const ENV_SHEETS_API_KEY: &[&str] = &["GOOGLE_SHEETS_API_KEY", "VITE_GOOGLE_SHEETS_API_KEY"];
const ENV_GEMINI_API_KEY: &[&str] = &["GEMINI_API_KEY", "VITE_GEMINI_API_KEY", "API_KEY"];
const ENV_GEMINI_MODEL: &[&str] = &["HRDASH_GEMINI_MODEL"];
const ENV_SCHEMA: &[&str] = &["HRDASH_SHEET_SCHEMA"];
const ENV_FALLBACK: &[&str] = &["HRDASH_FALLBACK"];

/// On-disk config file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    #[serde(default)]
    pub sheets_api_key: Option<String>,
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    #[serde(default)]
    pub sheets_base_url: Option<String>,
    #[serde(default)]
    pub gemini_base_url: Option<String>,
    #[serde(default)]
    pub gemini_model: Option<String>,
    #[serde(default)]
    pub schema: Option<SheetSchema>,
    #[serde(default)]
    pub fallback: Option<FallbackPolicy>,
}

#[derive(Clone)]
pub struct DashboardConfig {
    pub spreadsheet_id: Option<String>,
    pub sheets_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub sheets_base_url: String,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub schema: SheetSchema,
    pub fallback: FallbackPolicy,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            sheets_api_key: None,
            gemini_api_key: None,
            sheets_base_url: DEFAULT_SHEETS_BASE_URL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            schema: SheetSchema::default(),
            fallback: FallbackPolicy::default(),
        }
    }
}

// Keys stay out of logs and panic messages.
impl std::fmt::Debug for DashboardConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardConfig")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("sheets_api_key", &redact(&self.sheets_api_key))
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("sheets_base_url", &self.sheets_base_url)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("gemini_model", &self.gemini_model)
            .field("schema", &self.schema)
            .field("fallback", &self.fallback)
            .finish()
    }
}

fn redact(value: &Option<String>) -> &'static str {
    if value.is_some() {
        "<set>"
    } else {
        "<unset>"
    }
}

/// Trim and drop blank values so `KEY=` in a .env file counts as unset.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn first_of(lookup: &impl Fn(&str) -> Option<String>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| non_blank(lookup(key)))
}

/// Default config file location: `~/.hrdash/config.json`.
pub fn default_config_path() -> Result<PathBuf, HrError> {
    config_path_in(dirs::home_dir())
}

fn config_path_in(home: Option<PathBuf>) -> Result<PathBuf, HrError> {
    let home = home.ok_or_else(|| {
        HrError::Configuration("Could not find home directory".to_string())
    })?;
    Ok(home.join(".hrdash").join("config.json"))
}

/// Read the config file. A missing file is not an error.
pub fn load_config_file(path: &Path) -> Result<Option<ConfigFile>, HrError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        HrError::Configuration(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let file: ConfigFile = serde_json::from_str(&content).map_err(|e| {
        HrError::Configuration(format!("Failed to parse {}: {}", path.display(), e))
    })?;

    Ok(Some(file))
}

impl DashboardConfig {
    /// Build from the process environment and the default config file.
    pub fn from_env() -> Result<Self, HrError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Tests pass a map-backed closure so
    /// process state is never touched.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, HrError> {
        let path = match non_blank(lookup(ENV_CONFIG_PATH)) {
            Some(explicit) => Some(PathBuf::from(explicit)),
            None => match default_config_path() {
                Ok(path) => Some(path),
                Err(e) => {
                    log::warn!("Skipping config file: {}", e);
                    None
                }
            },
        };

        let mut config = Self::default();
        if let Some(path) = path {
            if let Some(file) = load_config_file(&path)? {
                log::debug!("Loaded dashboard config from {}", path.display());
                config.apply_file(file);
            }
        }
        config.apply_env(&lookup)?;
        config.warn_missing_credentials();
        Ok(config)
    }

    pub fn apply_file(&mut self, file: ConfigFile) {
        if let Some(v) = non_blank(file.spreadsheet_id) {
            self.spreadsheet_id = Some(v);
        }
        if let Some(v) = non_blank(file.sheets_api_key) {
            self.sheets_api_key = Some(v);
        }
        if let Some(v) = non_blank(file.gemini_api_key) {
            self.gemini_api_key = Some(v);
        }
        if let Some(v) = non_blank(file.sheets_base_url) {
            self.sheets_base_url = v;
        }
        if let Some(v) = non_blank(file.gemini_base_url) {
            self.gemini_base_url = v;
        }
        if let Some(v) = non_blank(file.gemini_model) {
            self.gemini_model = v;
        }
        if let Some(schema) = file.schema {
            self.schema = schema;
        }
        if let Some(fallback) = file.fallback {
            self.fallback = fallback;
        }
    }

    pub fn apply_env(&mut self, lookup: &impl Fn(&str) -> Option<String>) -> Result<(), HrError> {
        if let Some(v) = first_of(lookup, ENV_SPREADSHEET_ID) {
            self.spreadsheet_id = Some(v);
        }
        if let Some(v) = first_of(lookup, ENV_SHEETS_API_KEY) {
            self.sheets_api_key = Some(v);
        }
        if let Some(v) = first_of(lookup, ENV_GEMINI_API_KEY) {
            self.gemini_api_key = Some(v);
        }
        if let Some(v) = first_of(lookup, ENV_GEMINI_MODEL) {
            self.gemini_model = v;
        }
        if let Some(v) = first_of(lookup, ENV_SCHEMA) {
            self.schema = v.parse()?;
        }
        if let Some(v) = first_of(lookup, ENV_FALLBACK) {
            self.fallback = v.parse()?;
        }
        Ok(())
    }

    fn warn_missing_credentials(&self) {
        if self.sheets_api_key.is_none() {
            log::warn!(
                "GOOGLE_SHEETS_API_KEY is not set; spreadsheet loads will fail. \
                 The sheet must also be shared with 'anyone with the link'."
            );
        }
        if self.spreadsheet_id.is_none() {
            log::warn!("HRDASH_SPREADSHEET_ID is not set; spreadsheet loads will fail.");
        }
        if self.gemini_api_key.is_none() {
            log::warn!("GEMINI_API_KEY is not set; AI analysis will not work.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.json");
        let config =
            DashboardConfig::from_lookup(lookup_from(&[("HRDASH_CONFIG", missing.to_str().unwrap())]))
                .unwrap();

        assert!(config.sheets_api_key.is_none());
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.sheets_base_url, DEFAULT_SHEETS_BASE_URL);
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.schema, SheetSchema::Current);
        assert_eq!(config.fallback, FallbackPolicy::PassThrough);
    }

    #[test]
    fn test_env_overrides_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "spreadsheetId": "sheet-from-file", "sheetsApiKey": "file-key", "schema": "legacy", "fallback": "placeholder" }"#,
        )
        .unwrap();

        let config = DashboardConfig::from_lookup(lookup_from(&[
            ("HRDASH_CONFIG", path.to_str().unwrap()),
            ("GOOGLE_SHEETS_API_KEY", "env-key"),
            ("VITE_GEMINI_API_KEY", "gemini-key"),
        ]))
        .unwrap();

        assert_eq!(config.spreadsheet_id.as_deref(), Some("sheet-from-file"));
        assert_eq!(config.sheets_api_key.as_deref(), Some("env-key"));
        assert_eq!(config.gemini_api_key.as_deref(), Some("gemini-key"));
        assert_eq!(config.schema, SheetSchema::Legacy);
        assert_eq!(config.fallback, FallbackPolicy::Placeholder);
    }

    #[test]
    fn test_blank_env_value_counts_as_unset() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.json");
        let config = DashboardConfig::from_lookup(lookup_from(&[
            ("HRDASH_CONFIG", missing.to_str().unwrap()),
            ("GOOGLE_SHEETS_API_KEY", "   "),
            ("VITE_GOOGLE_SHEETS_API_KEY", "alias-key"),
        ]))
        .unwrap();
        assert_eq!(config.sheets_api_key.as_deref(), Some("alias-key"));
    }

    #[test]
    fn test_malformed_file_is_configuration_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = DashboardConfig::from_lookup(lookup_from(&[("HRDASH_CONFIG", path.to_str().unwrap())]))
            .unwrap_err();
        assert!(matches!(err, HrError::Configuration(_)));
    }

    #[test]
    fn test_invalid_schema_value_rejected() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.json");
        let err = DashboardConfig::from_lookup(lookup_from(&[
            ("HRDASH_CONFIG", missing.to_str().unwrap()),
            ("HRDASH_SHEET_SCHEMA", "v3"),
        ]))
        .unwrap_err();
        assert!(matches!(err, HrError::Configuration(_)));
    }

    #[test]
    fn test_invalid_fallback_value_rejected() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.json");
        let err = DashboardConfig::from_lookup(lookup_from(&[
            ("HRDASH_CONFIG", missing.to_str().unwrap()),
            ("HRDASH_FALLBACK", "sometimes"),
        ]))
        .unwrap_err();
        assert!(matches!(err, HrError::Configuration(ref m) if m.contains("sometimes")));
    }

    #[test]
    fn test_config_path_requires_home_directory() {
        let err = config_path_in(None).unwrap_err();
        assert!(matches!(err, HrError::Configuration(ref m) if m.contains("home directory")));

        let path = config_path_in(Some(PathBuf::from("/home/ana"))).unwrap();
        assert_eq!(path, PathBuf::from("/home/ana/.hrdash/config.json"));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = DashboardConfig {
            sheets_api_key: Some("super-secret".to_string()),
            ..DashboardConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<set>"));
    }
}
