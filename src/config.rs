use crate::error::ConfigError;
use crate::filter::DateField;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub oauth: Option<OAuthConfig>,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Where the shipment rows come from.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Published CSV export, plain GET.
    Csv { url: String },
    /// Spreadsheet values API, bearer token required.
    SheetsApi {
        sheet_id: String,
        #[serde(default = "default_range")]
        range: String,
        #[serde(default = "default_api_base_url")]
        api_base_url: String,
    },
}

impl SourceConfig {
    pub fn needs_token(&self) -> bool {
        matches!(self, SourceConfig::SheetsApi { .. })
    }
}

fn default_range() -> String {
    "A1:H500".to_string()
}

fn default_api_base_url() -> String {
    "https://sheets.googleapis.com/v4/spreadsheets".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
}

fn default_token_url() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_records_per_page")]
    pub records_per_page: usize,
    #[serde(default = "default_auto_refresh_minutes")]
    pub auto_refresh_minutes: u64,
    #[serde(default = "default_session_path")]
    pub session_path: String,
    #[serde(default = "default_year_reference")]
    pub year_reference: DateField,
    #[serde(default = "default_range_reference")]
    pub range_reference: DateField,
    /// Email domain allowed to see data; any signed-in identity when unset.
    #[serde(default)]
    pub allowed_domain: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            records_per_page: default_records_per_page(),
            auto_refresh_minutes: default_auto_refresh_minutes(),
            session_path: default_session_path(),
            year_reference: default_year_reference(),
            range_reference: default_range_reference(),
            allowed_domain: None,
        }
    }
}

fn default_records_per_page() -> usize {
    10
}

fn default_auto_refresh_minutes() -> u64 {
    5
}

fn default_session_path() -> String {
    ".config/session.toml".to_string()
}

fn default_year_reference() -> DateField {
    DateField::Prealerta
}

fn default_range_reference() -> DateField {
    DateField::Arribo
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_source_gets_dashboard_defaults() {
        let cfg = Config::from_toml(
            r#"
            [source]
            kind = "csv"
            url = "https://example.com/pub?output=csv"
            "#,
        )
        .unwrap();

        assert!(!cfg.source.needs_token());
        assert!(cfg.oauth.is_none());
        assert_eq!(cfg.dashboard.records_per_page, 10);
        assert_eq!(cfg.dashboard.auto_refresh_minutes, 5);
        assert_eq!(cfg.dashboard.year_reference, DateField::Prealerta);
        assert_eq!(cfg.dashboard.range_reference, DateField::Arribo);
        assert_eq!(cfg.dashboard.allowed_domain, None);
    }

    #[test]
    fn sheets_api_source_with_oauth() {
        let cfg = Config::from_toml(
            r#"
            [source]
            kind = "sheets_api"
            sheet_id = "abc123"

            [oauth]
            client_id = "id"
            client_secret = "secret"
            refresh_token = "refresh"

            [dashboard]
            records_per_page = 5
            range_reference = "liberacion"
            allowed_domain = "example.com"
            "#,
        )
        .unwrap();

        match &cfg.source {
            SourceConfig::SheetsApi { sheet_id, range, api_base_url } => {
                assert_eq!(sheet_id, "abc123");
                assert_eq!(range, "A1:H500");
                assert!(api_base_url.starts_with("https://sheets.googleapis.com"));
            }
            other => panic!("unexpected source {other:?}"),
        }
        let oauth = cfg.oauth.unwrap();
        assert_eq!(oauth.token_url, "https://oauth2.googleapis.com/token");
        assert_eq!(cfg.dashboard.records_per_page, 5);
        assert_eq!(cfg.dashboard.range_reference, DateField::Liberacion);
        assert_eq!(cfg.dashboard.allowed_domain.as_deref(), Some("example.com"));
    }

    #[test]
    fn unknown_source_kind_is_rejected() {
        let err = Config::from_toml("[source]\nkind = \"ftp\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
