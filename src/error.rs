use thiserror::Error;

/// Failures at the data-source boundary. These never escape `source::load_rows`;
/// they ride along with an empty row set instead.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("source unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("source answered with HTTP {0}")]
    Status(u16),
    #[error("access token rejected, login required")]
    AuthExpired,
    #[error("no access token available")]
    MissingToken,
    #[error("malformed sheet payload: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, FetchError::AuthExpired)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session cache io: {0}")]
    Io(#[from] std::io::Error),
    #[error("session cache is not valid toml: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("session cache is not an editable document: {0}")]
    Edit(#[from] toml_edit::TomlError),
    #[error("session cache has a `session` key that is not a table")]
    NotATable,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token endpoint unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("token endpoint refused the grant: {0}")]
    Rejected(String),
    #[error("no cached session and no [oauth] section configured")]
    NotConfigured,
    #[error(transparent)]
    Session(#[from] SessionError),
}
