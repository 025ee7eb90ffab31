use crate::error::SessionError;
use serde::Deserialize;
use std::{fs, path::Path};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use toml_edit::{DocumentMut, value};

/// Last authenticated identity and its token. Opaque to the dashboard core:
/// only `access_token` is ever read back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub login_time: Option<String>,
    pub access_token: String,
}

#[derive(Deserialize)]
struct SessionFile {
    session: Session,
}

impl Session {
    pub fn new(access_token: impl Into<String>, now: OffsetDateTime) -> Self {
        let mut session = Self {
            access_token: access_token.into(),
            ..Self::default()
        };
        session.stamp_login(now);
        session
    }

    pub fn stamp_login(&mut self, now: OffsetDateTime) {
        self.login_time = now.format(&Rfc3339).ok();
    }

    /// `Ok(None)` when no session has been cached yet.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>, SessionError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let file: SessionFile = toml::from_str(&content)?;
        Ok(Some(file.session))
    }

    /// Write the session, keeping anything else already in the file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let path = path.as_ref();
        let content = if path.exists() {
            fs::read_to_string(path)?
        } else {
            String::new()
        };
        let mut doc = content.parse::<DocumentMut>()?;
        if doc.get("session").is_some_and(|item| !item.is_table_like()) {
            return Err(SessionError::NotATable);
        }

        doc["session"]["access_token"] = value(self.access_token.as_str());
        for (key, field) in [
            ("email", &self.email),
            ("name", &self.name),
            ("picture", &self.picture),
            ("login_time", &self.login_time),
        ] {
            match field {
                Some(v) => doc["session"][key] = value(v.as_str()),
                None => {
                    if let Some(table) = doc["session"].as_table_like_mut() {
                        table.remove(key);
                    }
                }
            }
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, doc.to_string())?;
        Ok(())
    }

    /// Forget the cached session (logout).
    pub fn clear(path: impl AsRef<Path>) -> Result<(), SessionError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn missing_file_means_no_session() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Session::load(dir.path().join("session.toml")).unwrap(), None);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.toml");

        let mut session = Session::new("tok-1", datetime!(2026-10-19 08:30 UTC));
        session.email = Some("ops@example.com".into());
        session.save(&path).unwrap();

        let loaded = Session::load(&path).unwrap().unwrap();
        assert_eq!(loaded.access_token, "tok-1");
        assert_eq!(loaded.email.as_deref(), Some("ops@example.com"));
        assert_eq!(loaded.login_time.as_deref(), Some("2026-10-19T08:30:00Z"));
        assert_eq!(loaded.name, None);
    }

    #[test]
    fn save_preserves_unrelated_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        fs::write(&path, "# keep me\n[ui]\ntheme = \"dark\"\n").unwrap();

        Session::new("tok-2", datetime!(2026-10-19 08:30 UTC)).save(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("# keep me"));
        assert!(content.contains("theme = \"dark\""));
        assert_eq!(Session::load(&path).unwrap().unwrap().access_token, "tok-2");
    }

    #[test]
    fn save_refuses_a_scalar_session_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        fs::write(&path, "session = \"x\"\n").unwrap();

        let err = Session::new("tok", datetime!(2026-10-19 08:30 UTC))
            .save(&path)
            .unwrap_err();
        assert!(matches!(err, SessionError::NotATable));
        assert_eq!(fs::read_to_string(&path).unwrap(), "session = \"x\"\n");
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        Session::new("tok", datetime!(2026-10-19 08:30 UTC)).save(&path).unwrap();

        Session::clear(&path).unwrap();
        Session::clear(&path).unwrap();
        assert_eq!(Session::load(&path).unwrap(), None);
    }
}
