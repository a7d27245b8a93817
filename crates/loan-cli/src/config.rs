//! TOML settings for the loan desk.
//!
//! The default file lives in the platform config directory
//! (`~/.config/loan-desk/settings.toml` on Linux). `--config` or
//! `LOAN_DESK_CONFIG` point at another file. Relative paths inside a
//! settings file are resolved against that file's directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use loan_admin::{AdminError, AdminSecret};
use loan_feedback::DEFAULT_LOG_FILE;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "loan-desk";
const APP_NAME: &str = "loan-desk";
const SETTINGS_FILE: &str = "settings.toml";

/// Environment variable naming a settings file.
pub const CONFIG_ENV: &str = "LOAN_DESK_CONFIG";
/// Environment variable carrying the admin password.
pub const ADMIN_PASSWORD_ENV: &str = "LOAN_DESK_ADMIN_PASSWORD";
/// Password accepted only when `admin.insecure_dev_mode` is set.
pub const DEV_ADMIN_PASSWORD: &str = "admin123";

pub const DEFAULT_ARTIFACT: &str = "best_loan_model.json";
pub const DEFAULT_SCHEMA: &str = "cleaned_loan_data.csv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid settings {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("admin.password_sha256 is not a SHA-256 hex digest")]
    InvalidAdminDigest(#[source] AdminError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Loan desk settings (persisted as TOML).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub model: ModelSettings,
    pub feedback: FeedbackSettings,
    pub admin: AdminSettings,
}

/// Where the classifier artifact and the feature schema are read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub artifact: PathBuf,
    /// CSV whose header defines the feature order.
    pub schema: PathBuf,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            artifact: PathBuf::from(DEFAULT_ARTIFACT),
            schema: PathBuf::from(DEFAULT_SCHEMA),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackSettings {
    pub path: PathBuf,
}

impl Default for FeedbackSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
    /// Hex SHA-256 of the admin password.
    pub password_sha256: Option<String>,
    /// Accept the built-in development password when nothing else is set.
    pub insecure_dev_mode: bool,
}

impl Settings {
    /// Resolves relative paths against `base`.
    #[must_use]
    pub fn relative_to(mut self, base: &Path) -> Self {
        for path in [
            &mut self.model.artifact,
            &mut self.model.schema,
            &mut self.feedback.path,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }

    /// Serializes to pretty TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Default settings file location, if the platform has a config directory.
pub fn default_settings_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
}

/// Reads and parses one settings file.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_settings(path, &contents)
}

fn parse_settings(path: &Path, contents: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(settings.relative_to(base))
}

/// Loads settings from an explicit path, or from the default location.
///
/// An explicit file must exist and parse. A missing default file yields
/// [`Settings::default`]; a default file that exists but does not parse is
/// still an error.
pub fn resolve_settings(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "Loading settings");
        return load_settings(path);
    }
    let Some(path) = default_settings_path() else {
        return Ok(Settings::default());
    };
    match fs::read_to_string(&path) {
        Ok(contents) => {
            debug!(path = %path.display(), "Loading settings");
            parse_settings(&path, &contents)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Settings::default()),
        Err(source) => Err(ConfigError::Read { path, source }),
    }
}

/// Resolves the admin secret.
///
/// Order: the `LOAN_DESK_ADMIN_PASSWORD` variable (read through `env`),
/// then `admin.password_sha256`, then the development password when
/// `insecure_dev_mode` is set. `None` means the console cannot be unlocked.
pub fn resolve_admin_secret<F>(admin: &AdminSettings, env: F) -> Result<Option<AdminSecret>>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(password) = env(ADMIN_PASSWORD_ENV).filter(|value| !value.is_empty()) {
        return Ok(Some(AdminSecret::from_password(&password)));
    }
    if let Some(digest) = admin.password_sha256.as_deref() {
        return AdminSecret::from_hex(digest)
            .map(Some)
            .map_err(ConfigError::InvalidAdminDigest);
    }
    if admin.insecure_dev_mode {
        warn!("Using the built-in development admin password");
        return Ok(Some(AdminSecret::from_password(DEV_ADMIN_PASSWORD)));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn empty_file_gives_defaults() {
        let settings = parse_settings(Path::new("settings.toml"), "").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let settings = parse_settings(
            Path::new("/etc/loan-desk/settings.toml"),
            "[feedback]\npath = \"/var/lib/loan/feedback.csv\"\n",
        )
        .unwrap();
        assert_eq!(settings.feedback.path, Path::new("/var/lib/loan/feedback.csv"));
        assert_eq!(
            settings.model.artifact,
            Path::new("/etc/loan-desk").join(DEFAULT_ARTIFACT)
        );
        assert!(!settings.admin.insecure_dev_mode);
    }

    #[test]
    fn round_trips_through_toml() {
        let mut settings = Settings::default();
        settings.admin.password_sha256 = Some("ab".repeat(32));
        let text = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn secret_prefers_environment() {
        let admin = AdminSettings {
            password_sha256: Some(loan_admin::sha256_hex(b"from-file")),
            insecure_dev_mode: true,
        };
        let secret = resolve_admin_secret(&admin, |name| {
            (name == ADMIN_PASSWORD_ENV).then(|| "from-env".to_string())
        })
        .unwrap()
        .unwrap();
        assert!(secret.verify("from-env"));
        assert!(!secret.verify("from-file"));
    }

    #[test]
    fn secret_from_digest() {
        let admin = AdminSettings {
            password_sha256: Some(loan_admin::sha256_hex(b"from-file")),
            insecure_dev_mode: false,
        };
        let secret = resolve_admin_secret(&admin, no_env).unwrap().unwrap();
        assert!(secret.verify("from-file"));
    }

    #[test]
    fn dev_password_only_in_dev_mode() {
        assert!(
            resolve_admin_secret(&AdminSettings::default(), no_env)
                .unwrap()
                .is_none()
        );
        let dev = AdminSettings {
            insecure_dev_mode: true,
            ..AdminSettings::default()
        };
        let secret = resolve_admin_secret(&dev, no_env).unwrap().unwrap();
        assert!(secret.verify(DEV_ADMIN_PASSWORD));
    }

    #[test]
    fn malformed_digest_is_an_error() {
        let admin = AdminSettings {
            password_sha256: Some("not-hex".to_string()),
            insecure_dev_mode: true,
        };
        assert!(matches!(
            resolve_admin_secret(&admin, no_env),
            Err(ConfigError::InvalidAdminDigest(_))
        ));
    }
}
