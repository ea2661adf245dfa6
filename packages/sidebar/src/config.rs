use anyhow::{Context, Result};
use matryx_client::{ClientConfig, DEFAULT_API_PREFIX, DEFAULT_USER_AGENT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

use crate::controller::{ControllerSettings, DEFAULT_MESSAGE_LIMIT, DEFAULT_ROOM_NAME};

/// Environment variable that overrides `access_token`
pub const ACCESS_TOKEN_ENV: &str = "MATRIX_ACCESS_TOKEN";

const CONFIG_DIR_NAME: &str = "matryx-sidebar";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Sidebar configuration, read from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SidebarConfig {
    /// Base URL of the homeserver
    pub homeserver_url: String,

    /// Path prefix of the client-server API
    pub api_prefix: String,

    /// Bearer token from a previous login
    pub access_token: Option<String>,

    /// Whole-request timeout in seconds
    pub timeout_secs: u64,

    pub user_agent: String,

    /// Name for rooms created with an empty name field
    pub default_room_name: String,

    /// Timeline page size for message fetches
    pub message_limit: u32,

    /// Level filter used when `RUST_LOG` is not set
    pub log_level: String,

    /// Directory for daily log files; stderr when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            homeserver_url: "https://matrix.org".to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            access_token: None,
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_room_name: DEFAULT_ROOM_NAME.to_string(),
            message_limit: DEFAULT_MESSAGE_LIMIT,
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl SidebarConfig {
    /// `<config dir>/matryx-sidebar/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load from `path`, or from the default location if it exists, then apply
    /// environment overrides. Missing fields take their defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|path| path.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => {
                    debug!("No config file found, using defaults");
                    Self::default()
                },
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Apply overrides read through `lookup`; empty values are ignored
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ACCESS_TOKEN_ENV).filter(|token| !token.is_empty()) {
            self.access_token = Some(token);
        }
    }

    /// HTTP-layer settings
    pub fn client_config(&self) -> std::result::Result<ClientConfig, url::ParseError> {
        Ok(ClientConfig {
            homeserver_url: Url::parse(&self.homeserver_url)?,
            api_prefix: self.api_prefix.clone(),
            timeout_secs: self.timeout_secs,
            user_agent: self.user_agent.clone(),
        })
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            default_room_name: self.default_room_name.clone(),
            message_limit: self.message_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SidebarConfig::default();
        assert_eq!(config.homeserver_url, "https://matrix.org");
        assert_eq!(config.api_prefix, "/_matrix/client/r0");
        assert_eq!(config.default_room_name, "New Room");
        assert_eq!(config.access_token, None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SidebarConfig::from_toml(
            r#"
            homeserver_url = "https://example.org"
            access_token = "syt_abc"
            message_limit = 20
            "#,
        )
        .unwrap();

        assert_eq!(config.homeserver_url, "https://example.org");
        assert_eq!(config.access_token.as_deref(), Some("syt_abc"));
        assert_eq!(config.message_limit, 20);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_room_name = \"Scratch\"\nlog_dir = \"/tmp/matryx\"").unwrap();

        let config = SidebarConfig::from_file(file.path()).unwrap();
        assert_eq!(config.default_room_name, "Scratch");
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/matryx")));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SidebarConfig::load(Some(dir.path().join("absent.toml").as_path())).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(SidebarConfig::from_toml("timeout_secs = \"soon\"").is_err());
    }

    #[test]
    fn test_env_override() {
        let mut config = SidebarConfig::default();
        config.access_token = Some("from_file".to_string());

        config.apply_env_overrides(|_| Some(String::new()));
        assert_eq!(config.access_token.as_deref(), Some("from_file"));

        config.apply_env_overrides(|key| (key == ACCESS_TOKEN_ENV).then(|| "from_env".to_string()));
        assert_eq!(config.access_token.as_deref(), Some("from_env"));
    }

    #[test]
    fn test_client_config_rejects_bad_url() {
        let config = SidebarConfig { homeserver_url: "not a url".to_string(), ..SidebarConfig::default() };
        assert!(config.client_config().is_err());
    }
}
