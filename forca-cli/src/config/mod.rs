use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_HOME: &str = "FORCA_HOME";
pub const ENV_SUPABASE_URL: &str = "FORCA_SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "FORCA_SUPABASE_ANON_KEY";
pub const ENV_API_URL: &str = "FORCA_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub ui: UiConfig,

    /// File this configuration was loaded from and is saved back to
    #[serde(skip)]
    path: Option<PathBuf>,
}

/// Managed auth/database service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub url: String,

    /// Public (anon) key sent as `apikey` on every request
    #[serde(default)]
    pub anon_key: String,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Where the password recovery email should send the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_reset_redirect: Option<String>,
}

/// Plan-generation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub base_url: String,

    #[serde(default = "default_plan_path")]
    pub plan_path: String,

    #[serde(default = "default_plan_timeout")]
    pub timeout_seconds: u64,
}

/// Persisted session of the signed-in user
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub access_token: String,

    #[serde(default)]
    pub refresh_token: String,

    /// Unix timestamp (seconds) at which the access token expires; 0 if unknown
    #[serde(default)]
    pub expires_at: i64,

    #[serde(default)]
    pub user_id: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Open the dashboard with the sleep explanation panel expanded
    #[serde(default)]
    pub show_sleep_info: bool,
}

// Default value functions
fn default_timeout() -> u64 {
    30
}

fn default_api_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_plan_path() -> String {
    "/gerar-plano".to_string()
}

fn default_plan_timeout() -> u64 {
    120
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            timeout_seconds: default_timeout(),
            password_reset_redirect: None,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            plan_path: default_plan_path(),
            timeout_seconds: default_plan_timeout(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            show_sleep_info: false,
        }
    }
}

/// Session data handed over by the auth service after sign-in or refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    pub user_id: String,
    pub email: String,
    pub username: String,
}

impl Config {
    /// Get config directory path (`$FORCA_HOME` or ~/.forca/)
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(ENV_HOME) {
            if !dir.is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }

        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".forca"))
    }

    /// Get config file path (~/.forca/config.toml)
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from `path` (or the default file), then apply
    /// environment overrides
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let config_file = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_file()?,
        };

        let mut config = match Self::read_file(&config_file)? {
            Some(config) => config,
            None => {
                tracing::info!("Config file not found at {:?}, using defaults", config_file);
                Self::default()
            }
        };

        config.path = Some(config_file);
        config.apply_overrides(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// The file's contents without environment overrides, `None` when it
    /// does not exist
    fn read_file(config_file: &Path) -> Result<Option<Self>> {
        if !config_file.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(config_file).context("Failed to read config file")?;
        let config = toml::from_str::<Config>(&contents).context("Failed to parse config file")?;
        Ok(Some(config))
    }

    /// Override service endpoints from a key lookup (the process environment
    /// in production)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(ENV_SUPABASE_URL) {
            self.backend.url = url;
        }
        if let Some(key) = non_empty(ENV_SUPABASE_ANON_KEY) {
            self.backend.anon_key = key;
        }
        if let Some(url) = non_empty(ENV_API_URL) {
            self.api.base_url = url;
        }
    }

    /// Bind this configuration to a file
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// File this configuration is saved to
    pub fn path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(p) => Ok(p.clone()),
            None => Self::config_file(),
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_file = self.path()?;
        if let Some(dir) = config_file.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&config_file, contents).context("Failed to write config file")?;

        tracing::debug!("Saved configuration to {:?}", config_file);
        Ok(())
    }

    /// Write only the `[auth]` section, leaving every other value as it is
    /// in the file. Overrides applied at load time never reach the disk.
    pub fn save_session(&self) -> Result<()> {
        let config_file = self.path()?;
        let mut on_disk = Self::read_file(&config_file)?.unwrap_or_default();
        on_disk.auth = self.auth.clone();
        on_disk.path = Some(config_file);
        on_disk.save()
    }

    /// Both the service URL and its public key are present
    pub fn has_backend(&self) -> bool {
        !self.backend.url.trim().is_empty() && !self.backend.anon_key.trim().is_empty()
    }

    /// Check if user is authenticated
    pub fn is_authenticated(&self) -> bool {
        !self.auth.access_token.is_empty()
    }

    /// True when the stored access token expires within `margin_secs`
    pub fn session_expiring(&self, margin_secs: i64) -> bool {
        self.auth.expires_at > 0 && self.auth.expires_at - margin_secs <= Utc::now().timestamp()
    }

    /// Store a fresh session
    pub fn set_session(&mut self, session: StoredSession) {
        self.auth.access_token = session.access_token;
        self.auth.refresh_token = session.refresh_token;
        self.auth.expires_at = session.expires_at;
        self.auth.user_id = session.user_id;
        self.auth.email = session.email;
        self.auth.username = session.username;
    }

    /// Clear the stored session
    pub fn clear_session(&mut self) {
        self.auth = AuthConfig::default();
    }
}
