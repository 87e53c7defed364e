use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Scope granted to sandbox applications registered with TikTok
pub const SANDBOX_SCOPE: &str = "user.info.basic";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KolokoiSettings {
    pub application: ApplicationSettings,
    pub static_files: StaticFilesSettings,
    pub tiktok: TikTokSettings,
    pub oauth_state: OAuthStateSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    /// Front-end page that receives the session handoff parameters
    pub frontend_path: String,
    pub cors_origins: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticFilesSettings {
    pub assets_folder: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TikTokSettings {
    // Credentials are left empty here; supply them through Settings.toml
    // or the TIKTOK_CLIENT_KEY / TIKTOK_CLIENT_SECRET environment variables.
    pub client_key: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub userinfo_endpoint: String,
    pub scopes: Vec<String>,
    pub sandbox: bool,
    /// Upper bound for each outbound call to TikTok
    pub request_timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthStateSettings {
    /// How long an issued `state` value stays redeemable
    pub ttl_seconds: u64,
    /// Upper bound on unredeemed states; the oldest is evicted past it
    pub max_pending: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            frontend_path: "/index.html".to_string(),
            cors_origins: "http://localhost:3000".to_string(),
        }
    }
}

impl Default for StaticFilesSettings {
    fn default() -> Self {
        Self {
            assets_folder: "public".to_string(),
        }
    }
}

impl Default for TikTokSettings {
    fn default() -> Self {
        Self {
            client_key: String::new(),
            client_secret: String::new(),
            redirect_uri: "http://localhost:3000/api/tiktok/callback".to_string(),
            authorization_endpoint: "https://www.tiktok.com/v2/auth/authorize/".to_string(),
            token_endpoint: "https://open.tiktokapis.com/v2/oauth/token/".to_string(),
            userinfo_endpoint: "https://open.tiktokapis.com/v2/user/info/".to_string(),
            scopes: vec![SANDBOX_SCOPE.to_string()],
            sandbox: true,
            request_timeout_seconds: 10,
            connect_timeout_seconds: 5,
        }
    }
}

impl Default for OAuthStateSettings {
    fn default() -> Self {
        Self {
            ttl_seconds: 600,
            max_pending: 10_000,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl KolokoiSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Logger initialization fails
    /// - Settings file cannot be read or parsed
    pub fn load() -> anyhow::Result<Self> {
        Self::load_env_file();

        let mut settings = Self::load_base_settings()?;
        Self::apply_env_overrides(&mut settings);

        env_logger::Builder::new()
            .parse_filters(&settings.logging.level)
            .try_init()
            .context("failed to initialize logger")?;

        Ok(settings)
    }

    /// Load base settings from TOML file(s) or use defaults
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `KOLOKOI_SECRETS_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file exists but cannot be read or parsed
    fn load_base_settings() -> anyhow::Result<Self> {
        let mut settings = Self::default();

        let default_config_path = Path::new("Settings.toml");
        if default_config_path.exists() {
            settings = Self::from_file(default_config_path)?;
            println!(
                "✓ Loaded base settings from {}",
                default_config_path.display()
            );
        }

        if let Ok(secrets_dir) = std::env::var("KOLOKOI_SECRETS_DIR") {
            let secrets_path = Path::new(&secrets_dir).join("Settings.toml");
            if secrets_path.exists() {
                settings = Self::from_file(&secrets_path)?;
                println!("✓ Overriding settings from {}", secrets_path.display());
            } else {
                println!(
                    "ℹ KOLOKOI_SECRETS_DIR set but no Settings.toml found at: {}",
                    secrets_path.display()
                );
            }
        }

        Ok(settings)
    }

    /// Parse a single TOML settings file; missing sections fall back to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let toml_content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        basic_toml::from_str(&toml_content)
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Self) {
        Self::apply_application_env_overrides(&mut settings.application);
        Self::apply_static_files_env_overrides(&mut settings.static_files);
        Self::apply_tiktok_env_overrides(&mut settings.tiktok);
        Self::apply_numeric_env_override(
            "OAUTH_STATE_TTL_SECONDS",
            &mut settings.oauth_state.ttl_seconds,
        );
        Self::apply_numeric_env_override(
            "OAUTH_STATE_MAX_PENDING",
            &mut settings.oauth_state.max_pending,
        );
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            settings.logging.level = log_level;
        }
    }

    fn apply_application_env_overrides(app_settings: &mut ApplicationSettings) {
        if let Ok(host) = std::env::var("HOST") {
            app_settings.host = host;
        }
        if let Ok(port_str) = std::env::var("PORT") {
            if let Ok(port) = port_str.parse::<u16>() {
                app_settings.port = port;
            }
        }
        if let Ok(frontend_path) = std::env::var("FRONTEND_PATH") {
            app_settings.frontend_path = frontend_path;
        }
        if let Ok(cors_origins) = std::env::var("CORS_ORIGINS") {
            app_settings.cors_origins = cors_origins;
        }
    }

    fn apply_static_files_env_overrides(static_settings: &mut StaticFilesSettings) {
        if let Ok(assets_folder) = std::env::var("STATIC_FOLDER_PATH") {
            static_settings.assets_folder = assets_folder;
        }
    }

    /// Apply environment overrides for the TikTok client
    pub fn apply_tiktok_env_overrides(tiktok: &mut TikTokSettings) {
        Self::apply_string_env_override("TIKTOK_CLIENT_KEY", &mut tiktok.client_key);
        Self::apply_string_env_override("TIKTOK_CLIENT_SECRET", &mut tiktok.client_secret);
        Self::apply_string_env_override("TIKTOK_REDIRECT_URI", &mut tiktok.redirect_uri);
        Self::apply_numeric_env_override(
            "TIKTOK_REQUEST_TIMEOUT_SECONDS",
            &mut tiktok.request_timeout_seconds,
        );
        Self::apply_numeric_env_override(
            "TIKTOK_CONNECT_TIMEOUT_SECONDS",
            &mut tiktok.connect_timeout_seconds,
        );
    }

    /// Empty values are ignored so a blank `.env` entry cannot wipe a configured credential
    fn apply_string_env_override(env_var: &str, target: &mut String) {
        if let Ok(value) = std::env::var(env_var) {
            if !value.trim().is_empty() {
                *target = value.trim().to_string();
            }
        }
    }

    fn apply_numeric_env_override<T: std::str::FromStr>(env_var: &str, target: &mut T) {
        if let Ok(value_str) = std::env::var(env_var) {
            if let Ok(value) = value_str.trim().parse::<T>() {
                *target = value;
            }
        }
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        if let Ok(contents) = std::fs::read_to_string(".env") {
            for line in contents.lines() {
                let line = line.trim();
                if line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim());
                }
            }
        }
    }

    /// Get the bind address for the server
    #[must_use]
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }

    /// Get CORS origins as a vector of strings
    #[must_use]
    pub fn get_cors_origins(&self) -> Vec<String> {
        self.application
            .cors_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl TikTokSettings {
    /// Both halves of the client credential pair are present
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.client_key.is_empty() && !self.client_secret.is_empty()
    }

    /// Redacted client key for diagnostics
    #[must_use]
    pub fn client_key_preview(&self) -> String {
        if self.client_key.is_empty() {
            return "NOT SET".to_string();
        }
        let prefix: String = self.client_key.chars().take(8).collect();
        format!("{prefix}...")
    }
}
