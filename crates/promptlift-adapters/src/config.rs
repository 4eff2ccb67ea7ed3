//! Configuration management for promptlift
//!
//! Settings live in `~/.config/promptlift/config.toml` (or `PROMPTLIFT_CONFIG`).
//! The endpoint and API key are resolved from several sources, first hit wins:
//!
//! | value    | order                                                  |
//! |----------|--------------------------------------------------------|
//! | API key  | `NVIDIA_API_KEY`, secrets file, credential store       |
//! | endpoint | `NVIDIA_API_ENDPOINT`, secrets file, settings, default |
//! | port     | `PORT`, settings (read by `serve` only)                |
//!
//! An unusable endpoint or an unreadable secrets file is logged and leaves the
//! remote path unconfigured; it never stops the local path from running.

use crate::files::{preserve_corrupt, write_private_atomic};
use crate::keyring::CredentialStore;
use crate::secrets::{default_secrets_path, SecretsFile};
use anyhow::{anyhow, bail, Context, Result};
use promptlift_engine::{RemoteSettings, DEFAULT_ENDPOINT, REQUEST_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_PATH_ENV: &str = "PROMPTLIFT_CONFIG";
pub const API_KEY_ENV: &str = "NVIDIA_API_KEY";
pub const ENDPOINT_ENV: &str = "NVIDIA_API_ENDPOINT";
pub const PORT_ENV: &str = "PORT";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8787;

/// On-disk settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub request_timeout_secs: u64,
    pub host: String,
    pub port: u16,
    /// Defaults to `KPI.env` in the working directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: None,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            secrets_file: None,
        }
    }
}

impl Settings {
    fn sanitize(&mut self) {
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = REQUEST_TIMEOUT_SECS;
        }
        if self.host.trim().is_empty() {
            self.host = DEFAULT_HOST.to_string();
        }
        self.endpoint = self
            .endpoint
            .take()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
    }

    /// Settings file path, honouring `PROMPTLIFT_CONFIG`.
    pub fn path() -> Option<PathBuf> {
        if let Some(path) = non_blank(std::env::var(CONFIG_PATH_ENV).ok()) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|p| p.join("promptlift").join("config.toml"))
    }

    /// Get the settings file location for display
    pub fn location() -> String {
        Self::path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "~/.config/promptlift/config.toml".to_string())
    }

    pub fn load() -> Self {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load settings from `path`, or defaults when it is missing.
    ///
    /// An unparseable file is moved aside to `<path>.corrupt` and defaults are
    /// returned.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str::<Settings>(&content) {
            Ok(mut settings) => {
                settings.sanitize();
                settings
            }
            Err(err) => {
                preserve_corrupt(path, &content);
                tracing::warn!(
                    path = %path.display(),
                    "settings file was corrupted ({}), a backup was saved and defaults were loaded",
                    err.message()
                );
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::path().ok_or_else(|| anyhow!("Could not determine config directory"))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let mut sanitized = self.clone();
        sanitized.sanitize();

        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(&sanitized).context("Failed to serialize settings")?;
        write_private_atomic(path, &content).context("Failed to write settings")
    }

    pub fn secrets_path(&self) -> PathBuf {
        self.secrets_file.clone().unwrap_or_else(default_secrets_path)
    }
}

/// Where the API key came from, for status output. Never carries the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Environment,
    SecretsFile,
    CredentialStore,
}

impl KeySource {
    pub fn label(&self) -> &'static str {
        match self {
            KeySource::Environment => API_KEY_ENV,
            KeySource::SecretsFile => "secrets file",
            KeySource::CredentialStore => "credential store",
        }
    }
}

/// Fully resolved runtime configuration.
#[derive(Clone)]
pub struct Config {
    pub settings: Settings,
    /// Validated endpoint; `None` when the configured value is not an http(s) URL
    pub endpoint: Option<String>,
    pub host: String,
    api_key: Option<String>,
    key_source: Option<KeySource>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("host", &self.host)
            .field("key_source", &self.key_source)
            .finish()
    }
}

impl Config {
    /// Resolve from the process environment, the settings file, the secrets
    /// file and the credential store.
    pub fn load() -> Self {
        let settings = Settings::load();
        let secrets_path = settings.secrets_path();
        let secrets = read_secrets(&secrets_path);
        let store = CredentialStore::detect().ok();
        Self::resolve(
            settings,
            |name| std::env::var(name).ok(),
            secrets,
            store.as_ref(),
        )
    }

    /// Pure resolution over explicit sources. The credential store is only
    /// consulted when no earlier source has a key.
    pub fn resolve(
        settings: Settings,
        env: impl Fn(&str) -> Option<String>,
        secrets: Option<SecretsFile>,
        store: Option<&CredentialStore>,
    ) -> Self {
        let secrets = secrets.unwrap_or_default();

        let endpoint = non_blank(env(ENDPOINT_ENV))
            .or_else(|| non_blank(secrets.endpoint.clone()))
            .or_else(|| settings.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = match validate_endpoint(&endpoint) {
            Ok(endpoint) => Some(endpoint),
            Err(err) => {
                tracing::warn!("{:#}; the model is disabled", err);
                None
            }
        };

        let (api_key, key_source) = if let Some(key) = non_blank(env(API_KEY_ENV)) {
            (Some(key), Some(KeySource::Environment))
        } else if let Some(key) = non_blank(secrets.api_key.clone()) {
            (Some(key), Some(KeySource::SecretsFile))
        } else {
            match store.map(CredentialStore::api_key) {
                Some(Ok(Some(key))) => (Some(key), Some(KeySource::CredentialStore)),
                Some(Err(err)) => {
                    tracing::warn!("couldn't read API key from credential store: {:#}", err);
                    (None, None)
                }
                _ => (None, None),
            }
        };

        Self {
            host: settings.host.clone(),
            endpoint,
            api_key,
            key_source,
            settings,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn key_source(&self) -> Option<KeySource> {
        self.key_source
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.request_timeout_secs)
    }

    /// Server port from `PORT`, else the settings file.
    pub fn port(&self) -> Result<u16> {
        resolve_port(|name| std::env::var(name).ok(), self.settings.port)
    }

    /// `None` when no API key was found anywhere or the endpoint is unusable;
    /// callers then skip the remote path entirely.
    pub fn remote_settings(&self) -> Option<RemoteSettings> {
        let key = self.api_key.clone()?;
        let endpoint = self.endpoint.clone()?;
        Some(RemoteSettings::new(endpoint, Some(key)).with_timeout(self.request_timeout()))
    }
}

pub fn resolve_port(env: impl Fn(&str) -> Option<String>, fallback: u16) -> Result<u16> {
    match non_blank(env(PORT_ENV)) {
        Some(raw) => raw
            .parse::<u16>()
            .with_context(|| format!("{} must be a port number, got '{}'", PORT_ENV, raw)),
        None => Ok(fallback),
    }
}

/// A secrets file that exists but can't be read counts as absent.
fn read_secrets(path: &Path) -> Option<SecretsFile> {
    match SecretsFile::load(path) {
        Ok(Some(secrets)) => {
            tracing::debug!(path = %path.display(), "loaded secrets file");
            Some(secrets)
        }
        Ok(None) => None,
        Err(err) => {
            tracing::warn!("{:#}; ignoring it", err);
            None
        }
    }
}

/// The endpoint must be an absolute http(s) URL.
pub fn validate_endpoint(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let url = url::Url::parse(trimmed)
        .with_context(|| format!("Invalid API endpoint '{}'", trimmed))?;
    match url.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => bail!(
            "Invalid API endpoint '{}': unsupported scheme '{}'",
            trimmed,
            other
        ),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validate API key format. NVIDIA keys usually start with `nvapi-`.
pub fn looks_like_nvidia_key(key: &str) -> bool {
    key.trim().starts_with("nvapi-")
}

/// Interactive prompt to store the API key
pub fn setup_api_key_interactive() -> Result<()> {
    use std::io::{self, Write};

    let store = CredentialStore::detect()?;

    println!();
    println!("  promptlift setup");
    println!();
    println!("  promptlift rewrites prompts with a model hosted on NVIDIA's API.");
    println!("  Without a key it still works, using local heuristics only.");
    println!();
    println!("  Steps:");
    println!("    1) Create a key at https://build.nvidia.com");
    println!("    2) Paste the key below and press Enter");
    println!();
    println!("  We'll store it in your {}.", store.label());
    println!(
        "  Prefer env vars? Set {} and skip this step.",
        API_KEY_ENV
    );
    println!();
    print!("  API Key: ");
    io::stdout().flush()?;

    let mut key = String::new();
    io::stdin().read_line(&mut key)?;
    let key = key.trim();

    if key.is_empty() {
        bail!("No API key provided");
    }

    if !looks_like_nvidia_key(key) {
        println!();
        println!("  Warning: Key doesn't look like an NVIDIA key (usually starts with nvapi-)");
        println!("     Saving anyway...");
    }

    store.set_api_key(key).with_context(|| {
        format!(
            "You can set the {} environment variable instead",
            API_KEY_ENV
        )
    })?;

    println!();
    println!("  + API key saved to {}", store.label());
    println!();
    Ok(())
}
