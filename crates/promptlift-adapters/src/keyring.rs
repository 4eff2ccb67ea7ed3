//! Credential storage for the model API key
//!
//! The key lives in the system keychain as a small JSON document. When the
//! keychain is disabled (or unusable, e.g. in CI) a 0600 JSON file under the
//! config directory is used instead.

use anyhow::{anyhow, Context, Result};
use keyring::Entry;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const KEYRING_SERVICE: &str = "promptlift-credentials";
const KEYRING_USERNAME: &str = "default";

const DISABLE_KEYRING_ENV: &str = "PROMPTLIFT_DISABLE_KEYRING";
const CREDENTIALS_FILE_ENV: &str = "PROMPTLIFT_CREDENTIALS_FILE";

#[derive(Clone, Default, Serialize, Deserialize)]
struct StoredCredentials {
    #[serde(skip_serializing_if = "Option::is_none")]
    nvidia_api_key: Option<String>,
}

/// Where `setup` writes the key and where resolution looks for it last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialStore {
    Keychain,
    File(PathBuf),
}

impl CredentialStore {
    /// Keychain unless disabled by environment, or a populated credentials
    /// file already exists (avoids interactive keychain prompts).
    pub fn detect() -> Result<Self> {
        let fallback = Self::File(fallback_credentials_path()?);
        if cfg!(test) || env_flag(DISABLE_KEYRING_ENV) {
            return Ok(fallback);
        }
        if matches!(fallback.api_key(), Ok(Some(_))) {
            return Ok(fallback);
        }
        Ok(Self::Keychain)
    }

    /// Human-friendly backend label used in CLI messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Keychain => "system keychain",
            Self::File(_) => "local credentials file",
        }
    }

    pub fn api_key(&self) -> Result<Option<String>> {
        Ok(self
            .read()?
            .nvidia_api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty()))
    }

    /// Store `key`, then read it back to make sure it persisted.
    pub fn set_api_key(&self, key: &str) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(anyhow!("API key is empty"));
        }

        let mut creds = self.read().unwrap_or_default();
        creds.nvidia_api_key = Some(key.to_string());
        self.write(&creds)
            .with_context(|| format!("Failed to store API key in {}", self.label()))?;

        match self.api_key()? {
            Some(stored) if stored == key => Ok(()),
            Some(_) => Err(anyhow!(
                "API key verification failed: stored key doesn't match in {}",
                self.label()
            )),
            None => Err(anyhow!(
                "API key verification failed: key was not persisted to {}",
                self.label()
            )),
        }
    }

    fn read(&self) -> Result<StoredCredentials> {
        match self {
            Self::Keychain => read_keychain(),
            Self::File(path) => read_credentials_file(path),
        }
    }

    fn write(&self, creds: &StoredCredentials) -> Result<()> {
        match self {
            Self::Keychain => write_keychain(creds),
            Self::File(path) => write_credentials_file(path, creds),
        }
    }
}

fn env_flag(name: &str) -> bool {
    matches!(
        std::env::var(name)
            .unwrap_or_default()
            .trim()
            .to_lowercase()
            .as_str(),
        "1" | "true" | "yes"
    )
}

fn fallback_credentials_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CREDENTIALS_FILE_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }

    if cfg!(test) {
        return Ok(std::env::temp_dir().join("promptlift-test-credentials.json"));
    }

    dirs::config_dir()
        .map(|p| p.join("promptlift").join("credentials.json"))
        .ok_or_else(|| anyhow!("Could not determine credentials file path"))
}

fn keyring_entry() -> Result<Entry> {
    Entry::new(KEYRING_SERVICE, KEYRING_USERNAME).context("Failed to open keychain entry")
}

fn read_keychain() -> Result<StoredCredentials> {
    match keyring_entry()?.get_password() {
        Ok(json) => serde_json::from_str(&json).context("Failed to parse stored credentials"),
        Err(keyring::Error::NoEntry) => Ok(StoredCredentials::default()),
        Err(err) => Err(anyhow!("Couldn't access system keychain: {}", err)),
    }
}

fn write_keychain(creds: &StoredCredentials) -> Result<()> {
    let json = serde_json::to_string(creds).context("Failed to serialize credentials")?;
    keyring_entry()?
        .set_password(&json)
        .map_err(|err| anyhow!("Couldn't write to system keychain: {}", err))
}

fn read_credentials_file(path: &Path) -> Result<StoredCredentials> {
    if !path.exists() {
        return Ok(StoredCredentials::default());
    }
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read credentials file '{}'", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse credentials file '{}'", path.display()))
}

fn write_credentials_file(path: &Path, creds: &StoredCredentials) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!(
                "Failed to create credentials directory '{}'",
                parent.display()
            )
        })?;
    }

    let content = serde_json::to_string(creds).context("Failed to serialize credentials")?;
    crate::files::write_private_atomic(path, &content)
        .with_context(|| format!("Failed to write credentials file '{}'", path.display()))
}
