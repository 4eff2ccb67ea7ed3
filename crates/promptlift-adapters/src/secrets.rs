//! Plain-text secrets file (`KPI.env`)
//!
//! Not a dotenv file. Two free-form lines are recognised:
//!
//! ```text
//! https://integrate.api.nvidia.com/v1/chat/completions
//! nvidia API Key: nvapi-xxxx
//! ```

use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const DEFAULT_SECRETS_FILE: &str = "KPI.env";

/// Whatever the secrets file provides. Either field may be missing.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretsFile {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
}

impl std::fmt::Debug for SecretsFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretsFile")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl SecretsFile {
    pub fn parse(raw: &str) -> Self {
        let mut lines = raw.lines().map(str::trim).filter(|line| !line.is_empty());

        let endpoint = lines
            .clone()
            .find(|line| is_http_url(line))
            .map(str::to_string);

        let api_key = lines
            .find(|line| mentions_api_key(line))
            .and_then(|line| line.split_once(':'))
            .map(|(_, rest)| rest.trim())
            .filter(|key| !key.is_empty())
            .map(str::to_string);

        Self { endpoint, api_key }
    }

    /// Read and parse `path`. A missing file is not an error.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read secrets file '{}'", path.display()))?;
        Ok(Some(Self::parse(&raw)))
    }
}

/// `KPI.env` in the working directory.
pub fn default_secrets_path() -> PathBuf {
    PathBuf::from(DEFAULT_SECRETS_FILE)
}

fn is_http_url(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

static API_KEY_LABEL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)api\s*key").ok());

/// "api key", case-insensitive, with any whitespace (or none) between the words.
fn mentions_api_key(line: &str) -> bool {
    API_KEY_LABEL.as_ref().is_some_and(|re| re.is_match(line))
}
