//! Runtime adapters for promptlift (settings, secrets, credential storage).

pub mod config;
pub mod files;
pub mod keyring;
pub mod secrets;

pub use config::{Config, KeySource, Settings};
pub use keyring::CredentialStore;
pub use secrets::SecretsFile;
