use std::collections::HashMap;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::{Config, Error, Result};

/// Abstraction over the managed parameter store that supplies API
/// credentials.
///
/// Injected into the orchestrator at construction so tests can substitute
/// a [`StaticSecretStore`] without process-wide state.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch a secret by parameter name. Missing or unreadable parameters
    /// are configuration errors.
    async fn get_secret(&self, name: &str) -> Result<SecretString>;
}

/// Secret store backed by environment variables.
///
/// Parameter names map to variable names by uppercasing and replacing
/// dashes: `kraken-private-api-key` → `KRAKEN_PRIVATE_API_KEY`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretStore;

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn get_secret(&self, name: &str) -> Result<SecretString> {
        let var = name.to_uppercase().replace('-', "_");
        std::env::var(&var)
            .map(SecretString::from)
            .map_err(|_| Error::Config(format!("secret '{name}' not found (env var {var})")))
    }
}

/// In-memory secret store for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretStore {
    secrets: HashMap<String, String>,
}

impl StaticSecretStore {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            secrets: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl SecretStore for StaticSecretStore {
    async fn get_secret(&self, name: &str) -> Result<SecretString> {
        self.secrets
            .get(name)
            .cloned()
            .map(SecretString::from)
            .ok_or_else(|| Error::Config(format!("secret '{name}' not found")))
    }
}

/// API key pair retrieved once per invocation and held only in memory.
///
/// The secret key is wrapped in [`SecretString`] so it cannot be
/// Debug-printed and its memory is zeroed on drop.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    secret_key: SecretString,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, secret_key: SecretString) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key,
        }
    }

    /// Fetch both halves of the key pair from the secret store.
    pub async fn load(store: &dyn SecretStore, config: &Config) -> Result<Self> {
        use secrecy::ExposeSecret;

        let secret_key = store.get_secret(&config.private_key_param).await?;
        let api_key = store.get_secret(&config.public_key_param).await?;
        Ok(Self::new(api_key.expose_secret(), secret_key))
    }

    /// The public API key, sent as the `API-Key` header.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The base64-encoded private key used for request signing.
    pub fn secret_key(&self) -> &SecretString {
        &self.secret_key
    }
}
