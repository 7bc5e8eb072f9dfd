pub mod config;
pub mod error;
pub mod secrets;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use secrets::{Credentials, EnvSecretStore, SecretStore, StaticSecretStore};
pub use types::*;
