use rust_decimal::Decimal;

use crate::NoncePolicy;

/// All configuration loaded from environment variables at startup.
/// Invalid values cause an immediate panic with a clear message. Credentials
/// themselves are not configuration; they come from the [`crate::SecretStore`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Exchange REST base URL. Overridable so flow tests can point at a mock.
    pub api_base_url: String,

    /// Secret-store parameter names for the API key pair.
    pub private_key_param: String,
    pub public_key_param: String,

    /// Nonce assignment across the signed calls of one invocation.
    pub nonce_policy: NoncePolicy,

    /// Fixed amount sent by the withdrawal flow. Required only when a
    /// withdrawal event is processed.
    pub withdraw_amount: Option<Decimal>,
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        let nonce_policy = match optional_env("NONCE_POLICY").as_deref() {
            None | Some("fresh") => NoncePolicy::FreshPerCall,
            Some("reuse") => NoncePolicy::ReusePerInvocation,
            Some(other) => panic!(
                "ERROR: NONCE_POLICY must be 'fresh' or 'reuse', got: '{other}'"
            ),
        };

        let withdraw_amount = optional_env("WITHDRAW_AMOUNT").map(|v| {
            v.parse::<Decimal>().unwrap_or_else(|_| {
                panic!("WITHDRAW_AMOUNT is not a valid decimal amount: '{v}'")
            })
        });

        Config {
            api_base_url: optional_env("KRAKEN_API_BASE_URL")
                .unwrap_or_else(|| "https://api.kraken.com".to_string()),
            private_key_param: optional_env("KRAKEN_PRIVATE_KEY_PARAM")
                .unwrap_or_else(|| "kraken-private-api-key".to_string()),
            public_key_param: optional_env("KRAKEN_PUBLIC_KEY_PARAM")
                .unwrap_or_else(|| "kraken-public-api-key".to_string()),
            nonce_policy,
            withdraw_amount,
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
