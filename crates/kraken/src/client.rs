use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use common::{
    BalanceSnapshot, Credentials, Error, OrderRequest, Result, WithdrawRequest,
};

use crate::nonce::NonceSource;
use crate::sign;

/// REST API client for Kraken. Holds the credentials and nonce source for
/// exactly one invocation; nothing outlives the run.
pub struct KrakenClient {
    base_url: String,
    credentials: Credentials,
    nonces: NonceSource,
    http: Client,
}

impl KrakenClient {
    pub fn new(base_url: impl Into<String>, credentials: Credentials, nonces: NonceSource) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            nonces,
            http: Client::builder()
                .use_rustls_tls()
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    /// Query account balances. Signed call with its own nonce.
    pub async fn balance(&self) -> Result<BalanceSnapshot> {
        self.private_post("/0/private/Balance", &[]).await
    }

    /// Submit a limit buy order.
    ///
    /// Body field order is fixed by the wire contract:
    /// `nonce, ordertype, pair, price, type, volume[, oflags, timeinforce, expiretm]`.
    pub async fn add_order(&self, order: &OrderRequest) -> Result<serde_json::Value> {
        let mut params: Vec<(&str, String)> = vec![
            ("ordertype", "limit".to_string()),
            ("pair", order.pair.clone()),
            ("price", order.price.to_string()),
            ("type", "buy".to_string()),
            ("volume", order.volume.to_string()),
        ];
        if let Some(oflags) = &order.oflags {
            params.push(("oflags", oflags.clone()));
        }
        if let Some(expiretm) = order.expiretm {
            params.push(("timeinforce", "GTD".to_string()));
            params.push(("expiretm", expiretm.to_string()));
        }

        debug!(pair = %order.pair, price = %order.price, "Submitting order to Kraken");
        self.private_post("/0/private/AddOrder", &params).await
    }

    /// Withdraw to a whitelisted address key.
    ///
    /// Body field order: `nonce, asset, key, amount`.
    pub async fn withdraw(&self, withdrawal: &WithdrawRequest) -> Result<serde_json::Value> {
        let params: Vec<(&str, String)> = vec![
            ("asset", withdrawal.asset.clone()),
            ("key", withdrawal.key.clone()),
            ("amount", withdrawal.amount.to_string()),
        ];

        debug!(asset = %withdrawal.asset, key = %withdrawal.key, "Submitting withdrawal to Kraken");
        self.private_post("/0/private/Withdraw", &params).await
    }

    /// Sign and POST one private call.
    ///
    /// The body string built here is both what gets signed and what gets
    /// transmitted; a second construction site would let the two drift and
    /// the exchange would reject the signature.
    async fn private_post<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let nonce = self.nonces.next().to_string();
        let mut body = format!("nonce={nonce}");
        for (key, value) in params {
            body.push_str(&format!("&{key}={value}"));
        }
        let signature = sign::sign(path, &body, &nonce, self.credentials.secret_key())?;

        let url = format!("{}{path}", self.base_url);
        let resp = self
            .http
            .post(&url)
            .header("API-Key", self.credentials.api_key())
            .header("API-Sign", signature)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| Error::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(Error::Transport(format!("HTTP {status}: {text}")));
        }

        let envelope: KrakenResponse<T> = serde_json::from_str(&text)
            .map_err(|e| Error::Transport(format!("malformed exchange response: {e}")))?;
        envelope.into_result()
    }

    /// Unauthenticated GET against a public endpoint.
    pub(crate) async fn public_get<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T> {
        let url = format!("{}{path_and_query}", self.base_url);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| Error::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(Error::Transport(format!("HTTP {status}: {text}")));
        }

        let envelope: KrakenResponse<T> = serde_json::from_str(&text)
            .map_err(|e| Error::Transport(format!("malformed exchange response: {e}")))?;
        envelope.into_result()
    }
}

// ─── Response envelope ────────────────────────────────────────────────────────

/// Every Kraken response wraps its payload in `{error: [...], result: ...}`.
/// A non-empty error array is an exchange rejection even on HTTP 200.
#[derive(Deserialize)]
pub(crate) struct KrakenResponse<T> {
    #[serde(default)]
    error: Vec<String>,
    result: Option<T>,
}

impl<T> KrakenResponse<T> {
    pub(crate) fn into_result(self) -> Result<T> {
        if !self.error.is_empty() {
            return Err(Error::Exchange(self.error));
        }
        self.result
            .ok_or_else(|| Error::Transport("exchange response missing result".to_string()))
    }
}
