use std::sync::Arc;

use tracing::info;

use common::{
    BuyEvent, Config, Credentials, Error, OrderRequest, Result, SecretStore, WithdrawEvent,
    WithdrawRequest,
};
use kraken::{expiry, sizing, KrakenClient, NonceProvider, NonceSource, WallClockNonce};

/// Order flags sent with every DCA buy: fees charged in the quote currency.
const BUY_OFLAGS: &str = "fciq";

/// Sequences the signed calls of one invocation: balance → price → order
/// for buys, balance → withdraw for withdrawals.
///
/// Holds no exchange state; credentials are fetched fresh per flow call and
/// dropped with the per-invocation client. Nothing is ever resubmitted:
/// at-most-once submission per invocation is the safety property, and the
/// exchange's nonce rules are the idempotency guard.
pub struct Orchestrator {
    config: Config,
    secrets: Arc<dyn SecretStore>,
    nonces: Arc<dyn NonceProvider>,
}

impl Orchestrator {
    pub fn new(config: Config, secrets: Arc<dyn SecretStore>) -> Self {
        Self::with_nonce_provider(config, secrets, Arc::new(WallClockNonce::new()))
    }

    /// Construction seam for tests that need deterministic nonces.
    pub fn with_nonce_provider(
        config: Config,
        secrets: Arc<dyn SecretStore>,
        nonces: Arc<dyn NonceProvider>,
    ) -> Self {
        Self {
            config,
            secrets,
            nonces,
        }
    }

    /// Place one limit buy order funded by the full available balance of the
    /// event's currency.
    pub async fn place_buy_order(&self, event: &BuyEvent) -> Result<serde_json::Value> {
        let client = self.client().await?;

        let balance = client.balance().await?;
        let budget = balance.available(&event.currency).ok_or_else(|| {
            Error::Validation(format!(
                "currency '{}' not present in balance",
                event.currency
            ))
        })?;

        let bid = client.best_bid(&event.trading_pair).await?;
        let volume = sizing::compute_volume(budget, bid)?;

        let expiretm = match event.order_validity_minutes {
            Some(minutes) => {
                let server_time = client.server_time().await?;
                Some(expiry::compute_expiry(server_time, minutes))
            }
            None => None,
        };

        info!(
            volume = %volume,
            crypto = %event.crypto_to_buy,
            price = %bid,
            currency = %event.currency,
            "Placing order"
        );

        let order = OrderRequest {
            pair: event.trading_pair.clone(),
            price: bid,
            volume,
            oflags: Some(BUY_OFLAGS.to_string()),
            expiretm,
        };
        client.add_order(&order).await
    }

    /// Withdraw the configured fixed amount to a whitelisted address key.
    /// No price discovery; the balance lookup still runs first and any
    /// exchange error there is terminal.
    pub async fn withdraw(&self, event: &WithdrawEvent) -> Result<serde_json::Value> {
        let amount = self.config.withdraw_amount.ok_or_else(|| {
            Error::Config("WITHDRAW_AMOUNT is not configured".to_string())
        })?;

        let client = self.client().await?;

        let balance = client.balance().await?;
        info!(
            asset = %event.asset_to_withdraw,
            available = ?balance.available(&event.asset_to_withdraw),
            amount = %amount,
            "Submitting withdrawal"
        );

        let withdrawal = WithdrawRequest {
            asset: event.asset_to_withdraw.clone(),
            key: event.withdrawal_address_key.clone(),
            amount,
        };
        client.withdraw(&withdrawal).await
    }

    /// Build the per-invocation client: fresh credentials, fresh nonce
    /// source (so a pinned reuse nonce never leaks across invocations).
    async fn client(&self) -> Result<KrakenClient> {
        let credentials = Credentials::load(self.secrets.as_ref(), &self.config).await?;
        let nonces = NonceSource::new(Arc::clone(&self.nonces), self.config.nonce_policy);
        Ok(KrakenClient::new(
            self.config.api_base_url.clone(),
            credentials,
            nonces,
        ))
    }
}
