//! Public market-data endpoints: best bid and server time.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use common::{Error, Result};

use crate::client::KrakenClient;
use crate::sizing::{self, PRICE_SCALE};

impl KrakenClient {
    /// Current best bid for `pair`, truncated to the submission price scale.
    pub async fn best_bid(&self, pair: &str) -> Result<Decimal> {
        let tickers: HashMap<String, Ticker> =
            self.public_get(&format!("/0/public/Ticker?pair={pair}")).await?;

        let ticker = tickers.get(pair).ok_or_else(|| {
            Error::Transport(format!("pair '{pair}' missing from ticker response"))
        })?;
        let top_bid = ticker
            .b
            .first()
            .ok_or_else(|| Error::Transport("ticker response has no bid levels".to_string()))?;

        Ok(sizing::truncate_price(sizing::parse_price(top_bid)?, PRICE_SCALE))
    }

    /// The exchange's own clock, used as the trusted time source for
    /// expiration math.
    pub async fn server_time(&self) -> Result<f64> {
        let time: ServerTime = self.public_get("/0/public/Time").await?;
        Ok(time.unixtime)
    }
}

// ─── Response types ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct Ticker {
    /// Bid levels: `[price, whole lot volume, lot volume]`.
    b: Vec<String>,
}

#[derive(Deserialize)]
struct ServerTime {
    unixtime: f64,
}
