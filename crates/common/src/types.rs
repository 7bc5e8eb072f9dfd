use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inbound trigger payload. The scheduler invokes exactly one flow per run;
/// the two payload shapes are disjoint, so untagged deserialization picks
/// the right one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TriggerEvent {
    Buy(BuyEvent),
    Withdraw(WithdrawEvent),
}

/// Recurring limit-buy (DCA) trigger.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyEvent {
    /// Asset being accumulated, used only for logging (e.g. "XBT").
    pub crypto_to_buy: String,
    /// Kraken pair name as it appears in Ticker results (e.g. "XXBTZUSD").
    pub trading_pair: String,
    /// Balance currency funding the buy (e.g. "ZUSD"). The full available
    /// amount becomes the order budget.
    pub currency: String,
    /// Order validity window in minutes. `None` = good-till-cancelled.
    #[serde(default)]
    pub order_validity_minutes: Option<u32>,
}

/// Ad-hoc withdrawal trigger. The amount comes from configuration, never
/// from the event payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawEvent {
    pub asset_to_withdraw: String,
    /// Description of the whitelisted withdrawal address on the exchange.
    pub withdrawal_address_key: String,
}

/// A limit buy order ready for submission. Price is already truncated;
/// volume carries full division precision.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub pair: String,
    pub price: Decimal,
    pub volume: Decimal,
    /// Order flags, e.g. "fciq" (fees in quote) or "post" (post-only).
    pub oflags: Option<String>,
    /// Absolute unix expiry. `Some` makes the order good-till-date.
    pub expiretm: Option<i64>,
}

/// A withdrawal to a whitelisted address key.
#[derive(Debug, Clone)]
pub struct WithdrawRequest {
    pub asset: String,
    pub key: String,
    pub amount: Decimal,
}

/// Account balances as returned by the exchange, fetched fresh per
/// invocation and never cached.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct BalanceSnapshot(pub HashMap<String, Decimal>);

impl BalanceSnapshot {
    pub fn available(&self, currency: &str) -> Option<Decimal> {
        self.0.get(currency).copied()
    }
}

/// How nonces are assigned to the signed calls of one invocation.
///
/// `FreshPerCall` is the correct behavior under the exchange's nonce
/// monotonicity rules. `ReusePerInvocation` reproduces the legacy behavior
/// of signing every call of one run with the first nonce drawn; it exists
/// so the difference stays observable and testable rather than implicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoncePolicy {
    #[default]
    FreshPerCall,
    ReusePerInvocation,
}

impl std::fmt::Display for NoncePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoncePolicy::FreshPerCall => write!(f, "fresh"),
            NoncePolicy::ReusePerInvocation => write!(f, "reuse"),
        }
    }
}

/// Response returned to the trigger layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    pub body: ResponseBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HandlerResponse {
    pub fn ok(message: impl Into<String>, result: serde_json::Value) -> Self {
        Self {
            status_code: 200,
            body: ResponseBody {
                message: message.into(),
                result: Some(result),
                error: None,
            },
        }
    }

    pub fn bad_request(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self::failure(400, message, error)
    }

    pub fn server_error(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self::failure(500, message, error)
    }

    fn failure(status_code: u16, message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            status_code,
            body: ResponseBody {
                message: message.into(),
                result: None,
                error: Some(error.into()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn buy_event_deserializes_from_camel_case() {
        let event: TriggerEvent = serde_json::from_str(
            r#"{"cryptoToBuy":"XBT","tradingPair":"XXBTZUSD","currency":"ZUSD","orderValidityMinutes":60}"#,
        )
        .unwrap();
        match event {
            TriggerEvent::Buy(buy) => {
                assert_eq!(buy.trading_pair, "XXBTZUSD");
                assert_eq!(buy.order_validity_minutes, Some(60));
            }
            TriggerEvent::Withdraw(_) => panic!("expected buy event"),
        }
    }

    #[test]
    fn buy_event_validity_is_optional() {
        let event: BuyEvent = serde_json::from_str(
            r#"{"cryptoToBuy":"XBT","tradingPair":"XXBTZUSD","currency":"ZUSD"}"#,
        )
        .unwrap();
        assert_eq!(event.order_validity_minutes, None);
    }

    #[test]
    fn withdraw_event_deserializes_from_camel_case() {
        let event: TriggerEvent = serde_json::from_str(
            r#"{"assetToWithdraw":"ETH","withdrawalAddressKey":"eth_hardwallet"}"#,
        )
        .unwrap();
        match event {
            TriggerEvent::Withdraw(w) => {
                assert_eq!(w.asset_to_withdraw, "ETH");
                assert_eq!(w.withdrawal_address_key, "eth_hardwallet");
            }
            TriggerEvent::Buy(_) => panic!("expected withdraw event"),
        }
    }

    #[test]
    fn balance_snapshot_parses_string_amounts() {
        let snapshot: BalanceSnapshot =
            serde_json::from_str(r#"{"ZUSD":"1000.5","XXBT":"0.25"}"#).unwrap();
        assert_eq!(snapshot.available("ZUSD"), Some(dec!(1000.5)));
        assert_eq!(snapshot.available("ZEUR"), None);
    }

    #[test]
    fn handler_response_serializes_status_code_camel_case() {
        let resp = HandlerResponse::ok("done", serde_json::json!({"txid": ["ABC"]}));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["body"]["message"], "done");
        assert!(json["body"].get("error").is_none());
    }
}
