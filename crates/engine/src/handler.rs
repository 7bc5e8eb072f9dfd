use tracing::error;

use common::{Error, HandlerResponse, TriggerEvent};

use crate::Orchestrator;

/// Run one invocation: decode the trigger payload, execute the matching
/// flow, and map the outcome to a `{statusCode, body}` response.
///
/// Every failure is caught here: the trigger layer sees structured
/// responses, never a panic or a raw error chain.
pub async fn handle(orchestrator: &Orchestrator, payload: &str) -> HandlerResponse {
    let event: TriggerEvent = match serde_json::from_str(payload) {
        Ok(event) => event,
        Err(e) => {
            error!(error = %e, "Trigger payload did not match any flow");
            return HandlerResponse::bad_request("Missing or invalid input", e.to_string());
        }
    };

    let outcome = match &event {
        TriggerEvent::Buy(buy) => orchestrator
            .place_buy_order(buy)
            .await
            .map(|result| ("Order placed successfully", result)),
        TriggerEvent::Withdraw(withdrawal) => orchestrator
            .withdraw(withdrawal)
            .await
            .map(|result| ("Withdrawal submitted successfully", result)),
    };

    match outcome {
        Ok((message, result)) => HandlerResponse::ok(message, result),
        Err(err) => {
            error!(error = %err, "Invocation failed");
            response_for(err)
        }
    }
}

/// Status mapping: bad input, bad configuration, and exchange rejections
/// are the caller's 400s; transport and signing internals are 500s.
fn response_for(err: Error) -> HandlerResponse {
    let detail = err.to_string();
    match err {
        Error::Config(_) => HandlerResponse::bad_request("Missing or invalid configuration", detail),
        Error::Validation(_) => HandlerResponse::bad_request("Validation failed", detail),
        Error::Exchange(_) => HandlerResponse::bad_request("Exchange rejected the request", detail),
        Error::Transport(_) => HandlerResponse::server_error("API request failed", detail),
        Error::Encoding(_) | Error::Json(_) => {
            HandlerResponse::server_error("Internal error", detail)
        }
    }
}
