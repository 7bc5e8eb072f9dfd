use std::io::Read;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use common::{Config, EnvSecretStore};
use engine::{handle, Orchestrator};

/// One scheduled invocation: read the trigger event (first argument, or
/// stdin when absent), run the matching flow, print the structured
/// response. Exit code mirrors the response status so cron-style
/// schedulers see failures.
#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    info!(nonce_policy = %cfg.nonce_policy, "dcabot starting");

    // ── Trigger event ─────────────────────────────────────────────────────────
    let payload = match std::env::args().nth(1) {
        Some(arg) => arg,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .unwrap_or_else(|e| panic!("Failed to read trigger event from stdin: {e}"));
            buf
        }
    };

    // ── One invocation ────────────────────────────────────────────────────────
    let orchestrator = Orchestrator::new(cfg, Arc::new(EnvSecretStore));
    let response = handle(&orchestrator, &payload).await;

    println!(
        "{}",
        serde_json::to_string(&response).expect("response serializes")
    );
    if response.status_code != 200 {
        std::process::exit(1);
    }
}
