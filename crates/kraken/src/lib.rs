pub mod client;
pub mod expiry;
pub mod market;
pub mod nonce;
pub mod sign;
pub mod sizing;

pub use client::KrakenClient;
pub use nonce::{NonceProvider, NonceSource, SequenceNonce, WallClockNonce};
