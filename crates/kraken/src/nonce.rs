//! Nonce generation for signed requests.
//!
//! The exchange requires a strictly increasing nonce per key pair. Within
//! one process the wall-clock source is made monotonic with an atomic CAS;
//! overlapping invocations in separate processes rely on millisecond
//! wall-clock resolution alone, and a collision is rejected by the exchange.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use common::NoncePolicy;

pub trait NonceProvider: Send + Sync {
    /// Next nonce, strictly greater than any previously returned.
    fn next(&self) -> u64;
}

/// Millisecond wall-clock nonces, monotonic within the process.
#[derive(Debug, Default)]
pub struct WallClockNonce {
    last: AtomicU64,
}

impl WallClockNonce {
    pub fn new() -> Self {
        Self::default()
    }

    fn now_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before Unix epoch")
            .as_millis() as u64
    }
}

impl NonceProvider for WallClockNonce {
    fn next(&self) -> u64 {
        let now = Self::now_ms();
        loop {
            let prev = self.last.load(Ordering::Acquire);
            let next = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return next,
                Err(_) => continue,
            }
        }
    }
}

/// Deterministic nonce sequence for tests.
#[derive(Debug)]
pub struct SequenceNonce {
    next: AtomicU64,
}

impl SequenceNonce {
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl NonceProvider for SequenceNonce {
    fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::AcqRel)
    }
}

/// Per-invocation nonce assignment.
///
/// Under [`NoncePolicy::FreshPerCall`] every signed call draws a new nonce
/// from the provider. Under [`NoncePolicy::ReusePerInvocation`] the first
/// nonce drawn is pinned and reused for every signed call of this source's
/// lifetime. Construct one source per invocation, never share across runs.
pub struct NonceSource {
    provider: Arc<dyn NonceProvider>,
    policy: NoncePolicy,
    pinned: OnceLock<u64>,
}

impl NonceSource {
    pub fn new(provider: Arc<dyn NonceProvider>, policy: NoncePolicy) -> Self {
        Self {
            provider,
            policy,
            pinned: OnceLock::new(),
        }
    }

    pub fn wall_clock(policy: NoncePolicy) -> Self {
        Self::new(Arc::new(WallClockNonce::new()), policy)
    }

    /// Nonce for the next signed call, per policy.
    pub fn next(&self) -> u64 {
        match self.policy {
            NoncePolicy::FreshPerCall => self.provider.next(),
            NoncePolicy::ReusePerInvocation => *self.pinned.get_or_init(|| self.provider.next()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_clock_nonces_strictly_increase() {
        let provider = WallClockNonce::new();
        let mut prev = 0;
        for _ in 0..1000 {
            let nonce = provider.next();
            assert!(nonce > prev, "nonce must be strictly increasing");
            prev = nonce;
        }
    }

    #[test]
    fn wall_clock_nonces_unique_across_threads() {
        let provider = Arc::new(WallClockNonce::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let provider = Arc::clone(&provider);
                std::thread::spawn(move || (0..500).map(|_| provider.next()).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        let total = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), total, "all nonces must be unique across threads");
    }

    #[test]
    fn fresh_policy_draws_a_new_nonce_per_call() {
        let source = NonceSource::new(
            Arc::new(SequenceNonce::starting_at(100)),
            NoncePolicy::FreshPerCall,
        );
        assert_eq!(source.next(), 100);
        assert_eq!(source.next(), 101);
    }

    #[test]
    fn reuse_policy_pins_the_first_nonce() {
        let source = NonceSource::new(
            Arc::new(SequenceNonce::starting_at(100)),
            NoncePolicy::ReusePerInvocation,
        );
        assert_eq!(source.next(), 100);
        assert_eq!(source.next(), 100);
        assert_eq!(source.next(), 100);
    }
}
