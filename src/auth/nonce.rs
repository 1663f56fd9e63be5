//! Nonce generation for Kraken API authentication.
//!
//! Every request body carries a `nonce`. Kraken rejects private requests whose
//! nonce does not increase for a given key.

use std::sync::atomic::{AtomicU64, Ordering};

use time::OffsetDateTime;

/// Trait for providing nonces for requests.
pub trait NonceProvider: Send + Sync {
    /// Generate the next nonce value.
    fn next_nonce(&self) -> u64;
}

/// Clock-derived nonce: milliseconds since UNIX epoch multiplied by 1000.
///
/// This is the default provider. Two calls within the same millisecond
/// produce the same value; use [`IncreasingNonce`] when that matters.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimestampNonce;

impl TimestampNonce {
    fn current_time_millis() -> u64 {
        let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
        u64::try_from(nanos / 1_000_000).unwrap_or_default()
    }
}

impl NonceProvider for TimestampNonce {
    fn next_nonce(&self) -> u64 {
        Self::current_time_millis() * 1000
    }
}

/// A nonce provider that generates strictly increasing nonces based on time.
///
/// Uses microseconds since UNIX epoch, with an atomic counter to ensure
/// uniqueness even for requests made in the same microsecond.
#[derive(Debug)]
pub struct IncreasingNonce {
    last_nonce: AtomicU64,
}

impl IncreasingNonce {
    /// Create a new increasing nonce provider.
    pub fn new() -> Self {
        Self {
            last_nonce: AtomicU64::new(0),
        }
    }

    fn current_time_micros() -> u64 {
        let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
        u64::try_from(nanos / 1_000).unwrap_or_default()
    }
}

impl Default for IncreasingNonce {
    fn default() -> Self {
        Self::new()
    }
}

impl NonceProvider for IncreasingNonce {
    fn next_nonce(&self) -> u64 {
        let time_nonce = Self::current_time_micros();

        // Use the max of current time and last + 1.
        loop {
            let last = self.last_nonce.load(Ordering::SeqCst);
            let next = time_nonce.max(last + 1);

            if self
                .last_nonce
                .compare_exchange(last, next, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                return next;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn test_timestamp_nonce_has_millisecond_resolution() {
        let nonce = TimestampNonce.next_nonce();
        assert_eq!(nonce % 1000, 0);
        // Some time after 2020-01-01 in microseconds.
        assert!(nonce > 1_577_836_800_000_000);
    }

    #[test]
    fn test_timestamp_nonce_never_decreases() {
        let mut last = 0u64;
        for _ in 0..100 {
            let nonce = TimestampNonce.next_nonce();
            assert!(nonce >= last);
            last = nonce;
        }
    }

    #[test]
    fn test_nonce_strictly_increasing() {
        let provider = IncreasingNonce::new();

        let mut last = 0u64;
        for _ in 0..1000 {
            let nonce = provider.next_nonce();
            assert!(nonce > last, "Nonce must be strictly increasing");
            last = nonce;
        }
    }

    #[test]
    fn test_nonce_unique_across_threads() {
        let provider = std::sync::Arc::new(IncreasingNonce::new());
        let mut handles = vec![];

        for _ in 0..4 {
            let p = provider.clone();
            handles.push(thread::spawn(move || {
                (0..1000).map(|_| p.next_nonce()).collect::<Vec<_>>()
            }));
        }

        let mut all_nonces = HashSet::new();
        for handle in handles {
            for nonce in handle.join().unwrap() {
                assert!(all_nonces.insert(nonce), "Nonce must be unique across threads");
            }
        }
    }
}
