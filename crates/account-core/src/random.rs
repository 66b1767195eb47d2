//! Thread-safe helpers on top of a cryptographically secure random source.
//!
//! The free functions use a process-wide [`SystemRandom`]; code that wants to
//! inject a source takes a `&dyn Random` instead.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{Rng, RngCore};

pub trait Random: Send + Sync {
    /// Uniform integer in `[0, n)`. Panics when `n == 0`.
    fn intn(&self, n: u64) -> u64;

    fn fill_bytes(&self, buf: &mut [u8]);

    fn bytes(&self, n: usize) -> Vec<u8> {
        let mut buf = vec![0u8; n];
        self.fill_bytes(&mut buf);
        buf
    }

    /// Random string of roughly `n` characters from the URL-safe base64 alphabet.
    fn string(&self, n: usize) -> String {
        URL_SAFE_NO_PAD.encode(self.bytes(n * 6 / 8))
    }
}

/// Backed by the thread-local CSPRNG, which is seeded from the OS.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRandom;

impl Random for SystemRandom {
    fn intn(&self, n: u64) -> u64 {
        assert!(n > 0, "random::intn called with n == 0");
        rand::rng().random_range(0..n)
    }

    fn fill_bytes(&self, buf: &mut [u8]) {
        rand::rng().fill_bytes(buf);
    }
}

static GLOBAL: SystemRandom = SystemRandom;

pub fn intn(n: u64) -> u64 {
    GLOBAL.intn(n)
}

pub fn bytes(n: usize) -> Vec<u8> {
    GLOBAL.bytes(n)
}

pub fn fill_bytes(buf: &mut [u8]) {
    GLOBAL.fill_bytes(buf)
}

pub fn string(n: usize) -> String {
    GLOBAL.string(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intn_stays_in_range() {
        for _ in 0..1000 {
            assert!(intn(7) < 7);
        }
        assert_eq!(intn(1), 0);
    }

    #[test]
    fn bytes_have_requested_length_and_vary() {
        assert_eq!(bytes(0).len(), 0);
        let a = bytes(32);
        let b = bytes(32);
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }

    #[test]
    fn string_is_url_safe() {
        let s = string(16);
        assert_eq!(s.len(), 16);
        assert!(s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));

        assert_eq!(string(32).len(), 32);
    }

    #[test]
    #[should_panic]
    fn intn_rejects_zero() {
        intn(0);
    }
}
