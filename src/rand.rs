//! Entropy abstraction.
//!
//! Key, IV and nonce generation is the only operation here with an external
//! resource dependency, so it goes through a trait the tests can replace with
//! deterministic bytes.

use crate::error::CryptoError;

/// Source of cryptographically secure random bytes.
pub trait SecureRandom {
    /// Fill `buf` entirely with random bytes.
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), CryptoError>;
}

/// The operating system CSPRNG (`getrandom`).
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl SecureRandom for OsRandom {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), CryptoError> {
        getrandom::fill(buf).map_err(|_| CryptoError::RandomSource)
    }
}
