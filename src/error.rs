//! Error taxonomy for the cipher engines.
//!
//! Every failure is a recoverable value returned to the caller. Precondition
//! violations (wrong key or nonce length, mismatched algorithm) are reported
//! loudly and never coerced; an AEAD tag mismatch is its own variant and
//! guarantees no plaintext escaped.

use crate::key::Algorithm;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Key bytes do not match any valid length for the algorithm.
    #[error("invalid key length {actual} for {algorithm}")]
    InvalidKeyLength {
        algorithm: Algorithm,
        actual: usize,
    },

    /// A raw engine was handed a key size it cannot use. `Key` construction
    /// normally screens this out; hitting it means a programming error in
    /// the caller.
    #[error("{engine} does not support a {actual}-byte key")]
    UnsupportedKeySize { engine: &'static str, actual: usize },

    /// IV/nonce length is wrong for the selected mode.
    #[error("invalid nonce/IV length {actual}, expected {expected}")]
    InvalidNonceLength { expected: usize, actual: usize },

    /// Envelope was produced under a different algorithm than the key.
    #[error("algorithm mismatch: envelope is {envelope}, key is {key}")]
    AlgorithmMismatch { envelope: Algorithm, key: Algorithm },

    /// Ciphertext is too short to even contain its authentication tag,
    /// or is not block-aligned for a block-cipher mode.
    #[error("malformed ciphertext: {0}")]
    MalformedCiphertext(&'static str),

    /// AEAD tag verification failed. No plaintext was produced.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The OS entropy source was unavailable.
    #[error("secure random source unavailable")]
    RandomSource,
}
