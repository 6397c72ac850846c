//! Algorithm identifiers and validated key material.

use std::fmt;

use zeroize::Zeroize;

use crate::error::CryptoError;
use crate::rand::SecureRandom;

/// The supported cipher configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Aes128,
    Aes192,
    Aes256,
    /// ChaCha20 with a 256-bit key, Poly1305-authenticated.
    ChaCha20Poly1305,
    /// Two-key Triple DES (K1, K2, K1), 112-bit effective strength.
    TripleDes112,
    /// Three-key Triple DES (K1, K2, K3), 168-bit effective strength.
    TripleDes168,
}

impl Algorithm {
    /// Length in bytes of a raw key for this algorithm.
    pub fn key_len(self) -> usize {
        match self {
            Algorithm::Aes128 => 16,
            Algorithm::Aes192 => 24,
            Algorithm::Aes256 => 32,
            Algorithm::ChaCha20Poly1305 => 32,
            Algorithm::TripleDes112 => 16,
            Algorithm::TripleDes168 => 24,
        }
    }

    /// Length in bytes of the IV/nonce this algorithm's mode consumes.
    pub fn nonce_len(self) -> usize {
        match self {
            Algorithm::Aes128 | Algorithm::Aes192 | Algorithm::Aes256 => crate::AEAD_NONCE_LEN,
            Algorithm::ChaCha20Poly1305 => crate::AEAD_NONCE_LEN,
            Algorithm::TripleDes112 | Algorithm::TripleDes168 => crate::DES_BLOCK_LEN,
        }
    }

    /// Whether the mode appends an authentication tag to the ciphertext.
    pub fn is_aead(self) -> bool {
        !matches!(self, Algorithm::TripleDes112 | Algorithm::TripleDes168)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Aes128 => "AES-128-GCM",
            Algorithm::Aes192 => "AES-192-GCM",
            Algorithm::Aes256 => "AES-256-GCM",
            Algorithm::ChaCha20Poly1305 => "ChaCha20-Poly1305",
            Algorithm::TripleDes112 => "3DES-112-CBC",
            Algorithm::TripleDes168 => "3DES-168-CBC",
        };
        f.write_str(name)
    }
}

/// Immutable key material tagged with its algorithm.
///
/// Construction validates the byte length against the algorithm and fails
/// otherwise; there is no way to hold a wrongly-sized key. The bytes are
/// zeroized on drop and never appear in `Debug` output.
#[derive(Clone)]
pub struct Key {
    algorithm: Algorithm,
    bytes: Vec<u8>,
}

impl Key {
    /// Wrap raw key bytes, checking the length for `algorithm`.
    pub fn new(algorithm: Algorithm, bytes: Vec<u8>) -> Result<Self, CryptoError> {
        if bytes.len() != algorithm.key_len() {
            return Err(CryptoError::InvalidKeyLength {
                algorithm,
                actual: bytes.len(),
            });
        }
        Ok(Self { algorithm, bytes })
    }

    /// Generate a fresh random key for `algorithm` from `rng`.
    pub fn generate(algorithm: Algorithm, rng: &mut dyn SecureRandom) -> Result<Self, CryptoError> {
        let mut bytes = vec![0u8; algorithm.key_len()];
        rng.fill(&mut bytes)?;
        Ok(Self { algorithm, bytes })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for Key {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("algorithm", &self.algorithm)
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}
