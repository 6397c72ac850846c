//! The narrow contract the host application consumes: key generation,
//! whole-buffer encrypt, whole-buffer decrypt.
//!
//! Dispatch selects the engine from the key's algorithm, draws a fresh
//! IV/nonce from the injected entropy source, and returns an [`Envelope`].
//! Decryption re-checks every public parameter before any engine runs.
//! Log events carry lengths and algorithm names only, never key or
//! plaintext material.

use tracing::{debug, warn};

use crate::aes;
use crate::aes_gcm;
use crate::chacha20_poly1305;
use crate::envelope::Envelope;
use crate::error::CryptoError;
use crate::key::{Algorithm, Key};
use crate::rand::{OsRandom, SecureRandom};
use crate::triple_des::{self, TripleDes};

/// Generate a fresh random key for `algorithm` from the OS CSPRNG.
pub fn generate_key(algorithm: Algorithm) -> Result<Key, CryptoError> {
    generate_key_with_rng(algorithm, &mut OsRandom)
}

/// [`generate_key`] with a caller-supplied entropy source.
pub fn generate_key_with_rng(
    algorithm: Algorithm,
    rng: &mut dyn SecureRandom,
) -> Result<Key, CryptoError> {
    Key::generate(algorithm, rng)
}

/// Encrypt `plaintext` under `key` with a fresh random IV/nonce.
///
/// AEAD envelopes carry `ciphertext ‖ tag`; 3DES-CBC envelopes carry the
/// PKCS#5-padded ciphertext. The IV/nonce is returned in the envelope.
pub fn encrypt(plaintext: &[u8], key: &Key) -> Result<Envelope, CryptoError> {
    encrypt_with_rng(plaintext, key, &mut OsRandom)
}

/// [`encrypt`] with a caller-supplied entropy source.
pub fn encrypt_with_rng(
    plaintext: &[u8],
    key: &Key,
    rng: &mut dyn SecureRandom,
) -> Result<Envelope, CryptoError> {
    let algorithm = key.algorithm();
    let mut iv = vec![0u8; algorithm.nonce_len()];
    rng.fill(&mut iv)?;
    debug!(%algorithm, plaintext_len = plaintext.len(), "encrypt");

    let ciphertext = match algorithm {
        Algorithm::Aes128 | Algorithm::Aes192 | Algorithm::Aes256 => {
            let rk = aes::expand_key(key.as_bytes())?;
            let nonce: &[u8; 12] = iv.as_slice().try_into().expect("12-byte nonce");
            let mut data = plaintext.to_vec();
            let tag = aes_gcm::seal(&rk, nonce, &[], &mut data);
            data.extend_from_slice(&tag);
            data
        }
        Algorithm::ChaCha20Poly1305 => {
            let cipher_key: &[u8; 32] = key.as_bytes().try_into().expect("32-byte key");
            let nonce: &[u8; 12] = iv.as_slice().try_into().expect("12-byte nonce");
            let mut data = plaintext.to_vec();
            let tag = chacha20_poly1305::seal(cipher_key, nonce, &[], &mut data);
            data.extend_from_slice(&tag);
            data
        }
        Algorithm::TripleDes112 | Algorithm::TripleDes168 => {
            let tdes = TripleDes::new(key.as_bytes())?;
            let iv8: &[u8; 8] = iv.as_slice().try_into().expect("8-byte IV");
            triple_des::encrypt_cbc(&tdes, iv8, plaintext)
        }
    };

    Ok(Envelope {
        algorithm,
        ciphertext,
        iv,
    })
}

/// Decrypt an [`Envelope`] under `key`.
///
/// The envelope's algorithm must match the key's, and the IV/nonce length
/// must be exact. For the AEAD modes the tag is verified before any
/// plaintext is produced; a mismatch is [`CryptoError::AuthenticationFailed`].
pub fn decrypt(envelope: &Envelope, key: &Key) -> Result<Vec<u8>, CryptoError> {
    let algorithm = key.algorithm();
    if envelope.algorithm != algorithm {
        return Err(CryptoError::AlgorithmMismatch {
            envelope: envelope.algorithm,
            key: algorithm,
        });
    }
    if envelope.iv.len() != algorithm.nonce_len() {
        return Err(CryptoError::InvalidNonceLength {
            expected: algorithm.nonce_len(),
            actual: envelope.iv.len(),
        });
    }
    debug!(%algorithm, ciphertext_len = envelope.ciphertext.len(), "decrypt");

    let result = match algorithm {
        Algorithm::Aes128 | Algorithm::Aes192 | Algorithm::Aes256 => {
            let rk = aes::expand_key(key.as_bytes())?;
            let nonce: &[u8; 12] = envelope.iv.as_slice().try_into().expect("length checked");
            let (body, tag) = envelope.split_tag()?;
            let mut data = body.to_vec();
            aes_gcm::open(&rk, nonce, &[], &mut data, tag).map(|_| data)
        }
        Algorithm::ChaCha20Poly1305 => {
            let cipher_key: &[u8; 32] = key.as_bytes().try_into().expect("32-byte key");
            let nonce: &[u8; 12] = envelope.iv.as_slice().try_into().expect("length checked");
            let (body, tag) = envelope.split_tag()?;
            let mut data = body.to_vec();
            chacha20_poly1305::open(cipher_key, nonce, &[], &mut data, tag).map(|_| data)
        }
        Algorithm::TripleDes112 | Algorithm::TripleDes168 => {
            let tdes = TripleDes::new(key.as_bytes())?;
            let iv8: &[u8; 8] = envelope.iv.as_slice().try_into().expect("length checked");
            triple_des::decrypt_cbc(&tdes, iv8, &envelope.ciphertext)
        }
    };

    if matches!(result, Err(CryptoError::AuthenticationFailed)) {
        warn!(%algorithm, "authentication failed, ciphertext rejected");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_algorithm_must_match_key() {
        let aes_key = Key::new(Algorithm::Aes256, vec![1u8; 32]).unwrap();
        let chacha_key = Key::new(Algorithm::ChaCha20Poly1305, vec![1u8; 32]).unwrap();
        let envelope = encrypt(b"hi", &aes_key).unwrap();
        assert_eq!(
            decrypt(&envelope, &chacha_key).unwrap_err(),
            CryptoError::AlgorithmMismatch {
                envelope: Algorithm::Aes256,
                key: Algorithm::ChaCha20Poly1305
            }
        );
    }

    #[test]
    fn nonce_length_is_exact() {
        let key = Key::new(Algorithm::Aes128, vec![1u8; 16]).unwrap();
        let mut envelope = encrypt(b"hi", &key).unwrap();
        for bad in [11usize, 13] {
            envelope.iv = vec![0u8; bad];
            assert_eq!(
                decrypt(&envelope, &key).unwrap_err(),
                CryptoError::InvalidNonceLength {
                    expected: 12,
                    actual: bad
                }
            );
        }
    }

    #[test]
    fn cbc_iv_length_is_exact() {
        let key = Key::new(Algorithm::TripleDes168, vec![1u8; 24]).unwrap();
        let mut envelope = encrypt(b"hi", &key).unwrap();
        envelope.iv = vec![0u8; 12];
        assert_eq!(
            decrypt(&envelope, &key).unwrap_err(),
            CryptoError::InvalidNonceLength {
                expected: 8,
                actual: 12
            }
        );
    }

    #[test]
    fn aead_envelope_shorter_than_tag_is_malformed() {
        let key = Key::new(Algorithm::Aes128, vec![1u8; 16]).unwrap();
        let envelope = Envelope {
            algorithm: Algorithm::Aes128,
            ciphertext: vec![0u8; 5],
            iv: vec![0u8; 12],
        };
        assert!(matches!(
            decrypt(&envelope, &key),
            Err(CryptoError::MalformedCiphertext(_))
        ));
    }

    #[test]
    fn fresh_nonce_per_encryption() {
        let key = generate_key(Algorithm::ChaCha20Poly1305).unwrap();
        let a = encrypt(b"same input", &key).unwrap();
        let b = encrypt(b"same input", &key).unwrap();
        assert_ne!(a.iv, b.iv);
        assert_ne!(a.ciphertext, b.ciphertext);
    }
}
