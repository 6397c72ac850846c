//! ChaCha20-Poly1305 AEAD composition (RFC 8439 section 2.8).
//!
//! The Poly1305 one-time key is the first 32 bytes of the ChaCha20 keystream
//! at counter 0; the payload is encrypted starting at counter 1; the MAC
//! covers `pad16(AAD) ‖ pad16(ciphertext) ‖ len(AAD)_8le ‖ len(ct)_8le`.
//!
//! Nonce reuse under one key is a caller contract violation the engine
//! cannot detect; the API layer draws a fresh nonce per call.

use crate::chacha20;
use crate::error::CryptoError;
use crate::poly1305;
use crate::util::constant_time_eq;
use crate::TAG_LEN;

/// First 32 keystream bytes at counter 0 become the one-time MAC key.
fn mac_key(key: &[u8; 32], nonce: &[u8; 12]) -> [u8; 32] {
    let block = chacha20::block(key, nonce, 0);
    let mut out = [0u8; 32];
    out.copy_from_slice(&block[..32]);
    out
}

/// Assemble the MAC input per RFC 8439 section 2.8.1.
fn mac_input(aad: &[u8], ciphertext: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(aad.len() + ciphertext.len() + 48);
    buf.extend_from_slice(aad);
    pad16(&mut buf);
    buf.extend_from_slice(ciphertext);
    pad16(&mut buf);
    buf.extend_from_slice(&(aad.len() as u64).to_le_bytes());
    buf.extend_from_slice(&(ciphertext.len() as u64).to_le_bytes());
    buf
}

#[inline]
fn pad16(buf: &mut Vec<u8>) {
    let rem = buf.len() % 16;
    if rem != 0 {
        buf.resize(buf.len() + 16 - rem, 0);
    }
}

/// Encrypt `data` in place and return the authentication tag.
pub fn seal(key: &[u8; 32], nonce: &[u8; 12], aad: &[u8], data: &mut Vec<u8>) -> [u8; TAG_LEN] {
    let otk = mac_key(key, nonce);
    chacha20::xor_keystream(key, nonce, 1, data);
    poly1305::tag(&mac_input(aad, data), &otk)
}

/// Verify `tag` over `data`, then decrypt `data` in place.
///
/// On mismatch the buffer is left as received and
/// [`CryptoError::AuthenticationFailed`] is returned.
pub fn open(
    key: &[u8; 32],
    nonce: &[u8; 12],
    aad: &[u8],
    data: &mut Vec<u8>,
    tag: &[u8; TAG_LEN],
) -> Result<(), CryptoError> {
    let otk = mac_key(key, nonce);
    let expected = poly1305::tag(&mac_input(aad, data), &otk);
    if !constant_time_eq(&expected, tag) {
        return Err(CryptoError::AuthenticationFailed);
    }
    chacha20::xor_keystream(key, nonce, 1, data);
    Ok(())
}
