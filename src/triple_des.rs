//! Triple DES in CBC mode with PKCS#5 padding.
//!
//! EDE composition over the DES primitive: the two-key variant runs
//! K1-K2-K1, the three-key variant K1-K2-K3. CBC chains 8-byte blocks
//! behind a random 8-byte IV supplied by the caller.
//!
//! This mode carries no authentication tag. Unpadding is deliberately
//! lenient: invalid padding hands the buffer back unstripped rather than
//! erroring, preserving the long-standing observable behavior of the
//! system this engine replaces. That leniency is a known weakness (a
//! tampered ciphertext decrypts to garbage instead of failing), inherent
//! to unauthenticated CBC.

use std::fmt;

use crate::des::Des;
use crate::error::CryptoError;
use crate::DES_BLOCK_LEN;

/// An EDE Triple-DES instance built from 16 or 24 key bytes.
pub struct TripleDes {
    k1: Des,
    k2: Des,
    k3: Des,
}

impl fmt::Debug for TripleDes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TripleDes").finish_non_exhaustive()
    }
}

impl TripleDes {
    /// Split the key material into K1/K2(/K3). A 16-byte key reuses K1 in
    /// the final stage (two-key EDE); a 24-byte key is three-key EDE.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        match key.len() {
            16 => Ok(Self {
                k1: Des::new(&key[..8].try_into().expect("8-byte slice")),
                k2: Des::new(&key[8..16].try_into().expect("8-byte slice")),
                k3: Des::new(&key[..8].try_into().expect("8-byte slice")),
            }),
            24 => Ok(Self {
                k1: Des::new(&key[..8].try_into().expect("8-byte slice")),
                k2: Des::new(&key[8..16].try_into().expect("8-byte slice")),
                k3: Des::new(&key[16..24].try_into().expect("8-byte slice")),
            }),
            n => Err(CryptoError::UnsupportedKeySize {
                engine: "3DES",
                actual: n,
            }),
        }
    }

    /// E(K1) → D(K2) → E(K3) over one block.
    fn encrypt_block(&self, block: &mut [u8; 8]) {
        self.k1.encrypt(block);
        self.k2.decrypt(block);
        self.k3.encrypt(block);
    }

    /// D(K3) → E(K2) → D(K1) over one block.
    fn decrypt_block(&self, block: &mut [u8; 8]) {
        self.k3.decrypt(block);
        self.k2.encrypt(block);
        self.k1.decrypt(block);
    }
}

/// CBC-encrypt `plaintext`, PKCS#5-padding it first. Output length is the
/// padded length (always a non-zero multiple of 8).
pub fn encrypt_cbc(tdes: &TripleDes, iv: &[u8; 8], plaintext: &[u8]) -> Vec<u8> {
    let mut data = pad(plaintext);
    let mut prev = *iv;
    for chunk in data.chunks_exact_mut(DES_BLOCK_LEN) {
        let block: &mut [u8; 8] = chunk.try_into().expect("exact chunk");
        for (b, p) in block.iter_mut().zip(prev.iter()) {
            *b ^= p;
        }
        tdes.encrypt_block(block);
        prev = *block;
    }
    data
}

/// CBC-decrypt `ciphertext` and strip PKCS#5 padding (leniently).
///
/// Each block is decrypted and XORed with the previous *ciphertext* block
/// (the IV for the first).
pub fn decrypt_cbc(
    tdes: &TripleDes,
    iv: &[u8; 8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    if ciphertext.len() % DES_BLOCK_LEN != 0 {
        return Err(CryptoError::MalformedCiphertext(
            "not a multiple of the DES block length",
        ));
    }
    let mut data = ciphertext.to_vec();
    let mut prev = *iv;
    for chunk in data.chunks_exact_mut(DES_BLOCK_LEN) {
        let block: &mut [u8; 8] = chunk.try_into().expect("exact chunk");
        let cipher_block = *block;
        tdes.decrypt_block(block);
        for (b, p) in block.iter_mut().zip(prev.iter()) {
            *b ^= p;
        }
        prev = cipher_block;
    }
    Ok(unpad(data))
}

/// PKCS#5: append `8 - (len % 8)` bytes, each holding that value. Input
/// already on a block boundary gets a full pad block, so the pad is always
/// present and unambiguous.
fn pad(input: &[u8]) -> Vec<u8> {
    let pad_len = DES_BLOCK_LEN - input.len() % DES_BLOCK_LEN;
    let mut out = Vec::with_capacity(input.len() + pad_len);
    out.extend_from_slice(input);
    out.resize(input.len() + pad_len, pad_len as u8);
    out
}

/// Strip PKCS#5 padding if it validates; otherwise return the data as-is.
fn unpad(mut data: Vec<u8>) -> Vec<u8> {
    let Some(&last) = data.last() else {
        return data;
    };
    let n = last as usize;
    if n == 0 || n > DES_BLOCK_LEN || n > data.len() {
        return data;
    }
    if data[data.len() - n..].iter().all(|&b| b == last) {
        data.truncate(data.len() - n);
    }
    data
}
