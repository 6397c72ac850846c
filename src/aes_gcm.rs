//! AES-GCM authenticated encryption (NIST SP 800-38D).
//!
//! Counter mode over the block engine plus a GHASH tag. `seal`/`open` work
//! in place on the caller's buffer; the 16-byte tag travels separately at
//! this layer (the API layer appends it to the ciphertext). `open` verifies
//! the tag over the received ciphertext *before* generating any keystream,
//! so a tampered message never yields plaintext.

use crate::aes::{encrypt_block, RoundKeys};
use crate::error::CryptoError;
use crate::gf;
use crate::util::constant_time_eq;
use crate::TAG_LEN;

/// Increment the last 32 bits of the counter block, big-endian with carry.
#[inline]
fn inc32(counter: &mut [u8; 16]) {
    let mut n = u32::from_be_bytes([counter[12], counter[13], counter[14], counter[15]]);
    n = n.wrapping_add(1);
    counter[12..].copy_from_slice(&n.to_be_bytes());
}

/// GHASH over `data`, which the callers pad to a 16-byte multiple.
fn ghash(h: u128, data: &[u8]) -> u128 {
    let mut y = 0u128;
    for chunk in data.chunks(16) {
        let mut block = [0u8; 16];
        block[..chunk.len()].copy_from_slice(chunk);
        y = gf::mul128(y ^ u128::from_be_bytes(block), h);
    }
    y
}

/// `pad16(aad) ‖ pad16(ciphertext) ‖ len(aad)_bits_64be ‖ len(ct)_bits_64be`
fn ghash_input(aad: &[u8], ciphertext: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(aad.len() + ciphertext.len() + 48);
    buf.extend_from_slice(aad);
    while buf.len() % 16 != 0 {
        buf.push(0);
    }
    buf.extend_from_slice(ciphertext);
    while buf.len() % 16 != 0 {
        buf.push(0);
    }
    buf.extend_from_slice(&(aad.len() as u64 * 8).to_be_bytes());
    buf.extend_from_slice(&(ciphertext.len() as u64 * 8).to_be_bytes());
    buf
}

/// `J0 = nonce ‖ 0x00000001` for the 96-bit nonce form.
fn initial_counter(nonce: &[u8; 12]) -> [u8; 16] {
    let mut counter = [0u8; 16];
    counter[..12].copy_from_slice(nonce);
    counter[15] = 1;
    counter
}

/// XOR `data` with the CTR keystream starting one increment past `j0`.
fn ctr_xor(rk: &RoundKeys, j0: &[u8; 16], data: &mut [u8]) {
    let mut counter = *j0;
    for chunk in data.chunks_mut(16) {
        inc32(&mut counter);
        let mut keystream = counter;
        encrypt_block(rk, &mut keystream);
        for (b, k) in chunk.iter_mut().zip(keystream.iter()) {
            *b ^= k;
        }
    }
}

/// Hash subkey `H = E_K(0^128)`, derived once per operation.
fn hash_subkey(rk: &RoundKeys) -> u128 {
    let mut block = [0u8; 16];
    encrypt_block(rk, &mut block);
    u128::from_be_bytes(block)
}

/// Tag = GHASH_H(aad, ciphertext) XOR E_K(J0).
fn auth_tag(rk: &RoundKeys, h: u128, j0: &[u8; 16], aad: &[u8], ciphertext: &[u8]) -> [u8; TAG_LEN] {
    let s = ghash(h, &ghash_input(aad, ciphertext));

    let mut j0_enc = *j0;
    encrypt_block(rk, &mut j0_enc);
    (u128::from_be_bytes(j0_enc) ^ s).to_be_bytes()
}

/// Encrypt `data` in place and return the authentication tag.
pub fn seal(rk: &RoundKeys, nonce: &[u8; 12], aad: &[u8], data: &mut Vec<u8>) -> [u8; TAG_LEN] {
    let h = hash_subkey(rk);
    let j0 = initial_counter(nonce);
    ctr_xor(rk, &j0, data);
    auth_tag(rk, h, &j0, aad, data)
}

/// Verify `tag` over `data`, then decrypt `data` in place.
///
/// On mismatch the buffer is left as received and
/// [`CryptoError::AuthenticationFailed`] is returned.
pub fn open(
    rk: &RoundKeys,
    nonce: &[u8; 12],
    aad: &[u8],
    data: &mut Vec<u8>,
    tag: &[u8; TAG_LEN],
) -> Result<(), CryptoError> {
    let h = hash_subkey(rk);
    let j0 = initial_counter(nonce);
    let expected = auth_tag(rk, h, &j0, aad, data);
    if !constant_time_eq(&expected, tag) {
        return Err(CryptoError::AuthenticationFailed);
    }
    ctr_xor(rk, &j0, data);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aes::expand_key;

    // NIST SP 800-38D validation cases 1/2 (AES-128) and 13/14 (AES-256)
    // with all-zero key and nonce and empty AAD, plus case 4 (AES-128,
    // non-empty AAD, partial final block).

    #[test]
    fn nist_case_1_empty_plaintext() {
        let rk = expand_key(&[0u8; 16]).unwrap();
        let mut data = Vec::new();
        let tag = seal(&rk, &[0u8; 12], &[], &mut data);
        assert!(data.is_empty());
        assert_eq!(
            tag,
            [
                0x58, 0xe2, 0xfc, 0xce, 0xfa, 0x7e, 0x30, 0x61, 0x36, 0x7f, 0x1d, 0x57, 0xa4,
                0xe7, 0x45, 0x5a
            ]
        );
    }

    #[test]
    fn nist_case_2_single_zero_block() {
        let rk = expand_key(&[0u8; 16]).unwrap();
        let mut data = vec![0u8; 16];
        let tag = seal(&rk, &[0u8; 12], &[], &mut data);
        assert_eq!(
            data,
            [
                0x03, 0x88, 0xda, 0xce, 0x60, 0xb6, 0xa3, 0x92, 0xf3, 0x28, 0xc2, 0xb9, 0x71,
                0xb2, 0xfe, 0x78
            ]
        );
        assert_eq!(
            tag,
            [
                0xab, 0x6e, 0x47, 0xd4, 0x2c, 0xec, 0x13, 0xbd, 0xf5, 0x3a, 0x67, 0xb2, 0x12,
                0x57, 0xbd, 0xdf
            ]
        );
    }

    #[test]
    fn nist_case_13_aes256_empty_plaintext() {
        let rk = expand_key(&[0u8; 32]).unwrap();
        let mut data = Vec::new();
        let tag = seal(&rk, &[0u8; 12], &[], &mut data);
        assert_eq!(
            tag,
            [
                0x53, 0x0f, 0x8a, 0xfb, 0xc7, 0x45, 0x36, 0xb9, 0xa9, 0x63, 0xb4, 0xf1, 0xc4,
                0xcb, 0x73, 0x8b
            ]
        );
    }

    #[test]
    fn nist_case_14_aes256_single_zero_block() {
        let rk = expand_key(&[0u8; 32]).unwrap();
        let mut data = vec![0u8; 16];
        let tag = seal(&rk, &[0u8; 12], &[], &mut data);
        assert_eq!(
            data,
            [
                0xce, 0xa7, 0x40, 0x3d, 0x4d, 0x60, 0x6b, 0x6e, 0x07, 0x4e, 0xc5, 0xd3, 0xba,
                0xf3, 0x9d, 0x18
            ]
        );
        assert_eq!(
            tag,
            [
                0xd0, 0xd1, 0xc8, 0xa7, 0x99, 0x99, 0x6b, 0xf0, 0x26, 0x5b, 0x98, 0xb5, 0xd4,
                0x8a, 0xb9, 0x19
            ]
        );
    }

    #[test]
    fn nist_case_4_sixty_bytes_with_aad() {
        let key = [
            0xfe, 0xff, 0xe9, 0x92, 0x86, 0x65, 0x73, 0x1c, 0x6d, 0x6a, 0x8f, 0x94, 0x67, 0x30,
            0x83, 0x08,
        ];
        let nonce = [
            0xca, 0xfe, 0xba, 0xbe, 0xfa, 0xce, 0xdb, 0xad, 0xde, 0xca, 0xf8, 0x88,
        ];
        let aad = [
            0xfe, 0xed, 0xfa, 0xce, 0xde, 0xad, 0xbe, 0xef, 0xfe, 0xed, 0xfa, 0xce, 0xde, 0xad,
            0xbe, 0xef, 0xab, 0xad, 0xda, 0xd2,
        ];
        let plaintext = [
            0xd9, 0x31, 0x32, 0x25, 0xf8, 0x84, 0x06, 0xe5, 0xa5, 0x59, 0x09, 0xc5, 0xaf, 0xf5,
            0x26, 0x9a, 0x86, 0xa7, 0xa9, 0x53, 0x15, 0x34, 0xf7, 0xda, 0x2e, 0x4c, 0x30, 0x3d,
            0x8a, 0x31, 0x8a, 0x72, 0x1c, 0x3c, 0x0c, 0x95, 0x95, 0x68, 0x09, 0x53, 0x2f, 0xcf,
            0x0e, 0x24, 0x49, 0xa6, 0xb5, 0x25, 0xb1, 0x6a, 0xed, 0xf5, 0xaa, 0x0d, 0xe6, 0x57,
            0xba, 0x63, 0x7b, 0x39,
        ];

        let rk = expand_key(&key).unwrap();
        let mut data = plaintext.to_vec();
        let tag = seal(&rk, &nonce, &aad, &mut data);
        assert_eq!(
            data,
            [
                0x42, 0x83, 0x1e, 0xc2, 0x21, 0x77, 0x74, 0x24, 0x4b, 0x72, 0x21, 0xb7, 0x84,
                0xd0, 0xd4, 0x9c, 0xe3, 0xaa, 0x21, 0x2f, 0x2c, 0x02, 0xa4, 0xe0, 0x35, 0xc1,
                0x7e, 0x23, 0x29, 0xac, 0xa1, 0x2e, 0x21, 0xd5, 0x14, 0xb2, 0x54, 0x66, 0x93,
                0x1c, 0x7d, 0x8f, 0x6a, 0x5a, 0xac, 0x84, 0xaa, 0x05, 0x1b, 0xa3, 0x0b, 0x39,
                0x6a, 0x0a, 0xac, 0x97, 0x3d, 0x58, 0xe0, 0x91
            ]
        );
        assert_eq!(
            tag,
            [
                0x5b, 0xc9, 0x4f, 0xbc, 0x32, 0x21, 0xa5, 0xdb, 0x94, 0xfa, 0xdd, 0x2b, 0x74,
                0x8d, 0x96, 0xe7
            ]
        );

        open(&rk, &nonce, &aad, &mut data, &tag).unwrap();
        assert_eq!(data, plaintext);
    }

    #[test]
    fn hash_subkey_is_encryption_of_zero_block() {
        let rk = expand_key(&[0u8; 16]).unwrap();
        // AES-128(0^128, 0^128), the H value behind the case 1/2 tags.
        assert_eq!(
            hash_subkey(&rk).to_be_bytes(),
            [
                0x66, 0xe9, 0x4b, 0xd4, 0xef, 0x8a, 0x2c, 0x3b, 0x88, 0x4c, 0xfa, 0x59, 0xca,
                0x34, 0x2b, 0x2e
            ]
        );
    }

    #[test]
    fn seal_open_round_trip_with_aad() {
        let rk = expand_key(&[0x42u8; 24]).unwrap();
        let nonce = [7u8; 12];
        let aad = b"header";
        let plaintext = b"the quick brown fox jumps over the lazy dog".to_vec();

        let mut data = plaintext.clone();
        let tag = seal(&rk, &nonce, aad, &mut data);
        assert_ne!(data, plaintext);

        open(&rk, &nonce, aad, &mut data, &tag).unwrap();
        assert_eq!(data, plaintext);
    }

    #[test]
    fn tampered_ciphertext_is_rejected_untouched() {
        let rk = expand_key(&[0x42u8; 16]).unwrap();
        let nonce = [9u8; 12];
        let mut data = b"payload".to_vec();
        let tag = seal(&rk, &nonce, &[], &mut data);

        data[0] ^= 0x01;
        let received = data.clone();
        let err = open(&rk, &nonce, &[], &mut data, &tag).unwrap_err();
        assert_eq!(err, CryptoError::AuthenticationFailed);
        // Buffer must not have been decrypted on failure.
        assert_eq!(data, received);
    }

    #[test]
    fn mismatched_aad_is_rejected() {
        let rk = expand_key(&[0x42u8; 16]).unwrap();
        let nonce = [9u8; 12];
        let mut data = b"payload".to_vec();
        let tag = seal(&rk, &nonce, b"aad", &mut data);
        assert!(open(&rk, &nonce, b"AAD", &mut data, &tag).is_err());
    }

    #[test]
    fn counter_increment_carries() {
        let mut counter = [0u8; 16];
        counter[12..].copy_from_slice(&0x00FF_FFFFu32.to_be_bytes());
        inc32(&mut counter);
        assert_eq!(&counter[12..], &0x0100_0000u32.to_be_bytes());

        let mut wrap = [0xFFu8; 16];
        inc32(&mut wrap);
        assert_eq!(&wrap[12..], &[0, 0, 0, 0]);
        assert_eq!(&wrap[..12], &[0xFF; 12]);
    }
}
