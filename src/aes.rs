//! AES (Rijndael) block engine: key expansion and single-block encryption.
//!
//! Software-only, all three FIPS 197 key sizes. The 4×4 state is kept as a
//! flat `[u8; 16]` in column-major order (byte `4*c + r` is row `r`, column
//! `c`), mutated in place by the round helpers. Only block *encryption* is
//! exposed: GCM runs the cipher forward for both directions.

use std::fmt;

use crate::error::CryptoError;
use crate::gf;

/// The SubBytes substitution table (FIPS 197 figure 7).
const SBOX: [u8; 256] = [
    0x63, 0x7c, 0x77, 0x7b, 0xf2, 0x6b, 0x6f, 0xc5, 0x30, 0x01, 0x67, 0x2b, 0xfe, 0xd7, 0xab, 0x76,
    0xca, 0x82, 0xc9, 0x7d, 0xfa, 0x59, 0x47, 0xf0, 0xad, 0xd4, 0xa2, 0xaf, 0x9c, 0xa4, 0x72, 0xc0,
    0xb7, 0xfd, 0x93, 0x26, 0x36, 0x3f, 0xf7, 0xcc, 0x34, 0xa5, 0xe5, 0xf1, 0x71, 0xd8, 0x31, 0x15,
    0x04, 0xc7, 0x23, 0xc3, 0x18, 0x96, 0x05, 0x9a, 0x07, 0x12, 0x80, 0xe2, 0xeb, 0x27, 0xb2, 0x75,
    0x09, 0x83, 0x2c, 0x1a, 0x1b, 0x6e, 0x5a, 0xa0, 0x52, 0x3b, 0xd6, 0xb3, 0x29, 0xe3, 0x2f, 0x84,
    0x53, 0xd1, 0x00, 0xed, 0x20, 0xfc, 0xb1, 0x5b, 0x6a, 0xcb, 0xbe, 0x39, 0x4a, 0x4c, 0x58, 0xcf,
    0xd0, 0xef, 0xaa, 0xfb, 0x43, 0x4d, 0x33, 0x85, 0x45, 0xf9, 0x02, 0x7f, 0x50, 0x3c, 0x9f, 0xa8,
    0x51, 0xa3, 0x40, 0x8f, 0x92, 0x9d, 0x38, 0xf5, 0xbc, 0xb6, 0xda, 0x21, 0x10, 0xff, 0xf3, 0xd2,
    0xcd, 0x0c, 0x13, 0xec, 0x5f, 0x97, 0x44, 0x17, 0xc4, 0xa7, 0x7e, 0x3d, 0x64, 0x5d, 0x19, 0x73,
    0x60, 0x81, 0x4f, 0xdc, 0x22, 0x2a, 0x90, 0x88, 0x46, 0xee, 0xb8, 0x14, 0xde, 0x5e, 0x0b, 0xdb,
    0xe0, 0x32, 0x3a, 0x0a, 0x49, 0x06, 0x24, 0x5c, 0xc2, 0xd3, 0xac, 0x62, 0x91, 0x95, 0xe4, 0x79,
    0xe7, 0xc8, 0x37, 0x6d, 0x8d, 0xd5, 0x4e, 0xa9, 0x6c, 0x56, 0xf4, 0xea, 0x65, 0x7a, 0xae, 0x08,
    0xba, 0x78, 0x25, 0x2e, 0x1c, 0xa6, 0xb4, 0xc6, 0xe8, 0xdd, 0x74, 0x1f, 0x4b, 0xbd, 0x8b, 0x8a,
    0x70, 0x3e, 0xb5, 0x66, 0x48, 0x03, 0xf6, 0x0e, 0x61, 0x35, 0x57, 0xb9, 0x86, 0xc1, 0x1d, 0x9e,
    0xe1, 0xf8, 0x98, 0x11, 0x69, 0xd9, 0x8e, 0x94, 0x9b, 0x1e, 0x87, 0xe9, 0xce, 0x55, 0x28, 0xdf,
    0x8c, 0xa1, 0x89, 0x0d, 0xbf, 0xe6, 0x42, 0x68, 0x41, 0x99, 0x2d, 0x0f, 0xb0, 0x54, 0xbb, 0x16,
];

/// Round constants for the key schedule, indexed by `i / Nk` (1-based).
const RCON: [u8; 11] = [
    0x00, 0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1B, 0x36,
];

/// The expanded key schedule: `rounds + 1` sixteen-byte round keys.
///
/// Only [`expand_key`] can build one, so the round-key count invariant
/// (11/13/15 keys for 10/12/14 rounds) holds by construction.
pub struct RoundKeys {
    keys: [[u8; 16]; 15],
    rounds: usize,
}

impl RoundKeys {
    /// Number of cipher rounds (10, 12 or 14).
    pub fn rounds(&self) -> usize {
        self.rounds
    }
}

/// Round keys are key material; keep them out of `Debug` output.
impl fmt::Debug for RoundKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundKeys")
            .field("rounds", &self.rounds)
            .field("keys", &"[REDACTED]")
            .finish()
    }
}

/// Run the Rijndael key schedule over a 16-, 24- or 32-byte key.
///
/// The key is treated as `Nk` 32-bit words (4, 6 or 8) and expanded to
/// `4 * (rounds + 1)` words. Word `i` is the word `Nk` back XORed with a
/// transform of word `i - 1`: RotWord + SubWord + Rcon every `Nk` words,
/// plus (AES-256 only) a bare SubWord at `i % Nk == 4`.
pub fn expand_key(key: &[u8]) -> Result<RoundKeys, CryptoError> {
    let nk = match key.len() {
        16 => 4,
        24 => 6,
        32 => 8,
        n => {
            return Err(CryptoError::UnsupportedKeySize {
                engine: "AES",
                actual: n,
            })
        }
    };
    let rounds = nk + 6;

    let mut w = [[0u8; 4]; 60];
    for (i, word) in key.chunks_exact(4).enumerate() {
        w[i].copy_from_slice(word);
    }
    for i in nk..4 * (rounds + 1) {
        let mut t = w[i - 1];
        if i % nk == 0 {
            t = [
                SBOX[t[1] as usize],
                SBOX[t[2] as usize],
                SBOX[t[3] as usize],
                SBOX[t[0] as usize],
            ];
            t[0] ^= RCON[i / nk];
        } else if nk == 8 && i % nk == 4 {
            for b in t.iter_mut() {
                *b = SBOX[*b as usize];
            }
        }
        for j in 0..4 {
            w[i][j] = w[i - nk][j] ^ t[j];
        }
    }

    let mut keys = [[0u8; 16]; 15];
    for r in 0..=rounds {
        for c in 0..4 {
            keys[r][4 * c..4 * c + 4].copy_from_slice(&w[4 * r + c]);
        }
    }
    Ok(RoundKeys { keys, rounds })
}

/// Encrypt one 16-byte block in place.
pub fn encrypt_block(rk: &RoundKeys, block: &mut [u8; 16]) {
    add_round_key(block, &rk.keys[0]);
    for r in 1..rk.rounds {
        sub_bytes(block);
        shift_rows(block);
        mix_columns(block);
        add_round_key(block, &rk.keys[r]);
    }
    sub_bytes(block);
    shift_rows(block);
    add_round_key(block, &rk.keys[rk.rounds]);
}

fn sub_bytes(state: &mut [u8; 16]) {
    for b in state.iter_mut() {
        *b = SBOX[*b as usize];
    }
}

/// Row `r` rotates left by `r` bytes; on the column-major flat state the
/// row-`r` bytes sit at indices `r, r+4, r+8, r+12`.
fn shift_rows(state: &mut [u8; 16]) {
    let tmp = *state;
    state[1] = tmp[5];
    state[5] = tmp[9];
    state[9] = tmp[13];
    state[13] = tmp[1];
    state[2] = tmp[10];
    state[6] = tmp[14];
    state[10] = tmp[2];
    state[14] = tmp[6];
    state[3] = tmp[15];
    state[7] = tmp[3];
    state[11] = tmp[7];
    state[15] = tmp[11];
}

fn mix_columns(state: &mut [u8; 16]) {
    for c in 0..4 {
        let col = [
            state[4 * c],
            state[4 * c + 1],
            state[4 * c + 2],
            state[4 * c + 3],
        ];
        state[4 * c] = gf::mul8(col[0], 2) ^ gf::mul8(col[1], 3) ^ col[2] ^ col[3];
        state[4 * c + 1] = col[0] ^ gf::mul8(col[1], 2) ^ gf::mul8(col[2], 3) ^ col[3];
        state[4 * c + 2] = col[0] ^ col[1] ^ gf::mul8(col[2], 2) ^ gf::mul8(col[3], 3);
        state[4 * c + 3] = gf::mul8(col[0], 3) ^ col[1] ^ col[2] ^ gf::mul8(col[3], 2);
    }
}

fn add_round_key(state: &mut [u8; 16], rk: &[u8; 16]) {
    for (s, k) in state.iter_mut().zip(rk) {
        *s ^= k;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // FIPS 197 Appendix C example vectors: the same plaintext under the
    // 00 01 02 .. pattern key at each size.
    const PLAIN: [u8; 16] = [
        0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee,
        0xff,
    ];

    fn pattern_key(len: usize) -> Vec<u8> {
        (0..len as u8).collect()
    }

    #[test]
    fn fips197_aes128_block() {
        let rk = expand_key(&pattern_key(16)).unwrap();
        assert_eq!(rk.rounds(), 10);
        let mut block = PLAIN;
        encrypt_block(&rk, &mut block);
        assert_eq!(
            block,
            [
                0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70,
                0xb4, 0xc5, 0x5a
            ]
        );
    }

    #[test]
    fn fips197_aes192_block() {
        let rk = expand_key(&pattern_key(24)).unwrap();
        assert_eq!(rk.rounds(), 12);
        let mut block = PLAIN;
        encrypt_block(&rk, &mut block);
        assert_eq!(
            block,
            [
                0xdd, 0xa9, 0x7c, 0xa4, 0x86, 0x4c, 0xdf, 0xe0, 0x6e, 0xaf, 0x70, 0xa0, 0xec,
                0x0d, 0x71, 0x91
            ]
        );
    }

    #[test]
    fn fips197_aes256_block() {
        let rk = expand_key(&pattern_key(32)).unwrap();
        assert_eq!(rk.rounds(), 14);
        let mut block = PLAIN;
        encrypt_block(&rk, &mut block);
        assert_eq!(
            block,
            [
                0x8e, 0xa2, 0xb7, 0xca, 0x51, 0x67, 0x45, 0xbf, 0xea, 0xfc, 0x49, 0x90, 0x4b,
                0x49, 0x60, 0x89
            ]
        );
    }

    #[test]
    fn fips197_appendix_a_first_round_key() {
        // Appendix A.1 expands 2b7e151628aed2a6abf7158809cf4f3c; its first
        // derived word is a0fafe17.
        let key = [
            0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf,
            0x4f, 0x3c,
        ];
        let rk = expand_key(&key).unwrap();
        assert_eq!(rk.keys[1][..4], [0xa0, 0xfa, 0xfe, 0x17]);
    }

    #[test]
    fn rejects_unsupported_key_sizes() {
        for bad in [0usize, 8, 15, 17, 20, 33] {
            let err = expand_key(&vec![0u8; bad]).unwrap_err();
            assert_eq!(
                err,
                CryptoError::UnsupportedKeySize {
                    engine: "AES",
                    actual: bad
                }
            );
        }
    }

    #[test]
    fn schedule_debug_redacts_round_keys() {
        let rk = expand_key(&pattern_key(16)).unwrap();
        let dbg = format!("{rk:?}");
        assert!(dbg.contains("REDACTED"));
        assert!(!dbg.contains("0x"));
    }
}
