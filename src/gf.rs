//! Finite-field arithmetic shared by the AES family.
//!
//! Two fields appear in AES-GCM and they are easy to confuse:
//!
//! - GF(2^8) with polynomial x^8 + x^4 + x^3 + x + 1 (0x11B), used by
//!   MixColumns inside the block cipher;
//! - GF(2^128) with polynomial x^128 + x^7 + x^2 + x + 1, used by GHASH,
//!   in GCM's reflected bit order (byte 0 MSB is the x^0 coefficient).

/// Multiply two GF(2^8) elements, reducing modulo 0x11B.
///
/// Russian-peasant carry loop; no lookup tables.
#[inline]
pub fn mul8(mut a: u8, mut b: u8) -> u8 {
    let mut p = 0u8;
    for _ in 0..8 {
        if b & 1 != 0 {
            p ^= a;
        }
        let hi = a & 0x80;
        a <<= 1;
        if hi != 0 {
            a ^= 0x1B;
        }
        b >>= 1;
    }
    p
}

/// Multiply two GF(2^128) elements in GHASH's representation.
///
/// Both operands are big-endian `u128` views of a 16-byte block. Bits of `x`
/// are consumed MSB to LSB (GCM numbers its bits from the MSB); `y` plays
/// the role of the multiplicand and is shifted right one position per step,
/// folding the dropped bit back in with the reduction constant 0xE1 at the
/// top byte (NIST SP 800-38D, algorithm 1).
pub fn mul128(x: u128, mut y: u128) -> u128 {
    let mut z = 0u128;
    for i in 0..128 {
        if (x >> (127 - i)) & 1 != 0 {
            z ^= y;
        }
        let carry = y & 1;
        y >>= 1;
        if carry != 0 {
            y ^= 0xE1 << 120;
        }
    }
    z
}
