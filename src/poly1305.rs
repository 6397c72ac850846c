//! Poly1305 one-time authenticator (RFC 8439).
//!
//! The message is evaluated as a polynomial over 2^130 − 5 with the clamped
//! `r` half of the 32-byte one-time key; the `s` half is added modulo 2^128
//! at the end. The accumulator is held in five 26-bit limbs so every limb
//! product fits a `u64` without overflow.

const MASK_26: u32 = 0x3ff_ffff;

#[inline]
fn le32(b: &[u8]) -> u32 {
    u32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

/// Compute the 16-byte tag over `msg` with the one-time `key` (`r ‖ s`).
///
/// A (key, message) pair must never be MACed twice; the AEAD layer derives
/// a fresh key per nonce.
pub fn tag(msg: &[u8], key: &[u8; 32]) -> [u8; 16] {
    // Clamp r per RFC 8439 section 2.5: the masks clear the top four bits
    // of bytes 3, 7, 11, 15 and the bottom two bits of bytes 4, 8, 12.
    let r0 = le32(&key[0..4]) & 0x3ff_ffff;
    let r1 = (le32(&key[3..7]) >> 2) & 0x3ff_ff03;
    let r2 = (le32(&key[6..10]) >> 4) & 0x3ff_c0ff;
    let r3 = (le32(&key[9..13]) >> 6) & 0x3f0_3fff;
    let r4 = (le32(&key[12..16]) >> 8) & 0x00f_ffff;

    // Premultiplied by 5 for the 2^130 ≡ 5 wraparound terms.
    let s1 = r1 * 5;
    let s2 = r2 * 5;
    let s3 = r3 * 5;
    let s4 = r4 * 5;

    let mut h0 = 0u32;
    let mut h1 = 0u32;
    let mut h2 = 0u32;
    let mut h3 = 0u32;
    let mut h4 = 0u32;

    for chunk in msg.chunks(16) {
        // Each 16-byte chunk gains a 2^128 marker bit; a short final chunk
        // is instead terminated with a single 1 byte and zero padding.
        let mut block = [0u8; 16];
        block[..chunk.len()].copy_from_slice(chunk);
        let hibit = if chunk.len() == 16 {
            1u32 << 24
        } else {
            block[chunk.len()] = 1;
            0
        };

        h0 = h0.wrapping_add(le32(&block[0..4]) & MASK_26);
        h1 = h1.wrapping_add((le32(&block[3..7]) >> 2) & MASK_26);
        h2 = h2.wrapping_add((le32(&block[6..10]) >> 4) & MASK_26);
        h3 = h3.wrapping_add((le32(&block[9..13]) >> 6) & MASK_26);
        h4 = h4.wrapping_add((le32(&block[12..16]) >> 8) | hibit);

        // h *= r, with the x^5 overflow limbs folded back via s1..s4.
        let d0 = h0 as u64 * r0 as u64
            + h1 as u64 * s4 as u64
            + h2 as u64 * s3 as u64
            + h3 as u64 * s2 as u64
            + h4 as u64 * s1 as u64;
        let mut d1 = h0 as u64 * r1 as u64
            + h1 as u64 * r0 as u64
            + h2 as u64 * s4 as u64
            + h3 as u64 * s3 as u64
            + h4 as u64 * s2 as u64;
        let mut d2 = h0 as u64 * r2 as u64
            + h1 as u64 * r1 as u64
            + h2 as u64 * r0 as u64
            + h3 as u64 * s4 as u64
            + h4 as u64 * s3 as u64;
        let mut d3 = h0 as u64 * r3 as u64
            + h1 as u64 * r2 as u64
            + h2 as u64 * r1 as u64
            + h3 as u64 * r0 as u64
            + h4 as u64 * s4 as u64;
        let mut d4 = h0 as u64 * r4 as u64
            + h1 as u64 * r3 as u64
            + h2 as u64 * r2 as u64
            + h3 as u64 * r1 as u64
            + h4 as u64 * r0 as u64;

        // Partial carry chain; limbs stay below 2^26 + epsilon.
        let mut c = d0 >> 26;
        h0 = d0 as u32 & MASK_26;
        d1 += c;
        c = d1 >> 26;
        h1 = d1 as u32 & MASK_26;
        d2 += c;
        c = d2 >> 26;
        h2 = d2 as u32 & MASK_26;
        d3 += c;
        c = d3 >> 26;
        h3 = d3 as u32 & MASK_26;
        d4 += c;
        c = d4 >> 26;
        h4 = d4 as u32 & MASK_26;
        h0 += c as u32 * 5;
        let c = h0 >> 26;
        h0 &= MASK_26;
        h1 += c;
    }

    // Full reduction of the accumulator.
    let mut c = h1 >> 26;
    h1 &= MASK_26;
    h2 += c;
    c = h2 >> 26;
    h2 &= MASK_26;
    h3 += c;
    c = h3 >> 26;
    h3 &= MASK_26;
    h4 += c;
    c = h4 >> 26;
    h4 &= MASK_26;
    h0 += c * 5;
    c = h0 >> 26;
    h0 &= MASK_26;
    h1 += c;

    // Constant-time select of h or h - p (computed as h + 5 - 2^130).
    let mut g0 = h0.wrapping_add(5);
    c = g0 >> 26;
    g0 &= MASK_26;
    let mut g1 = h1.wrapping_add(c);
    c = g1 >> 26;
    g1 &= MASK_26;
    let mut g2 = h2.wrapping_add(c);
    c = g2 >> 26;
    g2 &= MASK_26;
    let mut g3 = h3.wrapping_add(c);
    c = g3 >> 26;
    g3 &= MASK_26;
    let g4 = h4.wrapping_add(c).wrapping_sub(1 << 26);

    let mask = (g4 >> 31).wrapping_sub(1);
    h0 = (h0 & !mask) | (g0 & mask);
    h1 = (h1 & !mask) | (g1 & mask);
    h2 = (h2 & !mask) | (g2 & mask);
    h3 = (h3 & !mask) | (g3 & mask);
    h4 = (h4 & !mask) | (g4 & mask);

    // Repack 5×26-bit limbs into 4×32-bit words (mod 2^128).
    h0 |= h1 << 26;
    h1 = (h1 >> 6) | (h2 << 20);
    h2 = (h2 >> 12) | (h3 << 14);
    h3 = (h3 >> 18) | (h4 << 8);

    // Add s with carry.
    let mut f = h0 as u64 + le32(&key[16..20]) as u64;
    h0 = f as u32;
    f = h1 as u64 + le32(&key[20..24]) as u64 + (f >> 32);
    h1 = f as u32;
    f = h2 as u64 + le32(&key[24..28]) as u64 + (f >> 32);
    h2 = f as u32;
    f = h3 as u64 + le32(&key[28..32]) as u64 + (f >> 32);
    h3 = f as u32;

    let mut out = [0u8; 16];
    out[0..4].copy_from_slice(&h0.to_le_bytes());
    out[4..8].copy_from_slice(&h1.to_le_bytes());
    out[8..12].copy_from_slice(&h2.to_le_bytes());
    out[12..16].copy_from_slice(&h3.to_le_bytes());
    out
}
