//! Small shared helpers.

/// Constant-time equality over equal-length buffers.
///
/// XOR-accumulates every byte pair so the running time does not depend on
/// the position of the first difference. Buffers of unequal length compare
/// unequal immediately; tag lengths are public.
#[inline]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b) {
        diff |= x ^ y;
    }
    diff == 0
}
