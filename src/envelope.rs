//! The ciphertext envelope handed back to the host application.

use crate::error::CryptoError;
use crate::key::Algorithm;
use crate::TAG_LEN;

/// Output of one encryption: raw ciphertext plus the public parameters
/// needed to decrypt it again.
///
/// For the AEAD modes the 16-byte tag is the trailing part of `ciphertext`
/// (`ciphertext ‖ tag`), not a separate field. `iv` is the fresh random
/// nonce (12 bytes, GCM / ChaCha20-Poly1305) or CBC IV (8 bytes, 3DES).
/// Encoding the envelope for storage or transport is the host's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub algorithm: Algorithm,
    pub ciphertext: Vec<u8>,
    pub iv: Vec<u8>,
}

impl Envelope {
    /// Split `ciphertext ‖ tag` for an AEAD envelope.
    ///
    /// Fails when the buffer cannot even hold a tag; an empty plaintext
    /// still produces a 16-byte envelope body.
    pub(crate) fn split_tag(&self) -> Result<(&[u8], &[u8; TAG_LEN]), CryptoError> {
        if self.ciphertext.len() < TAG_LEN {
            return Err(CryptoError::MalformedCiphertext(
                "shorter than the authentication tag",
            ));
        }
        let (body, tag) = self.ciphertext.split_at(self.ciphertext.len() - TAG_LEN);
        // Length checked just above.
        Ok((body, tag.try_into().expect("tag is 16 bytes")))
    }
}
