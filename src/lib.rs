//! Pure-software symmetric cipher engines.
//!
//! Three algorithm families are implemented at the bit/byte level with no
//! platform crypto provider behind them:
//!
//! - AES-128/192/256 in GCM authenticated mode (FIPS 197 + NIST SP 800-38D),
//! - ChaCha20-Poly1305 AEAD (RFC 8439),
//! - two-key / three-key Triple DES in CBC mode with PKCS#5 padding
//!   (FIPS 46-3).
//!
//! The host application talks to three operations only:
//!
//! ```
//! use sealbox::{generate_key, encrypt, decrypt, Algorithm};
//!
//! let key = generate_key(Algorithm::Aes256).unwrap();
//! let sealed = encrypt(b"Hello, World!", &key).unwrap();
//! let plain = decrypt(&sealed, &key).unwrap();
//! assert_eq!(plain, b"Hello, World!");
//! ```
//!
//! For the AEAD modes the 16-byte authentication tag is appended to the
//! ciphertext; decryption verifies it in constant time before any plaintext
//! is released. Triple-DES-CBC carries no authentication at all, which is an
//! inherent limitation of that mode, not of this crate.
//!
//! Every engine is a pure, synchronous function over in-memory buffers: no
//! shared state, no threads, no I/O except the injected entropy source.

pub mod aes;
pub mod aes_gcm;
pub mod chacha20;
pub mod chacha20_poly1305;
pub mod des;
pub mod envelope;
pub mod error;
pub mod gf;
pub mod key;
pub mod poly1305;
pub mod rand;
pub mod triple_des;
pub mod util;

mod api;

pub use api::{decrypt, encrypt, encrypt_with_rng, generate_key, generate_key_with_rng};
pub use envelope::Envelope;
pub use error::CryptoError;
pub use key::{Algorithm, Key};
pub use rand::{OsRandom, SecureRandom};

/// Authentication tag length shared by GCM and Poly1305 (bytes).
pub const TAG_LEN: usize = 16;

/// Nonce length for AES-GCM and ChaCha20-Poly1305 (bytes).
pub const AEAD_NONCE_LEN: usize = 12;

/// AES block length (bytes).
pub const AES_BLOCK_LEN: usize = 16;

/// DES block length, which is also the Triple-DES CBC IV length (bytes).
pub const DES_BLOCK_LEN: usize = 8;
