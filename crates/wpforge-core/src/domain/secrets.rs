//! Cryptographically random strings for WordPress salts and table prefixes.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use rand::{RngCore, rngs::OsRng};

use crate::domain::DomainError;

/// Length of every generated `secret.*` value.
pub const SECRET_LEN: usize = 64;

/// Length of the random part of `db.prefix` (an `_` is appended).
pub const DB_PREFIX_LEN: usize = 8;

/// Output alphabet for [`random_string`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Lowercase hexadecimal, two characters per byte.
    Hex,
    /// Standard base64 alphabet, four characters per three bytes.
    Base64,
}

impl Encoding {
    /// Bytes of entropy needed per output character.
    fn bytes_per_char(self) -> f64 {
        match self {
            Self::Hex => 0.5,
            Self::Base64 => 0.75,
        }
    }

    fn encode(self, bytes: &[u8]) -> String {
        match self {
            Self::Hex => hex::encode(bytes),
            Self::Base64 => STANDARD.encode(bytes),
        }
    }
}

/// Number of random bytes needed to produce `len` characters.
pub fn bytes_needed(len: usize, encoding: Encoding) -> usize {
    (len as f64 * encoding.bytes_per_char()).ceil() as usize
}

/// Generate exactly `len` characters of `encoding` from the OS CSPRNG.
///
/// # Errors
///
/// [`DomainError::RandomSource`] if the OS random source fails.
pub fn random_string(len: usize, encoding: Encoding) -> Result<String, DomainError> {
    let mut buf = vec![0u8; bytes_needed(len, encoding)];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| DomainError::RandomSource {
            reason: e.to_string(),
        })?;

    let mut encoded = encoding.encode(&buf);
    encoded.truncate(len);
    Ok(encoded)
}
