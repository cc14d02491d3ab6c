//! [`SecretKey`]: the provisioned 256-bit AES key, decoded from hex once at start-up.

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Reasons a provisioned key is rejected. All of them are fatal at start-up.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum KeyError {
    /// No key value was supplied, or it was blank.
    #[error("encryption key is missing")]
    Missing,

    /// The key value is not a hex string.
    #[error("encryption key is not valid hex")]
    NotHex,

    /// The key decoded to the wrong number of bytes.
    #[error("invalid key length: expected {KEY_LEN} bytes, got {0}")]
    InvalidLength(usize),
}

/// Fixed-size key buffer that holds exactly [`KEY_LEN`] bytes.
///
/// Not `Clone`: the key is owned by a single [`Sealer`](super::Sealer).
/// The bytes are overwritten with zeroes on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; KEY_LEN]);

impl SecretKey {
    /// Wrap raw key bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Decode a hex-encoded key. Surrounding whitespace is ignored and both
    /// upper- and lowercase digits are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Missing`] for a blank value, [`KeyError::NotHex`] if
    /// the value does not decode, and [`KeyError::InvalidLength`] if it decodes
    /// to anything other than [`KEY_LEN`] bytes.
    pub fn from_hex(value: &str) -> Result<Self, KeyError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(KeyError::Missing);
        }
        let decoded = Zeroizing::new(hex::decode(value).map_err(|_| KeyError::NotHex)?);
        if decoded.len() != KEY_LEN {
            return Err(KeyError::InvalidLength(decoded.len()));
        }
        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material, not even in debug builds.
        f.write_str("SecretKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_lower_and_upper_case() {
        let lower = SecretKey::from_hex(&"ab".repeat(KEY_LEN)).unwrap();
        let upper = SecretKey::from_hex(&"AB".repeat(KEY_LEN)).unwrap();
        assert_eq!(lower.as_bytes(), upper.as_bytes());
        assert_eq!(lower.as_bytes(), &[0xABu8; KEY_LEN]);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let key = SecretKey::from_hex(&format!("  {}\n", "11".repeat(KEY_LEN))).unwrap();
        assert_eq!(key.as_bytes(), &[0x11u8; KEY_LEN]);
    }

    #[test]
    fn rejects_blank() {
        assert_eq!(SecretKey::from_hex("").unwrap_err(), KeyError::Missing);
        assert_eq!(SecretKey::from_hex("   ").unwrap_err(), KeyError::Missing);
    }

    #[test]
    fn rejects_non_hex() {
        let value = "zz".repeat(KEY_LEN);
        assert_eq!(SecretKey::from_hex(&value).unwrap_err(), KeyError::NotHex);
        // Odd number of digits.
        assert_eq!(SecretKey::from_hex("abc").unwrap_err(), KeyError::NotHex);
    }

    #[test]
    fn rejects_wrong_length() {
        let short = "00".repeat(16);
        assert_eq!(
            SecretKey::from_hex(&short).unwrap_err(),
            KeyError::InvalidLength(16)
        );
        let long = "00".repeat(33);
        assert_eq!(
            SecretKey::from_hex(&long).unwrap_err(),
            KeyError::InvalidLength(33)
        );
    }

    #[test]
    fn redacted_in_debug() {
        let key = SecretKey::new([0xFF; KEY_LEN]);
        let printed = format!("{key:?}");
        assert!(printed.contains("REDACTED"));
        assert!(!printed.to_lowercase().contains("ff"));
    }
}
