//! AES-256-GCM sealing and opening of text values.
//!
//! **Algorithm:** AES-256-GCM with a 128-bit nonce and a 128-bit tag. A fresh
//! nonce is drawn from the OS CSPRNG on every call; GCM nonce reuse under the
//! same key breaks both confidentiality and authentication.
//!
//! Associated data is empty unless a caller explicitly opts in through
//! [`Sealer::encrypt_with_aad`]. The blob carries no marker of which associated
//! data was used, so both sides must agree out of band.

use std::fmt;
use std::str::FromStr;

use aes_gcm::{
    aead::{consts::U16, rand_core::RngCore, AeadInPlace, KeyInit, OsRng},
    aes::Aes256,
    AesGcm, Key, Nonce, Tag,
};
use thiserror::Error;

use super::key::{KeyError, SecretKey};

/// Byte length of the per-call nonce (16 bytes = 128 bits).
pub const NONCE_LEN: usize = 16;

/// Byte length of the GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

/// Separator between the three hex segments of an [`EncodedBlob`].
pub const DELIMITER: char = ':';

/// AES-256-GCM instantiated with a 16-byte nonce.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Errors produced by the cipher layer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CipherError {
    /// The provisioned key is missing or malformed.
    #[error("configuration error: {0}")]
    Configuration(#[from] KeyError),

    /// The blob does not match `<nonce>:<tag>:<ciphertext>` with 16-byte nonce and tag.
    #[error("invalid encrypted blob format")]
    InvalidFormat,

    /// Tag verification failed: tampered blob, wrong key, or mismatched associated data.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The AEAD refused to encrypt. Only reachable for inputs beyond the GCM length limit.
    #[error("aead operation failed")]
    AeadFailure,
}

/// A parsed, encrypted value.
///
/// The string representation is `<hex(nonce)>:<hex(tag)>:<hex(ciphertext)>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBlob {
    /// Raw nonce bytes.
    pub nonce: [u8; NONCE_LEN],
    /// Raw authentication tag bytes.
    pub tag: [u8; TAG_LEN],
    /// Raw ciphertext bytes; same length as the plaintext.
    pub ciphertext: Vec<u8>,
}

impl fmt::Display for EncodedBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{DELIMITER}{}{DELIMITER}{}",
            hex::encode(self.nonce),
            hex::encode(self.tag),
            hex::encode(&self.ciphertext),
        )
    }
}

impl FromStr for EncodedBlob {
    type Err = CipherError;

    /// Parse a blob string. Hex digits may be upper- or lowercase.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidFormat`] unless the string has exactly three
    /// hex segments and the nonce and tag decode to 16 bytes each.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(DELIMITER).collect();
        let [nonce, tag, ciphertext] = parts.as_slice() else {
            return Err(CipherError::InvalidFormat);
        };

        let nonce = decode_fixed::<NONCE_LEN>(nonce)?;
        let tag = decode_fixed::<TAG_LEN>(tag)?;
        let ciphertext = hex::decode(ciphertext).map_err(|_| CipherError::InvalidFormat)?;

        Ok(Self {
            nonce,
            tag,
            ciphertext,
        })
    }
}

fn decode_fixed<const N: usize>(segment: &str) -> Result<[u8; N], CipherError> {
    let bytes = hex::decode(segment).map_err(|_| CipherError::InvalidFormat)?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| CipherError::InvalidFormat)
}

/// The authenticated encryption service.
///
/// Holds the AES-256-GCM key schedule derived from a [`SecretKey`] at
/// construction and nothing else, so a single instance can be shared across
/// threads (`&Sealer` or `Arc<Sealer>`) without locking.
pub struct Sealer {
    cipher: Aes256Gcm16,
}

impl Sealer {
    /// Build the service from an already-decoded key. The key is consumed and
    /// zeroed once the cipher has been initialised.
    pub fn new(key: SecretKey) -> Self {
        Self {
            cipher: Aes256Gcm16::new(Key::<Aes256Gcm16>::from_slice(key.as_bytes())),
        }
    }

    /// Build the service from a hex-encoded 32-byte key.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Configuration`] if the key is blank, not hex, or
    /// not exactly [`KEY_LEN`](super::KEY_LEN) bytes once decoded.
    pub fn from_hex_key(hex_key: &str) -> Result<Self, CipherError> {
        Ok(Self::new(SecretKey::from_hex(hex_key)?))
    }

    /// Encrypt `plaintext` into a `<nonce>:<tag>:<ciphertext>` blob.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::AeadFailure`] only if the AEAD rejects the input length.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        self.encrypt_with_aad(plaintext, &[])
    }

    /// Decrypt a blob produced by [`Sealer::encrypt`].
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidFormat`] for a malformed blob and
    /// [`CipherError::AuthenticationFailed`] if tag verification fails. No
    /// plaintext is returned on either path.
    pub fn decrypt(&self, blob: &str) -> Result<String, CipherError> {
        self.decrypt_with_aad(blob, &[])
    }

    /// Like [`Sealer::encrypt`], additionally authenticating `associated_data`.
    ///
    /// # Errors
    ///
    /// See [`Sealer::encrypt`].
    pub fn encrypt_with_aad(
        &self,
        plaintext: &str,
        associated_data: &[u8],
    ) -> Result<String, CipherError> {
        Ok(self.seal(plaintext.as_bytes(), associated_data)?.to_string())
    }

    /// Like [`Sealer::decrypt`], verifying `associated_data` as well.
    ///
    /// # Errors
    ///
    /// See [`Sealer::decrypt`]; mismatched associated data is an
    /// [`CipherError::AuthenticationFailed`].
    pub fn decrypt_with_aad(
        &self,
        blob: &str,
        associated_data: &[u8],
    ) -> Result<String, CipherError> {
        let blob: EncodedBlob = blob.parse()?;
        let plaintext = self.open(blob, associated_data)?;
        // Authenticated bytes that are not UTF-8 were never produced by `encrypt`.
        String::from_utf8(plaintext).map_err(|_| CipherError::InvalidFormat)
    }

    /// Encrypt raw bytes under a fresh random nonce.
    pub fn seal(
        &self,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<EncodedBlob, CipherError> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let mut buffer = plaintext.to_vec();
        let tag = self
            .cipher
            .encrypt_in_place_detached(
                Nonce::<U16>::from_slice(&nonce),
                associated_data,
                &mut buffer,
            )
            .map_err(|_| CipherError::AeadFailure)?;

        let mut tag_bytes = [0u8; TAG_LEN];
        tag_bytes.copy_from_slice(&tag);

        Ok(EncodedBlob {
            nonce,
            tag: tag_bytes,
            ciphertext: buffer,
        })
    }

    /// Verify and decrypt a parsed blob. The ciphertext buffer is only
    /// decrypted after the tag has been verified.
    pub fn open(&self, blob: EncodedBlob, associated_data: &[u8]) -> Result<Vec<u8>, CipherError> {
        let mut buffer = blob.ciphertext;
        self.cipher
            .decrypt_in_place_detached(
                Nonce::<U16>::from_slice(&blob.nonce),
                associated_data,
                &mut buffer,
                Tag::<U16>::from_slice(&blob.tag),
            )
            .map_err(|_| CipherError::AuthenticationFailed)?;
        Ok(buffer)
    }
}

impl fmt::Debug for Sealer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sealer { key: [REDACTED] }")
    }
}
