//! AES-256-GCM text sealing primitives.
//!
//! This module is intentionally free of HTTP and configuration dependencies.
//! [`Sealer`] is the whole service: it owns the key and exposes
//! `encrypt`/`decrypt` over plain strings.
//!
//! # Blob format
//!
//! ```text
//! <hex(nonce: 16 bytes)>:<hex(tag: 16 bytes)>:<hex(ciphertext)>
//! ```
//!
//! The format is unversioned. Blobs written by earlier deployments must stay
//! readable, so no prefix is added.
//!
//! # Security invariants
//!
//! - Key bytes are never logged, echoed, or included in `Debug` output.
//! - Plaintext is released only after the tag has been verified.

pub mod cipher;
pub mod key;

pub use cipher::{CipherError, EncodedBlob, Sealer, DELIMITER, NONCE_LEN, TAG_LEN};
pub use key::{KeyError, SecretKey, KEY_LEN};
