//! Authenticated text encryption for `textseal-svc`.
//!
//! [`crypto::Sealer`] turns plaintext strings into tamper-evident
//! `<nonce>:<tag>:<ciphertext>` hex blobs under a provisioned AES-256 key and
//! opens them again, rejecting anything altered or sealed under another key.
//! The [`server`] module exposes the same two operations over JSON/HTTP.

pub mod config;
pub mod crypto;
pub mod server;
pub mod telemetry;

pub use crate::config::Config;
pub use crypto::{CipherError, EncodedBlob, KeyError, SecretKey, Sealer};
