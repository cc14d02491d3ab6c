//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::InvalidFormat`] → 400
/// - [`ServiceError::AuthenticationFailed`] → 422
/// - [`ServiceError::EncryptionFailure`] → 500
/// - [`ServiceError::Internal`] → 500
///
/// Messages must never carry plaintext, blobs, or key material.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed: invalid JSON or a missing field.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The submitted blob is not `<nonce>:<tag>:<ciphertext>` hex of the expected lengths.
    #[error("invalid encrypted blob format")]
    InvalidFormat,

    /// Tag verification failed: the blob was altered or sealed under another key.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Encryption failed inside the cipher layer.
    #[error("encryption failure: {0}")]
    EncryptionFailure(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::InvalidFormat => 400,
            ServiceError::AuthenticationFailed => 422,
            ServiceError::EncryptionFailure(_) => 500,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code used in [`ErrorResponse`](crate::protocol::ErrorResponse) bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::InvalidFormat => "invalid_format",
            ServiceError::AuthenticationFailed => "authentication_failed",
            ServiceError::EncryptionFailure(_) => "encryption_failure",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}
