//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::crypto::Sealer;

/// Application state shared across all request handlers.
///
/// Cheap to clone: the [`Sealer`] is behind an `Arc` and is never mutated after
/// start-up, so handlers share it without locking.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The encryption service holding the provisioned key.
    pub sealer: Arc<Sealer>,
}

impl AppState {
    /// Create a new [`AppState`] around `sealer`.
    pub fn new(sealer: Sealer) -> Self {
        Self {
            sealer: Arc::new(sealer),
        }
    }
}
