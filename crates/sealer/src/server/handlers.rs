//! Axum request handlers for all service endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{
    DecryptRequest, DecryptResponse, EncryptRequest, EncryptResponse, ErrorResponse,
    HealthResponse,
};
use common::ServiceError;
use tracing::{debug, error, warn};

use super::state::AppState;
use crate::crypto::CipherError;

impl From<CipherError> for ServiceError {
    fn from(err: CipherError) -> Self {
        match err {
            CipherError::InvalidFormat => ServiceError::InvalidFormat,
            CipherError::AuthenticationFailed => ServiceError::AuthenticationFailed,
            CipherError::AeadFailure => ServiceError::EncryptionFailure("aead failure".into()),
            // The key is validated before the server starts.
            CipherError::Configuration(_) => ServiceError::Internal("cipher misconfigured".into()),
        }
    }
}

/// `POST /encrypt` — seal `plaintext` into a `<nonce>:<tag>:<ciphertext>` blob.
pub async fn encrypt(
    State(state): State<AppState>,
    body: Result<Json<EncryptRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(b) => b,
        Err(rejection) => return rejected(rejection),
    };

    match state.sealer.encrypt(&req.plaintext) {
        Ok(blob) => (StatusCode::OK, Json(EncryptResponse { blob })).into_response(),
        Err(e) => {
            error!(error = %e, "encryption failed");
            error_response(&e.into())
        }
    }
}

/// `POST /decrypt` — verify and open a blob previously returned by `/encrypt`.
///
/// A malformed blob is a 400; a blob that fails tag verification is a 422 and
/// is logged as a security-relevant event.
pub async fn decrypt(
    State(state): State<AppState>,
    body: Result<Json<DecryptRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(b) => b,
        Err(rejection) => return rejected(rejection),
    };

    match state.sealer.decrypt(&req.blob) {
        Ok(plaintext) => (StatusCode::OK, Json(DecryptResponse { plaintext })).into_response(),
        Err(e) => {
            match e {
                CipherError::AuthenticationFailed => {
                    warn!(error = %e, "decrypt rejected: blob altered or sealed under another key")
                }
                _ => debug!(error = %e, "decrypt rejected"),
            }
            error_response(&e.into())
        }
    }
}

/// `GET /health` — liveness check. The key is loaded before the server binds,
/// so a serving process is always ready.
pub async fn health() -> Response {
    let body = HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

// Serde messages can quote fragments of the body, so only the status is kept.
fn rejected(rejection: JsonRejection) -> Response {
    debug!(status = %rejection.status(), "request body rejected");
    error_response(&ServiceError::BadRequest("malformed JSON request body".into()))
}

fn error_response(err: &ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(err))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{SecretKey, Sealer, KEY_LEN};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
        routing::{get, post},
        Router,
    };
    use tower::ServiceExt;

    fn test_router() -> Router {
        Router::new()
            .route("/encrypt", post(encrypt))
            .route("/decrypt", post(decrypt))
            .route("/health", get(health))
            .with_state(AppState::new(Sealer::new(SecretKey::new([0x11; KEY_LEN]))))
    }

    fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(resp: Response) -> T {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_returns_200() {
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: HealthResponse = body_json(resp).await;
        assert_eq!(body.status, "ok");
    }

    #[tokio::test]
    async fn encrypt_then_decrypt() {
        let app = test_router();
        let resp = app
            .clone()
            .oneshot(json_post("/encrypt", serde_json::json!({"plaintext": "hello"})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let sealed: EncryptResponse = body_json(resp).await;
        assert_eq!(sealed.blob.matches(':').count(), 2);

        let resp = app
            .oneshot(json_post("/decrypt", serde_json::json!({"blob": sealed.blob})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let opened: DecryptResponse = body_json(resp).await;
        assert_eq!(opened.plaintext, "hello");
    }

    #[tokio::test]
    async fn malformed_blob_is_400() {
        let resp = test_router()
            .oneshot(json_post("/decrypt", serde_json::json!({"blob": "not-a-blob"})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let err: ErrorResponse = body_json(resp).await;
        assert_eq!(err.code, "invalid_format");
        assert!(!err.message.contains("not-a-blob"));
    }

    #[tokio::test]
    async fn foreign_key_blob_is_422() {
        let other = Sealer::new(SecretKey::new([0x22; KEY_LEN]));
        let blob = other.encrypt("hello").unwrap();
        let resp = test_router()
            .oneshot(json_post("/decrypt", serde_json::json!({ "blob": blob })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let err: ErrorResponse = body_json(resp).await;
        assert_eq!(err.code, "authentication_failed");
    }

    #[tokio::test]
    async fn missing_field_is_400_json() {
        let resp = test_router()
            .oneshot(json_post("/encrypt", serde_json::json!({"text": "hello"})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let err: ErrorResponse = body_json(resp).await;
        assert_eq!(err.code, "bad_request");
    }

    #[test]
    fn cipher_errors_map_to_service_errors() {
        assert!(matches!(
            ServiceError::from(CipherError::InvalidFormat),
            ServiceError::InvalidFormat
        ));
        assert!(matches!(
            ServiceError::from(CipherError::AuthenticationFailed),
            ServiceError::AuthenticationFailed
        ));
        assert!(matches!(
            ServiceError::from(CipherError::AeadFailure),
            ServiceError::EncryptionFailure(_)
        ));
    }
}
