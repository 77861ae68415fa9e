//! Boundary to the external FHE library.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ============================================================================
// Serialization format
// ============================================================================

/// Encoding of the serialized context, ciphertext and secret key.
///
/// Selected by the caller; never auto-detected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializationFormat {
    /// Compact binary, carried as base64url text.
    Binary,
    /// Textual form, passed to the backend as UTF-8 bytes.
    #[default]
    Json,
}

// ============================================================================
// FheBackend: the library doing CKKS deserialization and decryption
// ============================================================================

/// Error reported by an [`FheBackend`] implementation.
#[derive(Debug, Clone)]
pub struct FheBackendError {
    pub message: String,
}

impl FheBackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FheBackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FheBackendError {}

/// User-provided FHE library.
///
/// The library keeps global parameter state. Callers must invoke
/// [`release_all_contexts`](FheBackend::release_all_contexts) after every
/// decode; [`decode_fhe_result`](super::decode_fhe_result) does so on all
/// exit paths.
#[async_trait]
pub trait FheBackend: Send + Sync {
    type CryptoContext: Send + Sync;
    type Ciphertext: Send + Sync;
    type SecretKey: Send + Sync;

    async fn deserialize_crypto_context(
        &self,
        bytes: &[u8],
        format: SerializationFormat,
    ) -> std::result::Result<Self::CryptoContext, FheBackendError>;

    async fn deserialize_ciphertext(
        &self,
        bytes: &[u8],
        format: SerializationFormat,
    ) -> std::result::Result<Self::Ciphertext, FheBackendError>;

    async fn deserialize_secret_key(
        &self,
        bytes: &[u8],
        format: SerializationFormat,
    ) -> std::result::Result<Self::SecretKey, FheBackendError>;

    /// Decrypt to real coefficients, requesting `length` slots.
    async fn decrypt(
        &self,
        context: &Self::CryptoContext,
        secret_key: &Self::SecretKey,
        ciphertext: &Self::Ciphertext,
        length: usize,
    ) -> std::result::Result<Vec<f64>, FheBackendError>;

    /// Drop every crypto context the library still holds.
    fn release_all_contexts(&self);
}
