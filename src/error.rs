use mozaik_crypto::CryptoError;
use thiserror::Error;

use crate::fhe::FheBackendError;

pub type Result<T> = std::result::Result<T, ProtocolError>;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Invalid key length: expected {expected} bytes, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("Invalid share length: expected {expected} bytes, got {got}")]
    InvalidShareLength { expected: usize, got: usize },

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Crypto error: {0}")]
    Crypto(CryptoError),

    #[error("Authentication failed: ciphertext or context was modified")]
    AuthenticationFailed,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Nonce space exhausted: a fresh device key is required")]
    RekeyRequired,

    #[error("FHE backend error: {0}")]
    Fhe(#[from] FheBackendError),
}

impl From<CryptoError> for ProtocolError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::AuthenticationFailed => ProtocolError::AuthenticationFailed,
            other => ProtocolError::Crypto(other),
        }
    }
}
