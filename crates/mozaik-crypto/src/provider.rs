//! Crypto provider seam.
//!
//! Protocol code never touches a global crypto handle. Every operation that
//! needs a primitive takes a `&impl CryptoProvider` and works on the
//! provider's opaque key handles.

use async_trait::async_trait;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

use crate::aes_gcm::GcmCipher;
use crate::error::CryptoError;
use crate::oaep;
use crate::types::{AES_GCM_NONCE_LENGTH, SHA256_DIGEST_LENGTH};

/// Primitive operations the protocol depends on.
#[async_trait]
pub trait CryptoProvider: Send + Sync {
    /// Recipient public key handle.
    type PublicKey: Send + Sync;
    /// Recipient private key handle.
    type PrivateKey: Send + Sync;
    /// Imported symmetric key handle.
    type SecretKey: Send + Sync;

    /// Export a public key in canonical SubjectPublicKeyInfo DER form.
    /// The export must be deterministic for a given key.
    async fn export_public_key(&self, key: &Self::PublicKey) -> Result<Vec<u8>, CryptoError>;

    /// Import raw symmetric key bytes.
    async fn import_secret_key(&self, raw: &[u8]) -> Result<Self::SecretKey, CryptoError>;

    /// Label-bound public-key encryption.
    async fn encrypt_labeled(
        &self,
        key: &Self::PublicKey,
        label: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;

    /// Label-bound public-key decryption. Fails if the label differs from
    /// the one used at encryption.
    async fn decrypt_labeled(
        &self,
        key: &Self::PrivateKey,
        label: &[u8],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;

    /// SHA-256.
    async fn digest(&self, data: &[u8]) -> Result<[u8; SHA256_DIGEST_LENGTH], CryptoError>;

    /// AEAD encryption; output is `ciphertext || tag`.
    async fn seal(
        &self,
        key: &Self::SecretKey,
        nonce: &[u8; AES_GCM_NONCE_LENGTH],
        aad: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;

    /// AEAD decryption of `ciphertext || tag`. Tag mismatch is
    /// [`CryptoError::AuthenticationFailed`].
    async fn open(
        &self,
        key: &Self::SecretKey,
        nonce: &[u8; AES_GCM_NONCE_LENGTH],
        aad: &[u8],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;
}

/// Default provider: RSA-OAEP-SHA256, AES-128-GCM and SHA-256 from the
/// RustCrypto crates.
#[derive(Debug, Default, Clone, Copy)]
pub struct RustCryptoProvider;

impl RustCryptoProvider {
    pub fn new() -> Self {
        Self
    }

    /// Parse a PEM `PUBLIC KEY` (SPKI) block.
    pub fn public_key_from_pem(pem: &str) -> Result<RsaPublicKey, CryptoError> {
        RsaPublicKey::from_public_key_pem(pem.trim())
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
    }

    /// Parse a PEM `PRIVATE KEY` (PKCS#8) block.
    pub fn private_key_from_pem(pem: &str) -> Result<RsaPrivateKey, CryptoError> {
        RsaPrivateKey::from_pkcs8_pem(pem.trim())
            .map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))
    }
}

#[async_trait]
impl CryptoProvider for RustCryptoProvider {
    type PublicKey = RsaPublicKey;
    type PrivateKey = RsaPrivateKey;
    type SecretKey = GcmCipher;

    async fn export_public_key(&self, key: &RsaPublicKey) -> Result<Vec<u8>, CryptoError> {
        key.to_public_key_der()
            .map(|doc| doc.as_bytes().to_vec())
            .map_err(|e| CryptoError::KeyExportFailed(e.to_string()))
    }

    async fn import_secret_key(&self, raw: &[u8]) -> Result<GcmCipher, CryptoError> {
        GcmCipher::new(raw)
    }

    async fn encrypt_labeled(
        &self,
        key: &RsaPublicKey,
        label: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        oaep::encrypt(key, label, plaintext)
    }

    async fn decrypt_labeled(
        &self,
        key: &RsaPrivateKey,
        label: &[u8],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        oaep::decrypt(key, label, ciphertext)
    }

    async fn digest(&self, data: &[u8]) -> Result<[u8; SHA256_DIGEST_LENGTH], CryptoError> {
        let mut out = [0u8; SHA256_DIGEST_LENGTH];
        out.copy_from_slice(&Sha256::digest(data));
        Ok(out)
    }

    async fn seal(
        &self,
        key: &GcmCipher,
        nonce: &[u8; AES_GCM_NONCE_LENGTH],
        aad: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        key.encrypt(nonce, plaintext, aad)
    }

    async fn open(
        &self,
        key: &GcmCipher,
        nonce: &[u8; AES_GCM_NONCE_LENGTH],
        aad: &[u8],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        key.decrypt(nonce, ciphertext, aad)
    }
}
