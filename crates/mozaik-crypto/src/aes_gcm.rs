//! AES-128-GCM with caller-supplied nonces.
//!
//! Wire format: [N bytes: ciphertext][16 bytes: tag]
//! The nonce is never written into the blob. Callers either derive it from
//! shared context or frame it themselves.

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes128Gcm, Nonce};

use crate::error::CryptoError;
use crate::types::{AES_128_KEY_LENGTH, AES_GCM_NONCE_LENGTH, AES_GCM_TAG_LENGTH};

/// AES-128-GCM cipher bound to one imported key.
///
/// The key material is zeroized when the cipher is dropped.
pub struct GcmCipher {
    cipher: Aes128Gcm,
}

impl GcmCipher {
    /// Import a raw 16-byte key.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != AES_128_KEY_LENGTH {
            return Err(CryptoError::InvalidKeyLength {
                expected: AES_128_KEY_LENGTH,
                got: key.len(),
            });
        }
        let cipher = Aes128Gcm::new_from_slice(key)
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
        Ok(Self { cipher })
    }

    /// Encrypt `data` and append the 128-bit tag.
    pub fn encrypt(
        &self,
        nonce: &[u8; AES_GCM_NONCE_LENGTH],
        data: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        self.cipher
            .encrypt(Nonce::from_slice(nonce), Payload { msg: data, aad })
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))
    }

    /// Verify the tag and decrypt `[ciphertext][tag]`.
    ///
    /// A tag mismatch is reported as [`CryptoError::AuthenticationFailed`]
    /// and no plaintext is released.
    pub fn decrypt(
        &self,
        nonce: &[u8; AES_GCM_NONCE_LENGTH],
        encrypted: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        if encrypted.len() < AES_GCM_TAG_LENGTH {
            return Err(CryptoError::DataTooShort);
        }
        self.cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: encrypted,
                    aad,
                },
            )
            .map_err(|_| CryptoError::AuthenticationFailed)
    }
}
