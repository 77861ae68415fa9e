//! Device-side protection of sensor data.
//!
//! Blob format: `nonce (12) || ciphertext || tag (16)`, associated data
//! `user_id || nonce`. The nonce is a 96-bit little-endian counter that is
//! incremented before every encryption, so the first blob carries
//! `start_nonce + 1`.

use mozaik_crypto::{GcmCipher, AES_128_KEY_LENGTH, AES_GCM_NONCE_LENGTH, AES_GCM_TAG_LENGTH};
use tracing::warn;
use zeroize::Zeroizing;

use crate::error::{ProtocolError, Result};
use crate::types::Algorithm;

const NONCE_BITS: u32 = (AES_GCM_NONCE_LENGTH * 8) as u32;
const MAX_NONCES: u128 = 1 << NONCE_BITS;

/// Minimum size of a protected blob (nonce and tag around empty data).
pub const MIN_PROTECTED_LENGTH: usize = AES_GCM_NONCE_LENGTH + AES_GCM_TAG_LENGTH;

/// State persisted between [`protect`] calls made with the same device key.
#[derive(Clone)]
pub struct DeviceState {
    used_nonces: u128,
    nonce: [u8; AES_GCM_NONCE_LENGTH],
    key: Zeroizing<[u8; AES_128_KEY_LENGTH]>,
}

impl DeviceState {
    /// `start_nonce` should be fresh and `key` must never have been used.
    pub fn new(start_nonce: [u8; AES_GCM_NONCE_LENGTH], key: [u8; AES_128_KEY_LENGTH]) -> Self {
        Self {
            used_nonces: 0,
            nonce: start_nonce,
            key: Zeroizing::new(key),
        }
    }

    /// The most recently issued nonce (the start nonce before any use).
    pub fn nonce(&self) -> &[u8; AES_GCM_NONCE_LENGTH] {
        &self.nonce
    }

    pub fn used_nonces(&self) -> u128 {
        self.used_nonces
    }

    fn fresh_nonce(&mut self) -> Result<[u8; AES_GCM_NONCE_LENGTH]> {
        if self.used_nonces >= MAX_NONCES {
            return Err(ProtocolError::RekeyRequired);
        }
        self.used_nonces += 1;

        let mut wide = [0u8; 16];
        wide[..AES_GCM_NONCE_LENGTH].copy_from_slice(&self.nonce);
        let next = (u128::from_le_bytes(wide) + 1) % MAX_NONCES;
        self.nonce
            .copy_from_slice(&next.to_le_bytes()[..AES_GCM_NONCE_LENGTH]);
        Ok(self.nonce)
    }
}

impl std::fmt::Debug for DeviceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceState")
            .field("used_nonces", &self.used_nonces)
            .field("nonce", &self.nonce)
            .finish_non_exhaustive()
    }
}

fn associated_data(user_id: &str, nonce: &[u8]) -> Vec<u8> {
    let mut ad = Vec::with_capacity(user_id.len() + nonce.len());
    ad.extend_from_slice(user_id.as_bytes());
    ad.extend_from_slice(nonce);
    ad
}

/// Encrypt `data` for upload.
///
/// Returns [`ProtocolError::RekeyRequired`] once all 2^96 nonces are spent;
/// the state stays exhausted after that.
pub fn protect(
    user_id: &str,
    state: &mut DeviceState,
    algorithm: Algorithm,
    data: &[u8],
) -> Result<Vec<u8>> {
    match algorithm {
        Algorithm::AesGcm128 => {
            let cipher = GcmCipher::new(state.key.as_slice())?;
            let nonce = match state.fresh_nonce() {
                Ok(nonce) => nonce,
                Err(err) => {
                    warn!(user_id, "device nonce space exhausted");
                    return Err(err);
                }
            };
            let ct = cipher.encrypt(&nonce, data, &associated_data(user_id, &nonce))?;

            let mut blob = Vec::with_capacity(AES_GCM_NONCE_LENGTH + ct.len());
            blob.extend_from_slice(&nonce);
            blob.extend_from_slice(&ct);
            Ok(blob)
        }
    }
}

/// Inverse of [`protect`], for the holder of the device key.
pub fn unprotect(user_id: &str, key: &[u8], blob: &[u8]) -> Result<Vec<u8>> {
    if blob.len() < MIN_PROTECTED_LENGTH {
        return Err(ProtocolError::MalformedInput(format!(
            "protected blob of {} bytes is shorter than {}",
            blob.len(),
            MIN_PROTECTED_LENGTH
        )));
    }
    let cipher = GcmCipher::new(key)?;
    let (nonce, ct) = blob.split_at(AES_GCM_NONCE_LENGTH);
    let mut nonce_arr = [0u8; AES_GCM_NONCE_LENGTH];
    nonce_arr.copy_from_slice(nonce);
    Ok(cipher.decrypt(&nonce_arr, ct, &associated_data(user_id, nonce))?)
}
