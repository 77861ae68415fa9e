//! Result reconstruction with a context-derived nonce.
//!
//! The nonce is never transmitted: both sides compute
//! `nonce = SHA-256(completionContext)[0..12]` and use the completion
//! context as associated data. The result blob is `ciphertext || tag`.
//!
//! Nonce uniqueness rests entirely on the completion context. A computation
//! id must never be reused under the same device key.

use mozaik_crypto::{CryptoProvider, AES_GCM_NONCE_LENGTH, AES_GCM_TAG_LENGTH};
use tracing::{debug, warn};

use crate::context::{completion_context, Context, RecipientKeys};
use crate::error::{ProtocolError, Result};
use crate::types::PARTY_COUNT;

/// Fields known once a computation has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionInfo {
    pub user_id: String,
    pub computation_id: String,
    pub analysis_type: String,
}

impl CompletionInfo {
    pub fn new(
        user_id: impl Into<String>,
        computation_id: impl Into<String>,
        analysis_type: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            computation_id: computation_id.into(),
            analysis_type: analysis_type.into(),
        }
    }
}

/// Nonce and associated data for one result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultParams {
    pub nonce: [u8; AES_GCM_NONCE_LENGTH],
    pub associated_data: Context,
}

/// First 12 bytes of the context's SHA-256 digest.
pub async fn derive_nonce<P: CryptoProvider>(
    provider: &P,
    context: &Context,
) -> Result<[u8; AES_GCM_NONCE_LENGTH]> {
    let digest = provider.digest(context.as_bytes()).await?;
    let mut nonce = [0u8; AES_GCM_NONCE_LENGTH];
    nonce.copy_from_slice(&digest[..AES_GCM_NONCE_LENGTH]);
    Ok(nonce)
}

/// Build the completion context and its nonce.
pub async fn derive_result_params<P: CryptoProvider>(
    provider: &P,
    recipients: &RecipientKeys,
    info: &CompletionInfo,
) -> Result<ResultParams> {
    let associated_data = completion_context(
        &info.user_id,
        recipients,
        &info.computation_id,
        &info.analysis_type,
    );
    let nonce = derive_nonce(provider, &associated_data).await?;
    Ok(ResultParams {
        nonce,
        associated_data,
    })
}

/// Encrypt a result for the device owner (computing side).
pub async fn seal_result<P: CryptoProvider>(
    provider: &P,
    key: &P::SecretKey,
    params: &ResultParams,
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    Ok(provider
        .seal(key, &params.nonce, params.associated_data.as_bytes(), plaintext)
        .await?)
}

/// Authenticate and decrypt a computation result.
///
/// A tag mismatch (tampering, wrong key, or any differing completion field)
/// is [`ProtocolError::AuthenticationFailed`]; no plaintext is returned.
pub async fn reconstruct_result<P: CryptoProvider>(
    provider: &P,
    device_key: &[u8],
    recipients: &[P::PublicKey; PARTY_COUNT],
    info: &CompletionInfo,
    encrypted_result: &[u8],
) -> Result<Vec<u8>> {
    if encrypted_result.len() < AES_GCM_TAG_LENGTH {
        return Err(ProtocolError::MalformedInput(format!(
            "encrypted result of {} bytes is shorter than the {}-byte tag",
            encrypted_result.len(),
            AES_GCM_TAG_LENGTH
        )));
    }
    let key = provider.import_secret_key(device_key).await?;
    let exported = RecipientKeys::export(provider, recipients).await?;
    let params = derive_result_params(provider, &exported, info).await?;

    match provider
        .open(
            &key,
            &params.nonce,
            params.associated_data.as_bytes(),
            encrypted_result,
        )
        .await
        .map_err(ProtocolError::from)
    {
        Ok(plaintext) => {
            debug!(
                computation_id = %info.computation_id,
                len = plaintext.len(),
                "reconstructed result"
            );
            Ok(plaintext)
        }
        Err(ProtocolError::AuthenticationFailed) => {
            warn!(
                computation_id = %info.computation_id,
                "result authentication failed"
            );
            Err(ProtocolError::AuthenticationFailed)
        }
        Err(other) => Err(other),
    }
}
