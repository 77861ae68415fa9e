//! CKKS result decoding through an [`FheBackend`].

use std::borrow::Cow;

use mozaik_crypto::base64url_decode;
use tracing::{debug, warn};

use super::backend::{FheBackend, SerializationFormat};
use crate::error::{ProtocolError, Result};

/// Number of coefficients kept from a decrypted result.
pub const FHE_OUTPUT_LENGTH: usize = 5;

/// The three serialized inputs of one decode, as received by the client.
#[derive(Debug, Clone, Copy)]
pub struct SerializedFheResult<'a> {
    pub crypto_context: &'a str,
    pub ciphertext: &'a str,
    pub secret_key: &'a str,
}

/// Releases all backend contexts when dropped.
struct ContextScope<'a, B: FheBackend> {
    backend: &'a B,
}

impl<'a, B: FheBackend> ContextScope<'a, B> {
    fn enter(backend: &'a B) -> Self {
        Self { backend }
    }
}

impl<B: FheBackend> Drop for ContextScope<'_, B> {
    fn drop(&mut self) {
        self.backend.release_all_contexts();
    }
}

fn decode_blob<'a>(field: &str, value: &'a str, format: SerializationFormat) -> Result<Cow<'a, [u8]>> {
    match format {
        SerializationFormat::Json => Ok(Cow::Borrowed(value.as_bytes())),
        SerializationFormat::Binary => base64url_decode(value)
            .map(Cow::Owned)
            .map_err(|e| ProtocolError::MalformedInput(format!("{field}: {e}"))),
    }
}

/// Deserialize, decrypt, truncate to [`FHE_OUTPUT_LENGTH`] and softmax.
///
/// Backend contexts are released exactly once per call, whether it succeeds
/// or fails.
pub async fn decode_fhe_result<B: FheBackend>(
    backend: &B,
    input: &SerializedFheResult<'_>,
    format: SerializationFormat,
) -> Result<Vec<f64>> {
    let _scope = ContextScope::enter(backend);
    match decrypt_coefficients(backend, input, format).await {
        Ok(values) => {
            debug!(?format, slots = values.len(), "decoded FHE result");
            Ok(softmax(&values))
        }
        Err(err) => {
            warn!(?format, error = %err, "FHE decode aborted");
            Err(err)
        }
    }
}

async fn decrypt_coefficients<B: FheBackend>(
    backend: &B,
    input: &SerializedFheResult<'_>,
    format: SerializationFormat,
) -> Result<Vec<f64>> {
    let context_bytes = decode_blob("crypto context", input.crypto_context, format)?;
    let ciphertext_bytes = decode_blob("ciphertext", input.ciphertext, format)?;
    let secret_key_bytes = decode_blob("secret key", input.secret_key, format)?;

    let context = backend
        .deserialize_crypto_context(&context_bytes, format)
        .await?;
    let ciphertext = backend
        .deserialize_ciphertext(&ciphertext_bytes, format)
        .await?;
    let secret_key = backend
        .deserialize_secret_key(&secret_key_bytes, format)
        .await?;

    let mut values = backend
        .decrypt(&context, &secret_key, &ciphertext, FHE_OUTPUT_LENGTH)
        .await?;
    if values.len() < FHE_OUTPUT_LENGTH {
        return Err(ProtocolError::MalformedInput(format!(
            "decrypted {} coefficients, need {}",
            values.len(),
            FHE_OUTPUT_LENGTH
        )));
    }
    values.truncate(FHE_OUTPUT_LENGTH);
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ProtocolError::MalformedInput(
            "decrypted coefficients are not finite".into(),
        ));
    }
    Ok(values)
}

/// `exp(x_i - max) / sum_j exp(x_j - max)`.
pub fn softmax(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = values.iter().map(|v| (v - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
