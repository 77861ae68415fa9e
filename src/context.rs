//! Canonical request and completion contexts.
//!
//! A context is the plain concatenation of its fields in a fixed order, with
//! no delimiters. Timestamps are 8-byte little-endian; strings are UTF-8;
//! public keys are SubjectPublicKeyInfo DER.
//!
//! Request context:
//! [tag:1][userId][spki1][spki2][spki3][payload][analysisType][algorithm]
//!
//! Completion context (no tag, no payload, no algorithm):
//! [userId][spki1][spki2][spki3][computationId][analysisType]

use std::fmt;

use mozaik_crypto::CryptoProvider;

use crate::error::Result;
use crate::types::{Algorithm, RequestPayload, StateTag, PARTY_COUNT};

/// The three recipients' public keys in canonical exported form, in party order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientKeys {
    spki: [Vec<u8>; PARTY_COUNT],
}

impl RecipientKeys {
    /// Wrap already exported SPKI DER keys, in party order.
    pub fn new(spki: [Vec<u8>; PARTY_COUNT]) -> Self {
        Self { spki }
    }

    /// Export all three keys. Any export failure aborts the whole call.
    pub async fn export<P: CryptoProvider>(
        provider: &P,
        keys: &[P::PublicKey; PARTY_COUNT],
    ) -> Result<Self> {
        let mut spki: [Vec<u8>; PARTY_COUNT] = Default::default();
        for (slot, key) in spki.iter_mut().zip(keys.iter()) {
            *slot = provider.export_public_key(key).await?;
        }
        Ok(Self { spki })
    }

    /// Exported key of party `index` (0-based).
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.spki.get(index).map(Vec::as_slice)
    }

    /// Exported keys in party order.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.spki.iter().map(Vec::as_slice)
    }
}

/// Immutable context bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Context {
    bytes: Box<[u8]>,
}

impl Context {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// OAEP label for one recipient: `context || recipientKey`.
    pub fn recipient_label(&self, recipient_key: &[u8]) -> Vec<u8> {
        let mut label = Vec::with_capacity(self.bytes.len() + recipient_key.len());
        label.extend_from_slice(&self.bytes);
        label.extend_from_slice(recipient_key);
        label
    }
}

impl AsRef<[u8]> for Context {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context").field("len", &self.bytes.len()).finish()
    }
}

/// Appends fields in call order. Callers fix the order; the builder adds
/// no framing of its own.
#[derive(Debug, Default)]
pub struct ContextBuilder {
    buf: Vec<u8>,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state_tag(mut self, tag: StateTag) -> Self {
        self.buf.push(tag.as_byte());
        self
    }

    pub fn text(mut self, value: &str) -> Self {
        self.buf.extend_from_slice(value.as_bytes());
        self
    }

    pub fn bytes(mut self, value: &[u8]) -> Self {
        self.buf.extend_from_slice(value);
        self
    }

    pub fn recipients(mut self, keys: &RecipientKeys) -> Self {
        for key in keys.iter() {
            self.buf.extend_from_slice(key);
        }
        self
    }

    pub fn timestamp(mut self, value: u64) -> Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn payload(self, payload: &RequestPayload) -> Self {
        match payload {
            RequestPayload::DataIndices(indices) => {
                indices.iter().fold(self, |b, &ts| b.timestamp(ts))
            }
            RequestPayload::StreamingRange { start, stop } => {
                self.timestamp(*start).timestamp(*stop)
            }
        }
    }

    pub fn build(self) -> Context {
        Context {
            bytes: self.buf.into_boxed_slice(),
        }
    }
}

/// Context binding every share of one analysis request.
pub fn request_context(
    user_id: &str,
    recipients: &RecipientKeys,
    payload: &RequestPayload,
    analysis_type: &str,
    algorithm: Algorithm,
) -> Context {
    ContextBuilder::new()
        .state_tag(payload.state_tag())
        .text(user_id)
        .recipients(recipients)
        .payload(payload)
        .text(analysis_type)
        .text(algorithm.as_str())
        .build()
}

/// Context of a finished computation: associated data and nonce seed for
/// the encrypted result.
pub fn completion_context(
    user_id: &str,
    recipients: &RecipientKeys,
    computation_id: &str,
    analysis_type: &str,
) -> Context {
    ContextBuilder::new()
        .text(user_id)
        .recipients(recipients)
        .text(computation_id)
        .text(analysis_type)
        .build()
}
