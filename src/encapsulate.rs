//! Share encapsulation (client side) and share opening (party side).
//!
//! Each share is encrypted under its recipient's public key with the OAEP
//! label `requestContext || recipientKey`, so a ciphertext only opens for
//! the same request and the same recipient.

use mozaik_crypto::CryptoProvider;
use tracing::debug;

use crate::context::{request_context, RecipientKeys};
use crate::error::{ProtocolError, Result};
use crate::split::{shared_secret, split_secret, Share};
use crate::types::{Algorithm, RequestPayload, SharingMode, PARTY_COUNT};

/// Fields identifying one analysis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub user_id: String,
    pub analysis_type: String,
    /// Symmetric algorithm identifier, e.g. `"AES-GCM-128"`.
    pub algorithm: String,
    pub payload: RequestPayload,
    pub sharing_mode: SharingMode,
}

impl AnalysisRequest {
    pub fn new(
        user_id: impl Into<String>,
        analysis_type: impl Into<String>,
        algorithm: impl Into<String>,
        payload: RequestPayload,
        sharing_mode: SharingMode,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            analysis_type: analysis_type.into(),
            algorithm: algorithm.into(),
            payload,
            sharing_mode,
        }
    }

    fn context(&self, algorithm: Algorithm, recipients: &RecipientKeys) -> crate::context::Context {
        request_context(
            &self.user_id,
            recipients,
            &self.payload,
            &self.analysis_type,
            algorithm,
        )
    }
}

/// One ciphertext per party, in party order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncapsulatedShares {
    ciphertexts: [Vec<u8>; PARTY_COUNT],
}

impl EncapsulatedShares {
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.ciphertexts.get(index).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.ciphertexts.iter().map(Vec::as_slice)
    }

    pub fn into_inner(self) -> [Vec<u8>; PARTY_COUNT] {
        self.ciphertexts
    }
}

/// Split `device_key` and encrypt one share for each recipient.
///
/// All-or-nothing: an unsupported algorithm is rejected before any work,
/// and any export or encryption failure discards every ciphertext produced
/// so far.
pub async fn create_analysis_request<P: CryptoProvider>(
    provider: &P,
    request: &AnalysisRequest,
    device_key: &[u8],
    recipients: &[P::PublicKey; PARTY_COUNT],
) -> Result<EncapsulatedShares> {
    let algorithm: Algorithm = request.algorithm.parse()?;
    let secret = shared_secret(device_key, algorithm, request.sharing_mode)?;

    let exported = RecipientKeys::export(provider, recipients).await?;
    let context = request.context(algorithm, &exported);
    let shares = split_secret(&secret)?;

    let mut ciphertexts: [Vec<u8>; PARTY_COUNT] = Default::default();
    for (((slot, share), key), spki) in ciphertexts
        .iter_mut()
        .zip(shares.iter())
        .zip(recipients.iter())
        .zip(exported.iter())
    {
        let label = context.recipient_label(spki);
        *slot = provider
            .encrypt_labeled(key, &label, share.as_bytes())
            .await?;
    }

    debug!(
        analysis_type = %request.analysis_type,
        mode = ?request.sharing_mode,
        tag = ?request.payload.state_tag(),
        context_len = context.len(),
        "encapsulated key shares"
    );
    Ok(EncapsulatedShares { ciphertexts })
}

/// A computing party's key material: its private key, its position, and the
/// exported public keys of all three parties.
pub struct PartyKeys<P: CryptoProvider> {
    index: usize,
    private_key: P::PrivateKey,
    recipients: RecipientKeys,
}

impl<P: CryptoProvider> PartyKeys<P> {
    /// Fails if `index` is out of range or `own_public_key` is not the key
    /// listed at `index`.
    pub async fn new(
        provider: &P,
        index: usize,
        private_key: P::PrivateKey,
        own_public_key: &P::PublicKey,
        party_keys: &[P::PublicKey; PARTY_COUNT],
    ) -> Result<Self> {
        if index >= PARTY_COUNT {
            return Err(ProtocolError::Config(format!(
                "party index {} out of range 0..{}",
                index, PARTY_COUNT
            )));
        }
        let recipients = RecipientKeys::export(provider, party_keys).await?;
        let own = provider.export_public_key(own_public_key).await?;
        if recipients.get(index) != Some(own.as_slice()) {
            return Err(ProtocolError::Config(format!(
                "own public key does not match party key {}",
                index
            )));
        }
        Ok(Self {
            index,
            private_key,
            recipients,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn recipients(&self) -> &RecipientKeys {
        &self.recipients
    }

    pub fn private_key(&self) -> &P::PrivateKey {
        &self.private_key
    }
}

/// Decrypt this party's share of `request`.
///
/// Fails if the ciphertext was produced for another request context or
/// another recipient, or if the share length does not match the request's
/// sharing mode.
pub async fn open_share<P: CryptoProvider>(
    provider: &P,
    party: &PartyKeys<P>,
    request: &AnalysisRequest,
    ciphertext: &[u8],
) -> Result<Share> {
    let algorithm: Algorithm = request.algorithm.parse()?;
    let context = request.context(algorithm, party.recipients());
    let own = party
        .recipients()
        .get(party.index())
        .ok_or_else(|| ProtocolError::Config(format!("no key for party {}", party.index())))?;

    let label = context.recipient_label(own);
    let share = Share::from_bytes(
        provider
            .decrypt_labeled(party.private_key(), &label, ciphertext)
            .await?,
    );

    let expected = request.sharing_mode.share_length();
    if share.len() != expected {
        return Err(ProtocolError::InvalidShareLength {
            expected,
            got: share.len(),
        });
    }
    Ok(share)
}
