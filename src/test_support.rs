//! Shared fixtures for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use mozaik_crypto::{
    CryptoError, CryptoProvider, GcmCipher, RsaPrivateKey, RsaPublicKey, RustCryptoProvider,
    AES_GCM_NONCE_LENGTH, SHA256_DIGEST_LENGTH,
};

use crate::encapsulate::PartyKeys;
use crate::types::PARTY_COUNT;

pub const PRIVATE_KEYS: [&str; PARTY_COUNT] = [
    include_str!("../tests/fixtures/party_key_1.pem"),
    include_str!("../tests/fixtures/party_key_2.pem"),
    include_str!("../tests/fixtures/party_key_3.pem"),
];

pub const PUBLIC_KEYS: [&str; PARTY_COUNT] = [
    include_str!("../tests/fixtures/party_pub_1.pem"),
    include_str!("../tests/fixtures/party_pub_2.pem"),
    include_str!("../tests/fixtures/party_pub_3.pem"),
];

pub const USER_ID: &str = "4d14750e-2353-4d30-ac2b-e893818076d2";

pub const DEVICE_KEY: [u8; 16] = [
    0x12, 0x23, 0x34, 0x45, 0x56, 0x67, 0x78, 0x89, 0x9a, 0xab, 0xbc, 0xcd, 0xde, 0xef, 0xf0, 0x01,
];

pub fn public_keys() -> [RsaPublicKey; PARTY_COUNT] {
    PUBLIC_KEYS.map(|pem| RustCryptoProvider::public_key_from_pem(pem).unwrap())
}

pub fn private_key(index: usize) -> RsaPrivateKey {
    RustCryptoProvider::private_key_from_pem(PRIVATE_KEYS[index]).unwrap()
}

pub async fn party(index: usize) -> PartyKeys<RustCryptoProvider> {
    let private = private_key(index);
    let own = private.to_public_key();
    PartyKeys::new(&RustCryptoProvider, index, private, &own, &public_keys())
        .await
        .unwrap()
}

/// Delegates to [`RustCryptoProvider`], counting calls and failing chosen ones.
#[derive(Default)]
pub struct FaultyProvider {
    pub fail_export_at: Option<usize>,
    pub fail_encrypt_at: Option<usize>,
    pub exports: AtomicUsize,
    pub encryptions: AtomicUsize,
}

impl FaultyProvider {
    pub fn exports(&self) -> usize {
        self.exports.load(Ordering::SeqCst)
    }

    pub fn encryptions(&self) -> usize {
        self.encryptions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CryptoProvider for FaultyProvider {
    type PublicKey = RsaPublicKey;
    type PrivateKey = RsaPrivateKey;
    type SecretKey = GcmCipher;

    async fn export_public_key(&self, key: &RsaPublicKey) -> Result<Vec<u8>, CryptoError> {
        let n = self.exports.fetch_add(1, Ordering::SeqCst);
        if self.fail_export_at == Some(n) {
            return Err(CryptoError::KeyExportFailed("injected".into()));
        }
        RustCryptoProvider.export_public_key(key).await
    }

    async fn import_secret_key(&self, raw: &[u8]) -> Result<GcmCipher, CryptoError> {
        RustCryptoProvider.import_secret_key(raw).await
    }

    async fn encrypt_labeled(
        &self,
        key: &RsaPublicKey,
        label: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let n = self.encryptions.fetch_add(1, Ordering::SeqCst);
        if self.fail_encrypt_at == Some(n) {
            return Err(CryptoError::EncryptionFailed("injected".into()));
        }
        RustCryptoProvider.encrypt_labeled(key, label, plaintext).await
    }

    async fn decrypt_labeled(
        &self,
        key: &RsaPrivateKey,
        label: &[u8],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        RustCryptoProvider.decrypt_labeled(key, label, ciphertext).await
    }

    async fn digest(&self, data: &[u8]) -> Result<[u8; SHA256_DIGEST_LENGTH], CryptoError> {
        RustCryptoProvider.digest(data).await
    }

    async fn seal(
        &self,
        key: &GcmCipher,
        nonce: &[u8; AES_GCM_NONCE_LENGTH],
        aad: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        RustCryptoProvider.seal(key, nonce, aad, plaintext).await
    }

    async fn open(
        &self,
        key: &GcmCipher,
        nonce: &[u8; AES_GCM_NONCE_LENGTH],
        aad: &[u8],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        RustCryptoProvider.open(key, nonce, aad, ciphertext).await
    }
}
