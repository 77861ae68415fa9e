pub mod aes_gcm;
pub mod base64url;
pub mod error;
pub mod key_schedule;
pub mod oaep;
pub mod provider;
pub mod random;
pub mod types;

pub use aes_gcm::GcmCipher;
pub use base64url::{base64url_decode, base64url_encode};
pub use error::CryptoError;
pub use key_schedule::{expand_key, KeySchedule};
pub use provider::{CryptoProvider, RustCryptoProvider};
pub use rsa::{RsaPrivateKey, RsaPublicKey};
pub use random::{fill_random, random_bytes};
pub use types::{
    AES_128_KEY_LENGTH, AES_GCM_NONCE_LENGTH, AES_GCM_TAG_LENGTH, KEY_SCHEDULE_LENGTH,
    KEY_SCHEDULE_WORDS, SHA256_DIGEST_LENGTH,
};
