//! Client configuration loaded from JSON.
//!
//! ```json
//! {
//!   "algorithm": "AES-GCM-128",
//!   "sharing_mode": "key-schedule",
//!   "recipients": ["-----BEGIN PUBLIC KEY-----...", "...", "..."],
//!   "fhe_format": "json"
//! }
//! ```

use std::path::Path;

use mozaik_crypto::{RsaPublicKey, RustCryptoProvider};
use serde::{Deserialize, Serialize};

use crate::encapsulate::PartyKeys;
use crate::error::{ProtocolError, Result};
use crate::fhe::SerializationFormat;
use crate::types::{Algorithm, SharingMode, PARTY_COUNT};

fn default_algorithm() -> String {
    Algorithm::AesGcm128.as_str().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(default)]
    pub sharing_mode: SharingMode,
    /// PEM-encoded SPKI public keys of the three parties, in party order.
    pub recipients: [String; PARTY_COUNT],
    #[serde(default)]
    pub fhe_format: SerializationFormat,
}

impl ClientConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Validated algorithm.
    pub fn algorithm(&self) -> Result<Algorithm> {
        self.algorithm.parse()
    }

    /// Parse the three recipient keys.
    pub fn load_recipients(&self) -> Result<[RsaPublicKey; PARTY_COUNT]> {
        let [a, b, c] = &self.recipients;
        Ok([
            RustCryptoProvider::public_key_from_pem(a)?,
            RustCryptoProvider::public_key_from_pem(b)?,
            RustCryptoProvider::public_key_from_pem(c)?,
        ])
    }

    /// Key material for party `index` whose private key is `private_pem`.
    pub async fn party_keys(
        &self,
        index: usize,
        private_pem: &str,
    ) -> Result<PartyKeys<RustCryptoProvider>> {
        let private_key = RustCryptoProvider::private_key_from_pem(private_pem)?;
        let own = private_key.to_public_key();
        let recipients = self.load_recipients()?;
        PartyKeys::new(&RustCryptoProvider, index, private_key, &own, &recipients).await
    }
}

impl TryFrom<&ClientConfig> for Algorithm {
    type Error = ProtocolError;

    fn try_from(config: &ClientConfig) -> Result<Self> {
        config.algorithm()
    }
}
