//! Key-sharing protocol core for privacy-preserving analysis of device data.
//!
//! A device key is split into three XOR shares, each sealed for one
//! computing party under a label bound to the request. Results come back
//! under the device key with a nonce derived from the completion context.

pub mod config;
pub mod context;
pub mod device;
pub mod encapsulate;
pub mod error;
pub mod fhe;
pub mod reconstruct;
pub mod split;
pub mod types;

#[cfg(test)]
mod test_support;

pub use config::ClientConfig;
pub use context::{completion_context, request_context, Context, ContextBuilder, RecipientKeys};
pub use device::{protect, unprotect, DeviceState, MIN_PROTECTED_LENGTH};
pub use encapsulate::{
    create_analysis_request, open_share, AnalysisRequest, EncapsulatedShares, PartyKeys,
};
pub use error::{ProtocolError, Result};
pub use fhe::{
    decode_fhe_result, softmax, FheBackend, FheBackendError, SerializationFormat,
    SerializedFheResult, FHE_OUTPUT_LENGTH,
};
pub use reconstruct::{
    derive_nonce, derive_result_params, reconstruct_result, seal_result, CompletionInfo,
    ResultParams,
};
pub use split::{combine_shares, shared_secret, split_key, split_secret, Share};
pub use types::{Algorithm, RequestPayload, SharingMode, StateTag, PARTY_COUNT};

pub use mozaik_crypto::{CryptoError, CryptoProvider, RsaPrivateKey, RsaPublicKey, RustCryptoProvider};
