//! Decoding of FHE (CKKS) analysis results.

mod backend;
mod decoder;

pub use backend::{FheBackend, FheBackendError, SerializationFormat};
pub use decoder::{decode_fhe_result, softmax, SerializedFheResult, FHE_OUTPUT_LENGTH};
