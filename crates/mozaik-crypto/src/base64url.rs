use base64ct::{Base64UrlUnpadded, Encoding};

use crate::error::CryptoError;

/// Base64url encode bytes without padding.
pub fn base64url_encode(data: &[u8]) -> String {
    Base64UrlUnpadded::encode_string(data)
}

/// Base64url decode a string to bytes. Trailing `=` padding is accepted.
pub fn base64url_decode(s: &str) -> Result<Vec<u8>, CryptoError> {
    Base64UrlUnpadded::decode_vec(s.trim_end_matches('='))
        .map_err(|e| CryptoError::Base64Decode(e.to_string()))
}
