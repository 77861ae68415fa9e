//! OS-backed randomness.

use crate::error::CryptoError;

/// Fill `buf` from the operating system CSPRNG.
pub fn fill_random(buf: &mut [u8]) -> Result<(), CryptoError> {
    getrandom::getrandom(buf).map_err(|e| CryptoError::RngFailed(e.to_string()))
}

/// Allocate `len` random bytes.
pub fn random_bytes(len: usize) -> Result<Vec<u8>, CryptoError> {
    let mut out = vec![0u8; len];
    fill_random(&mut out)?;
    Ok(out)
}
