//! 3-out-of-3 additive (XOR) secret sharing of device keys.

use std::fmt;

use mozaik_crypto::{expand_key, random_bytes};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{ProtocolError, Result};
use crate::types::{Algorithm, SharingMode, PARTY_COUNT};

/// One party's share. Zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Share(Vec<u8>);

impl Share {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Share").field("len", &self.0.len()).finish()
    }
}

/// Secret material that gets shared under `mode`: the key itself or its
/// expanded schedule.
pub fn shared_secret(
    key: &[u8],
    algorithm: Algorithm,
    mode: SharingMode,
) -> Result<Zeroizing<Vec<u8>>> {
    let expected = algorithm.key_length();
    if key.len() != expected {
        return Err(ProtocolError::InvalidKeyLength {
            expected,
            got: key.len(),
        });
    }
    match mode {
        SharingMode::RawKey => Ok(Zeroizing::new(key.to_vec())),
        SharingMode::KeySchedule => {
            let mut bytes = expand_key(key)?.to_bytes();
            let secret = Zeroizing::new(bytes.to_vec());
            bytes.zeroize();
            Ok(secret)
        }
    }
}

/// Split a device key into three shares of `mode.share_length()` bytes.
pub fn split_key(key: &[u8], algorithm: Algorithm, mode: SharingMode) -> Result<[Share; PARTY_COUNT]> {
    let secret = shared_secret(key, algorithm, mode)?;
    split_secret(&secret)
}

/// Two uniformly random shares and `secret ^ s1 ^ s2`.
pub fn split_secret(secret: &[u8]) -> Result<[Share; PARTY_COUNT]> {
    let first = random_bytes(secret.len())?;
    let second = random_bytes(secret.len())?;
    let third = secret
        .iter()
        .zip(first.iter().zip(second.iter()))
        .map(|(s, (a, b))| s ^ a ^ b)
        .collect();
    Ok([
        Share::from_bytes(first),
        Share::from_bytes(second),
        Share::from_bytes(third),
    ])
}

/// XOR all three shares back together.
pub fn combine_shares(shares: &[Share; PARTY_COUNT]) -> Result<Zeroizing<Vec<u8>>> {
    let len = shares[0].len();
    if let Some(bad) = shares.iter().find(|s| s.len() != len) {
        return Err(ProtocolError::InvalidShareLength {
            expected: len,
            got: bad.len(),
        });
    }
    let mut out = Zeroizing::new(vec![0u8; len]);
    for share in shares {
        for (acc, byte) in out.iter_mut().zip(share.as_bytes()) {
            *acc ^= byte;
        }
    }
    Ok(out)
}
