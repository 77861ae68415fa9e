//! RSAES-OAEP (RFC 8017 §7.1) with SHA-256 and MGF1-SHA-256.
//!
//! The label is an arbitrary byte string, which is what binds a share to the
//! request context and to its recipient. Output is compatible with WebCrypto
//! `RSA-OAEP` (hash SHA-256) and OpenSSL `rsa_oaep_label`.
//!
//! Padding checks on decryption run in constant time and fail with a single
//! error.

use rand::rngs::OsRng;
use rsa::hazmat::{rsa_decrypt_and_check, rsa_encrypt};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::{Zeroize, Zeroizing};

use crate::error::CryptoError;
use crate::random::fill_random;
use crate::types::SHA256_DIGEST_LENGTH;

const HASH_LENGTH: usize = SHA256_DIGEST_LENGTH;

/// Largest message that fits under a modulus of `modulus_len` bytes.
pub fn max_message_length(modulus_len: usize) -> usize {
    modulus_len.saturating_sub(2 * HASH_LENGTH + 2)
}

/// XOR `MGF1-SHA256(seed, out.len())` into `out`.
fn mgf1_xor(out: &mut [u8], seed: &[u8]) {
    for (counter, chunk) in out.chunks_mut(HASH_LENGTH).enumerate() {
        let mut hasher = Sha256::new();
        hasher.update(seed);
        hasher.update((counter as u32).to_be_bytes());
        let mask = hasher.finalize();
        for (byte, m) in chunk.iter_mut().zip(mask.iter()) {
            *byte ^= m;
        }
    }
}

/// I2OSP: big-endian integer bytes left-padded to `len`.
fn left_pad(bytes: &[u8], len: usize) -> Option<Zeroizing<Vec<u8>>> {
    if bytes.len() > len {
        return None;
    }
    let mut out = Zeroizing::new(vec![0u8; len]);
    out[len - bytes.len()..].copy_from_slice(bytes);
    Some(out)
}

/// Build `EM = 0x00 || maskedSeed || maskedDB` of `k` bytes.
///
/// The caller has checked that `message` fits.
fn pad(k: usize, label: &[u8], message: &[u8], seed: &[u8; HASH_LENGTH]) -> Zeroizing<Vec<u8>> {
    let mut em = Zeroizing::new(vec![0u8; k]);
    let (masked_seed, db) = em[1..].split_at_mut(HASH_LENGTH);
    masked_seed.copy_from_slice(seed);

    // DB = lHash || PS || 0x01 || M
    db[..HASH_LENGTH].copy_from_slice(&Sha256::digest(label));
    let message_start = db.len() - message.len();
    db[message_start - 1] = 0x01;
    db[message_start..].copy_from_slice(message);

    mgf1_xor(db, masked_seed);
    mgf1_xor(masked_seed, db);
    em
}

/// Unmask `em` in place and return `M`.
///
/// Every byte of DB is visited regardless of content; the only branch is on
/// the combined validity flag.
fn unpad(em: &mut [u8], label: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let leading_zero = em[0].ct_eq(&0u8);
    let (seed, db) = em[1..].split_at_mut(HASH_LENGTH);
    mgf1_xor(seed, db);
    mgf1_xor(db, seed);

    let hash_matches = db[..HASH_LENGTH].ct_eq(Sha256::digest(label).as_slice());

    // PS must be all zero up to the first 0x01.
    let mut looking = Choice::from(1u8);
    let mut separator = 0u32;
    let mut bad_padding = Choice::from(0u8);
    for (i, byte) in db[HASH_LENGTH..].iter().enumerate() {
        let is_one = byte.ct_eq(&0x01);
        let is_zero = byte.ct_eq(&0x00);
        separator.conditional_assign(&(i as u32), looking & is_one);
        looking &= !is_one;
        bad_padding |= looking & !is_zero;
    }

    let valid = leading_zero & hash_matches & !bad_padding & !looking;
    if !bool::from(valid) {
        return Err(decoding_error());
    }
    Ok(db[HASH_LENGTH + separator as usize + 1..].to_vec())
}

fn decoding_error() -> CryptoError {
    CryptoError::DecryptionFailed("OAEP decoding error".to_string())
}

/// Encrypt `message` for `key` with the given OAEP label.
pub fn encrypt(key: &RsaPublicKey, label: &[u8], message: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let k = key.size();
    if k < 2 * HASH_LENGTH + 2 {
        return Err(CryptoError::InvalidPublicKey(format!(
            "modulus of {} bytes is too small for OAEP",
            k
        )));
    }
    let max = max_message_length(k);
    if message.len() > max {
        return Err(CryptoError::MessageTooLong {
            max,
            got: message.len(),
        });
    }

    let mut seed = Zeroizing::new([0u8; HASH_LENGTH]);
    fill_random(seed.as_mut_slice())?;
    let em = pad(k, label, message, &seed);

    let mut m = BigUint::from_bytes_be(&em);
    let c = rsa_encrypt(key, &m);
    m.zeroize();
    let c = c.map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
    left_pad(&c.to_bytes_be(), k)
        .map(|padded| padded.to_vec())
        .ok_or_else(|| CryptoError::EncryptionFailed("ciphertext exceeds modulus".to_string()))
}

/// Decrypt an OAEP ciphertext under `label`.
///
/// Every decoding failure (wrong key, wrong label, corrupted ciphertext)
/// yields the same error.
pub fn decrypt(
    key: &RsaPrivateKey,
    label: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let k = key.size();
    if ciphertext.len() != k || k < 2 * HASH_LENGTH + 2 {
        return Err(decoding_error());
    }
    let c = BigUint::from_bytes_be(ciphertext);
    if &c >= key.n() {
        return Err(decoding_error());
    }

    let mut rng = OsRng;
    let mut m = rsa_decrypt_and_check(key, Some(&mut rng), &c).map_err(|_| decoding_error())?;
    let em = left_pad(&Zeroizing::new(m.to_bytes_be()), k);
    m.zeroize();

    let mut em = em.ok_or_else(decoding_error)?;
    unpad(&mut em, label)
}
