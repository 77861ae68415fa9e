/// AES-GCM nonce length in bytes (96 bits per NIST recommendation).
pub const AES_GCM_NONCE_LENGTH: usize = 12;

/// AES-GCM tag length in bytes (128 bits).
pub const AES_GCM_TAG_LENGTH: usize = 16;

/// AES-128 key length in bytes.
pub const AES_128_KEY_LENGTH: usize = 16;

/// Number of 32-bit words in an expanded AES-128 key schedule (11 round keys).
pub const KEY_SCHEDULE_WORDS: usize = 44;

/// Expanded AES-128 key schedule length in bytes.
pub const KEY_SCHEDULE_LENGTH: usize = KEY_SCHEDULE_WORDS * 4;

/// SHA-256 digest length in bytes.
pub const SHA256_DIGEST_LENGTH: usize = 32;
