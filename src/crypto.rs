//! Cryptographic utilities: random tokens, SHA-256, URL-safe base64,
//! constant-time comparison, and password hashing.
//!
//! Every encoded comparison decodes both operands first and compares the raw
//! bytes in constant time.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::CryptoError;

const TOKEN_BYTES: usize = 32;
const SALT_BYTES: usize = 16;
const SHA256_BYTES: usize = 32;

/// `n` cryptographically random bytes from the OS source.
pub fn random_bytes(n: usize) -> Result<Vec<u8>, CryptoError> {
    let mut bytes = vec![0u8; n];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|_| CryptoError::CryptoUnavailable)?;
    Ok(bytes)
}

/// URL-safe base64 of 32 random bytes. Used for session ids, selectors,
/// tokens, and verification codes.
pub fn random_string() -> Result<String, CryptoError> {
    Ok(encode(&random_bytes(TOKEN_BYTES)?))
}

/// SHA-256 digest.
pub fn hash(bytes: &[u8]) -> [u8; SHA256_BYTES] {
    Sha256::digest(bytes).into()
}

/// URL-safe base64 with standard padding.
pub fn encode(bytes: &[u8]) -> String {
    URL_SAFE.encode(bytes)
}

pub fn decode(value: &str) -> Result<Vec<u8>, CryptoError> {
    URL_SAFE.decode(value).map_err(|_| CryptoError::DecodeFailed)
}

/// Constant-time byte comparison. A length mismatch is false; equal-length
/// inputs are compared without short-circuiting on the first difference.
pub fn constant_time_equals(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b) {
        diff |= x ^ y;
    }
    diff == 0
}

/// `(selector, token, token_hash)` for a new remember-me record. Selector and
/// token are independent 32-byte randoms; only the token's hash is ever
/// stored.
pub fn generate_selector_token_and_hash() -> Result<(String, String, String), CryptoError> {
    let selector = random_string()?;
    let (token, token_hash) = generate_string_and_hash()?;
    Ok((selector, token, token_hash))
}

/// A random secret and the encoded SHA-256 of its raw bytes.
pub fn generate_string_and_hash() -> Result<(String, String), CryptoError> {
    let bytes = random_bytes(TOKEN_BYTES)?;
    Ok((encode(&bytes), encode(&hash(&bytes))))
}

/// Decode both operands, re-hash the secret, and compare in constant time.
pub fn encoded_hash_equals(token: &str, token_hash: &str) -> bool {
    let (Ok(token_bytes), Ok(hash_bytes)) = (decode(token), decode(token_hash)) else {
        return false;
    };
    constant_time_equals(&hash(&token_bytes), &hash_bytes)
}

/// Hash a password into an opaque URL-safe provider key.
///
/// New keys encode an Argon2id PHC string. Legacy keys are the bare encoded
/// SHA-256 digest; [`verify_password`] accepts both so stored credentials
/// migrate without rewrite.
pub fn hash_password(password: &str) -> Result<String, CryptoError> {
    let salt =
        SaltString::encode_b64(&random_bytes(SALT_BYTES)?).map_err(|_| CryptoError::HashFailed)?;
    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| CryptoError::HashFailed)?
        .to_string();
    Ok(encode(phc.as_bytes()))
}

/// Verify a password against a stored provider key, either form.
pub fn verify_password(password: &str, provider_key: &str) -> bool {
    let Ok(stored) = decode(provider_key) else {
        return false;
    };
    if stored.len() == SHA256_BYTES {
        return constant_time_equals(&hash(password.as_bytes()), &stored);
    }
    let Ok(phc) = std::str::from_utf8(&stored) else {
        return false;
    };
    let Ok(parsed) = PasswordHash::new(phc) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
