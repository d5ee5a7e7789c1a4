//! Symmetric encryption of opaque identifiers into state tokens.
//!
//! The AES-GCM key is derived from the shared secret salted with a UTC calendar
//! date (`<secret>-YYYY-MM-DD`, MD5, lowercase hex). Keys therefore rotate at
//! midnight UTC: a token issued at 23:59 UTC no longer decrypts at 00:00 UTC,
//! whatever validity window [`StateService`] applies on top.
//!
//! Tokens are `base64(nonce || ciphertext || tag)` using the standard, padded
//! alphabet. Callers placing them in a URL must percent-encode them.

pub mod error;
pub mod replay;
pub mod service;

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{NaiveDate, Utc};
use rand::Rng;

pub use error::StateError;
pub use replay::ReplayCache;
pub use service::{StateClaims, StateService};

const NONCE_SIZE: usize = 12;

/// Encrypts `identifier` under today's (UTC) key.
pub fn encrypt(identifier: &str, secret: &str) -> Result<String, StateError> {
    encrypt_on(identifier, secret, Utc::now().date_naive())
}

/// Decrypts `token` with today's (UTC) key.
pub fn decrypt(token: &str, secret: &str) -> Result<String, StateError> {
    decrypt_on(token, secret, Utc::now().date_naive())
}

pub fn encrypt_on(identifier: &str, secret: &str, date: NaiveDate) -> Result<String, StateError> {
    let cipher = cipher_for(secret, date)?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill(&mut nonce_bytes);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), identifier.as_bytes())
        .map_err(|_| StateError::Encryption)?;

    let mut combined = nonce_bytes.to_vec();
    combined.extend(ciphertext);
    Ok(BASE64.encode(combined))
}

pub fn decrypt_on(token: &str, secret: &str, date: NaiveDate) -> Result<String, StateError> {
    let combined = BASE64.decode(token)?;
    if combined.len() < NONCE_SIZE {
        return Err(StateError::TooShort);
    }

    let (nonce, ciphertext) = combined.split_at(NONCE_SIZE);
    let cipher = cipher_for(secret, date)?;
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| StateError::Decryption)?;

    String::from_utf8(plaintext).map_err(|_| StateError::Decryption)
}

fn derive_key(secret: &str, date: NaiveDate) -> String {
    let salted = format!("{}-{}", secret, date.format("%Y-%m-%d"));
    format!("{:x}", md5::compute(salted.as_bytes()))
}

fn cipher_for(secret: &str, date: NaiveDate) -> Result<Aes256Gcm, StateError> {
    Aes256Gcm::new_from_slice(derive_key(secret, date).as_bytes()).map_err(|_| StateError::InvalidKey)
}
