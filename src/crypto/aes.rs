use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use aes_gcm::aead::rand_core::RngCore;
use base64::{Engine as _, engine::general_purpose};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};
use crate::error::{AppError, Result};

/// The size of the AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;
/// The size of the AES-GCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;

/// A secure key wrapper that ensures the key is zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecureKey([u8; KEY_SIZE]);

impl SecureKey {
    /// Creates a new `SecureKey` from a byte array.
    ///
    /// # Arguments
    ///
    /// * `key` - A 32-byte array representing the AES-256 key.
    pub fn new(key: [u8; KEY_SIZE]) -> Self {
        Self(key)
    }

    /// Derives a key from a configuration-supplied passphrase (SHA-256).
    ///
    /// # Arguments
    ///
    /// * `secret` - The shared secret.
    pub fn from_secret(secret: &str) -> Self {
        let digest = Sha256::digest(secret.as_bytes());
        let mut key = [0u8; KEY_SIZE];
        key.copy_from_slice(&digest);
        Self(key)
    }

    /// Returns a reference to the key as a byte slice.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

/// Generates a new random AES-GCM nonce.
///
/// # Returns
///
/// A 12-byte array representing the nonce.
pub fn generate_nonce() -> [u8; NONCE_SIZE] {
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Encrypts a plaintext using AES-256-GCM.
///
/// # Arguments
///
/// * `key` - The AES-256 key.
/// * `plaintext` - The data to encrypt.
///
/// # Returns
///
/// A tuple containing the ciphertext and the nonce used for encryption.
pub fn encrypt(key: &SecureKey, plaintext: &[u8]) -> Result<(Vec<u8>, [u8; NONCE_SIZE])> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let nonce_bytes = generate_nonce();
    let nonce = Nonce::from(nonce_bytes);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| AppError::Encryption(format!("Encryption failed: {}", e)))?;

    Ok((ciphertext, nonce_bytes))
}

/// Decrypts a ciphertext using AES-256-GCM.
///
/// # Arguments
///
/// * `key` - The AES-256 key.
/// * `ciphertext` - The data to decrypt.
/// * `nonce` - The nonce used for encryption.
///
/// # Returns
///
/// The decrypted plaintext.
pub fn decrypt(key: &SecureKey, ciphertext: &[u8], nonce: &[u8; NONCE_SIZE]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());
    let nonce = Nonce::from(*nonce);

    cipher
        .decrypt(&nonce, ciphertext)
        .map_err(|e| AppError::Encryption(format!("Decryption failed: {}", e)))
}

/// Encrypts `plaintext` into an opaque storage string.
///
/// Format: base64(`nonce || ciphertext`), standard alphabet.
pub fn seal(key: &SecureKey, plaintext: &[u8]) -> Result<String> {
    let (ciphertext, nonce) = encrypt(key, plaintext)?;

    let mut blob = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&ciphertext);

    Ok(general_purpose::STANDARD.encode(blob))
}

/// Reverses [`seal`]. Fails on bad base64, truncated input or a tag mismatch.
pub fn open(key: &SecureKey, sealed: &str) -> Result<Vec<u8>> {
    let blob = general_purpose::STANDARD
        .decode(sealed.trim())
        .map_err(|e| AppError::Encryption(format!("Invalid sealed payload: {}", e)))?;

    if blob.len() <= NONCE_SIZE {
        return Err(AppError::Encryption("Sealed payload too short".to_string()));
    }

    let (nonce_bytes, ciphertext) = blob.split_at(NONCE_SIZE);
    let mut nonce = [0u8; NONCE_SIZE];
    nonce.copy_from_slice(nonce_bytes);

    decrypt(key, ciphertext, &nonce)
}
