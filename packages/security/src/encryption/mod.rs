// ABOUTME: Credential encryption using ChaCha20-Poly1305 AEAD
// ABOUTME: Derives the key from machine ID + application salt via HKDF

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use ring::{
    aead::{self, Nonce, UnboundKey},
    error::Unspecified,
    rand::{SecureRandom, SystemRandom},
};
use std::sync::Arc;

/// Application salt for key derivation (constant, not secret)
const APP_SALT: &[u8] = b"tutor-credential-encryption-v1";

/// Prefix marking values this cipher produced
const CIPHERTEXT_PREFIX: &str = "enc:v1:";

/// Nonce size for ChaCha20-Poly1305
const NONCE_SIZE: usize = 12;

#[derive(Debug, thiserror::Error)]
pub enum EncryptionError {
    #[error("Failed to generate random data: {0}")]
    RandomGeneration(String),

    #[error("Failed to encrypt data: {0}")]
    Encryption(String),

    #[error("Failed to decrypt data: {0}")]
    Decryption(String),

    #[error("Failed to derive encryption key: {0}")]
    KeyDerivation(String),

    #[error("Invalid encrypted data format")]
    InvalidFormat,
}

impl From<Unspecified> for EncryptionError {
    fn from(_: Unspecified) -> Self {
        EncryptionError::Encryption("Cryptographic operation failed".to_string())
    }
}

/// Provider credential encryption service.
///
/// Values written by `encrypt` carry the `enc:v1:` prefix; `decrypt`
/// passes anything without the prefix through untouched, so legacy
/// plaintext rows and the import sentinel survive unchanged.
pub struct CredentialCipher {
    rng: Arc<SystemRandom>,
    encryption_key: Vec<u8>,
}

impl CredentialCipher {
    /// Create new cipher with machine-derived key
    pub fn new() -> Result<Self, EncryptionError> {
        // Machine id when available; hostname keeps containers and CI
        // environments without /etc/machine-id working
        let machine_id = match machine_uid::get() {
            Ok(id) => id,
            Err(_) => hostname::get()
                .ok()
                .and_then(|h| h.into_string().ok())
                .unwrap_or_else(|| "tutor-local".to_string()),
        };

        let mut key_material = Vec::with_capacity(machine_id.len() + APP_SALT.len());
        key_material.extend_from_slice(machine_id.as_bytes());
        key_material.extend_from_slice(APP_SALT);

        // Use HKDF to derive a proper encryption key
        use ring::hkdf;
        let salt = hkdf::Salt::new(hkdf::HKDF_SHA256, b"tutor-encryption-salt");
        let prk = salt.extract(&key_material);

        let mut encryption_key = vec![0u8; 32]; // 256-bit key
        prk.expand(&[b"credential-encryption"], hkdf::HKDF_SHA256)
            .map_err(|_| EncryptionError::KeyDerivation("HKDF expansion failed".to_string()))?
            .fill(&mut encryption_key)
            .map_err(|_| EncryptionError::KeyDerivation("Key fill failed".to_string()))?;

        Ok(Self {
            rng: Arc::new(SystemRandom::new()),
            encryption_key,
        })
    }

    /// Encrypt a credential.
    /// Returns `enc:v1:` + base64(nonce || ciphertext || tag)
    pub fn encrypt(&self, plaintext: &str) -> Result<String, EncryptionError> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        self.rng.fill(&mut nonce_bytes).map_err(|_| {
            EncryptionError::RandomGeneration("Failed to generate nonce".to_string())
        })?;

        let nonce = Nonce::try_assume_unique_for_key(&nonce_bytes)?;

        let unbound_key = UnboundKey::new(&aead::CHACHA20_POLY1305, &self.encryption_key)?;
        let sealing_key = aead::LessSafeKey::new(unbound_key);

        let mut in_out = plaintext.as_bytes().to_vec();
        sealing_key
            .seal_in_place_append_tag(nonce, aead::Aad::empty(), &mut in_out)
            .map_err(|_| EncryptionError::Encryption("Seal operation failed".to_string()))?;

        // Combine nonce + ciphertext+tag
        let mut result = Vec::with_capacity(NONCE_SIZE + in_out.len());
        result.extend_from_slice(&nonce_bytes);
        result.extend_from_slice(&in_out);

        Ok(format!("{}{}", CIPHERTEXT_PREFIX, BASE64.encode(&result)))
    }

    /// Decrypt a credential. Unprefixed values (legacy plaintext, the
    /// import sentinel) are returned as-is.
    pub fn decrypt(&self, stored: &str) -> Result<String, EncryptionError> {
        let Some(encoded) = stored.strip_prefix(CIPHERTEXT_PREFIX) else {
            return Ok(stored.to_string());
        };

        let encrypted_data = BASE64
            .decode(encoded)
            .map_err(|_| EncryptionError::InvalidFormat)?;

        if encrypted_data.len() < NONCE_SIZE + aead::CHACHA20_POLY1305.tag_len() {
            return Err(EncryptionError::InvalidFormat);
        }

        let (nonce_bytes, ciphertext_and_tag) = encrypted_data.split_at(NONCE_SIZE);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)?;

        let unbound_key = UnboundKey::new(&aead::CHACHA20_POLY1305, &self.encryption_key)?;
        let opening_key = aead::LessSafeKey::new(unbound_key);

        let mut in_out = ciphertext_and_tag.to_vec();
        let plaintext = opening_key
            .open_in_place(nonce, aead::Aad::empty(), &mut in_out)
            .map_err(|_| EncryptionError::Decryption("Open operation failed".to_string()))?;

        String::from_utf8(plaintext.to_vec())
            .map_err(|_| EncryptionError::Decryption("Invalid UTF-8 in decrypted data".to_string()))
    }

    /// Check if a value was produced by this cipher
    pub fn is_encrypted(value: &str) -> bool {
        value.starts_with(CIPHERTEXT_PREFIX)
    }
}
