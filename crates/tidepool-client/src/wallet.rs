//! Wallet glue: Ed25519 keypairs, address derivation, and encrypted key
//! storage. The secret key only ever touches disk under age passphrase
//! encryption; unlocking verifies the derived address against the stored one
//! before the key is handed to the submitter.

use age::secrecy::Secret;
use base64::Engine as _;
use ed25519_dalek::{Signer as _, SigningKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    Io(String),
    Malformed(String),
    InvalidPassword,
    Crypto(String),
    /// Decrypted key does not derive the address stored in the wallet file.
    AddressMismatch,
}

impl std::fmt::Display for WalletError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalletError::Io(msg) => write!(f, "wallet file I/O failed: {}", msg),
            WalletError::Malformed(msg) => write!(f, "wallet file is malformed: {}", msg),
            WalletError::InvalidPassword => write!(f, "invalid password"),
            WalletError::Crypto(msg) => write!(f, "key handling failed: {}", msg),
            WalletError::AddressMismatch => {
                write!(f, "decrypted key does not match the wallet address")
            }
        }
    }
}

impl std::error::Error for WalletError {}

/// Derive the 20-byte hex address from an Ed25519 public key:
/// `0x` + last 20 bytes of Keccak-256(public key).
pub fn public_key_to_address(public_key: &[u8]) -> String {
    let digest = Keccak256::digest(public_key);
    format!("0x{}", hex::encode(&digest[12..]))
}

/// `0x`-prefixed, exactly 40 hex digits.
pub fn validate_address(address: &str) -> bool {
    address.len() == 42
        && address.starts_with("0x")
        && address.as_bytes()[2..].iter().all(|b| b.is_ascii_hexdigit())
}

/// Signing keypair plus its derived address.
#[derive(Debug)]
pub struct KeyPair {
    signing_key: SigningKey,
    address: String,
}

impl KeyPair {
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        let address = public_key_to_address(&signing_key.verifying_key().to_bytes());
        KeyPair {
            signing_key,
            address,
        }
    }

    pub fn from_secret_bytes(secret: &[u8]) -> Result<Self, WalletError> {
        let bytes: [u8; 32] = secret
            .try_into()
            .map_err(|_| WalletError::Crypto(format!("secret key has invalid length {}", secret.len())))?;
        let signing_key = SigningKey::from_bytes(&bytes);
        let address = public_key_to_address(&signing_key.verifying_key().to_bytes());
        Ok(KeyPair {
            signing_key,
            address,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(self.signing_key.verifying_key().to_bytes())
    }

    pub fn secret_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    /// Hex-encoded Ed25519 signature over `message`.
    pub fn sign_hex(&self, message: &[u8]) -> String {
        hex::encode(self.signing_key.sign(message).to_bytes())
    }
}

/// Encrypt a secret key with an age passphrase.
pub fn encrypt_secret_key(secret: &[u8], password: &str) -> Result<Vec<u8>, WalletError> {
    let encryptor = age::Encryptor::with_user_passphrase(Secret::new(password.to_owned()));
    let mut ciphertext = Vec::new();
    let mut writer = encryptor
        .wrap_output(&mut ciphertext)
        .map_err(|e| WalletError::Crypto(e.to_string()))?;
    writer
        .write_all(secret)
        .map_err(|e| WalletError::Crypto(e.to_string()))?;
    writer
        .finish()
        .map_err(|e| WalletError::Crypto(e.to_string()))?;
    Ok(ciphertext)
}

/// Decrypt an age-encrypted secret key. A wrong passphrase surfaces as
/// `InvalidPassword`, anything else as `Crypto`.
pub fn decrypt_secret_key(data: &[u8], password: &str) -> Result<Vec<u8>, WalletError> {
    let decryptor = match age::Decryptor::new(data) {
        Ok(age::Decryptor::Passphrase(d)) => d,
        Ok(_) => {
            return Err(WalletError::Crypto(
                "wallet key is not passphrase-encrypted".to_string(),
            ))
        }
        Err(e) => return Err(WalletError::Crypto(e.to_string())),
    };

    let mut reader = decryptor
        .decrypt(&Secret::new(password.to_owned()), None)
        .map_err(|e| match e {
            age::DecryptError::DecryptionFailed => WalletError::InvalidPassword,
            other => WalletError::Crypto(other.to_string()),
        })?;
    let mut secret = Vec::new();
    reader
        .read_to_end(&mut secret)
        .map_err(|e| WalletError::Crypto(e.to_string()))?;
    Ok(secret)
}

/// On-disk wallet: public metadata plus the age-encrypted secret key.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WalletFile {
    pub name: String,
    pub address: String,
    /// Ed25519 public key (hex-encoded)
    pub public_key: String,
    /// age ciphertext of the secret key (base64-encoded)
    pub encrypted_secret: String,
    pub created_at: u64,
}

impl WalletFile {
    pub fn create(name: &str, keypair: &KeyPair, password: &str) -> Result<Self, WalletError> {
        let ciphertext = encrypt_secret_key(&keypair.secret_bytes(), password)?;
        let created_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Ok(WalletFile {
            name: name.to_string(),
            address: keypair.address().to_string(),
            public_key: keypair.public_key_hex(),
            encrypted_secret: base64::engine::general_purpose::STANDARD.encode(ciphertext),
            created_at,
        })
    }

    pub fn load(path: &Path) -> Result<Self, WalletError> {
        let data = std::fs::read_to_string(path).map_err(|e| WalletError::Io(e.to_string()))?;
        serde_json::from_str(&data).map_err(|e| WalletError::Malformed(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<(), WalletError> {
        let data =
            serde_json::to_string_pretty(self).map_err(|e| WalletError::Malformed(e.to_string()))?;
        std::fs::write(path, data).map_err(|e| WalletError::Io(e.to_string()))
    }

    /// Decrypt the secret key and verify it still derives the stored address.
    pub fn unlock(&self, password: &str) -> Result<KeyPair, WalletError> {
        let secret = decrypt_secret_key(
            &base64::engine::general_purpose::STANDARD
                .decode(&self.encrypted_secret)
                .map_err(|e| WalletError::Malformed(e.to_string()))?,
            password,
        )?;
        let keypair = KeyPair::from_secret_bytes(&secret)?;
        if keypair.address() != self.address {
            return Err(WalletError::AddressMismatch);
        }
        Ok(keypair)
    }
}

// ─────────────────────────────────────────────────────────────────
// UNIT TESTS
// ─────────────────────────────────────────────────────────────────
