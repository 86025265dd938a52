/*
[INPUT]:  Key labels and a key storage directory
[OUTPUT]: Ed25519 signers, freshly generated or loaded from disk
[POS]:    Connector layer - key material for the pseudo-wallet connectors
[UPDATE]: When key storage format or file naming conventions change
*/

use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ed25519_dalek::{Signature, Signer, SigningKey};
use rand::rngs::OsRng;

/// Ed25519 signer backing the hardware and email-link connectors
#[derive(Debug)]
pub struct Ed25519Signer {
    signing_key: SigningKey,
}

impl Ed25519Signer {
    /// Generate a new random keypair
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Create a signer from existing secret key bytes (32 bytes)
    pub fn from_secret_key(bytes: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(bytes),
        }
    }

    /// Sign a message, returning the raw signature
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }

    /// Sign a message and return the signature base64-encoded, the wire
    /// format the pseudo-wallet connectors hand to the auth flow
    pub fn sign_base64(&self, message: &str) -> String {
        STANDARD.encode(self.sign(message.as_bytes()).to_bytes())
    }

    /// Public key in base58, doubling as the pseudo-wallet address
    pub fn public_key_base58(&self) -> String {
        bs58::encode(self.signing_key.verifying_key().as_bytes()).into_string()
    }

    /// Raw secret key bytes
    pub fn secret_key_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }
}

/// On-disk store for per-label Ed25519 keys, one file per label with
/// owner-only permissions.
#[derive(Debug, Clone)]
pub struct KeyStore {
    key_dir: PathBuf,
}

impl KeyStore {
    pub fn new(key_dir: impl AsRef<Path>) -> Self {
        Self {
            key_dir: key_dir.as_ref().to_path_buf(),
        }
    }

    /// Load the key for a label, or generate and persist a new one
    pub fn get_or_create_signer(&self, label: &str) -> io::Result<Ed25519Signer> {
        if let Some(signer) = self.load_signer(label) {
            Ok(signer)
        } else {
            let signer = Ed25519Signer::generate();
            self.save_signer(label, &signer)?;
            Ok(signer)
        }
    }

    /// Load a signer from disk for the given label
    pub fn load_signer(&self, label: &str) -> Option<Ed25519Signer> {
        let content = fs::read_to_string(self.key_file_path(label)).ok()?;
        let bytes = STANDARD.decode(content.trim()).ok()?;

        let key_bytes: [u8; 32] = bytes.try_into().ok()?;
        Some(Ed25519Signer::from_secret_key(&key_bytes))
    }

    /// Persist a signer for the given label with 0600 permissions
    pub fn save_signer(&self, label: &str, signer: &Ed25519Signer) -> io::Result<()> {
        if !self.key_dir.exists() {
            fs::create_dir_all(&self.key_dir)?;
        }

        let path = self.key_file_path(label);
        fs::write(&path, STANDARD.encode(signer.secret_key_bytes()))?;

        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;

        Ok(())
    }

    fn key_file_path(&self, label: &str) -> PathBuf {
        self.key_dir.join(format!("{label}.ed25519"))
    }
}
