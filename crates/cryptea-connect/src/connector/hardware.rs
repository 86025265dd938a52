/*
[INPUT]:  Key storage directory and a device label
[OUTPUT]: Base64 Ed25519 signatures from a disk-persisted key
[POS]:    Connector layer - hardware wallet class (ledger)
[UPDATE]: When key persistence or the signature encoding changes
*/

use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::connector::keys::KeyStore;
use crate::connector::Connector;
use crate::http::{CrypteaError, Result};

/// Connector for hardware-class wallets. The device key persists on
/// disk under its label, so the same address comes back across runs.
pub struct HardwareConnector {
    id: String,
    label: String,
    keys: KeyStore,
    account: RwLock<Option<String>>,
}

impl HardwareConnector {
    pub fn new(id: &str, key_dir: impl AsRef<Path>, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            keys: KeyStore::new(key_dir),
            account: RwLock::new(None),
        }
    }
}

#[async_trait]
impl Connector for HardwareConnector {
    fn id(&self) -> &str {
        &self.id
    }

    async fn connect(&self) -> Result<String> {
        let signer = self.keys.get_or_create_signer(&self.label)?;
        let address = signer.public_key_base58();
        *self.account.write().unwrap() = Some(address.clone());
        Ok(address)
    }

    fn account(&self) -> Option<String> {
        self.account.read().unwrap().clone()
    }

    async fn sign_message(&self, message: &str) -> Result<String> {
        if self.account().is_none() {
            return Err(CrypteaError::SigningFailed(
                "no account connected".to_string(),
            ));
        }

        let signer = self.keys.load_signer(&self.label).ok_or_else(|| {
            CrypteaError::SigningFailed(format!("device key for `{}` is gone", self.label))
        })?;

        Ok(signer.sign_base64(message))
    }

    async fn disconnect(&self) -> Result<()> {
        *self.account.write().unwrap() = None;
        Ok(())
    }
}
