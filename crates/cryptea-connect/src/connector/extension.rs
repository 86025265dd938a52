/*
[INPUT]:  EVM private key (hex string) and a provider id
[OUTPUT]: EIP-191 personal-sign signatures and a checksummed address
[POS]:    Connector layer - browser-extension wallet class
[UPDATE]: When signing logic or EVM address formatting changes
*/

use std::str::FromStr;
use std::sync::RwLock;

use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;

use crate::connector::Connector;
use crate::http::{CrypteaError, Result};

/// Connector for extension-class wallets (metamask, coinbase, brave,
/// and other injected providers) backed by an in-process EVM key.
pub struct ExtensionConnector {
    id: String,
    signer: PrivateKeySigner,
    address: String,
    account: RwLock<Option<String>>,
}

impl ExtensionConnector {
    /// Create a connector from a hex-encoded private key.
    ///
    /// Supports both "0x"-prefixed and bare hex strings.
    pub fn new(id: &str, private_key_hex: &str) -> Result<Self> {
        let key = private_key_hex
            .strip_prefix("0x")
            .unwrap_or(private_key_hex);
        let signer = PrivateKeySigner::from_str(key)
            .map_err(|e| CrypteaError::Config(format!("Invalid EVM private key: {e}")))?;

        let address = signer.address().to_checksum(None);

        Ok(Self {
            id: id.to_string(),
            signer,
            address,
            account: RwLock::new(None),
        })
    }
}

#[async_trait]
impl Connector for ExtensionConnector {
    fn id(&self) -> &str {
        &self.id
    }

    async fn connect(&self) -> Result<String> {
        *self.account.write().unwrap() = Some(self.address.clone());
        Ok(self.address.clone())
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

        let signature = self
            .signer
            .sign_message(message.as_bytes())
            .await
            .map_err(|e| CrypteaError::SigningFailed(format!("EVM signing failed: {e}")))?;

        // [r, s, v], hex with 0x prefix
        Ok(format!("0x{}", hex::encode(signature.as_bytes())))
    }

    async fn disconnect(&self) -> Result<()> {
        *self.account.write().unwrap() = None;
        Ok(())
    }
}
