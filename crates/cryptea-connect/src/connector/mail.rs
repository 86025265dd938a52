/*
[INPUT]:  Challenge messages from the auth flow
[OUTPUT]: Base64 Ed25519 signatures under a per-session key
[POS]:    Connector layer - email-link pseudo-wallet
[UPDATE]: When the email login handshake changes
*/

use std::sync::RwLock;

use async_trait::async_trait;

use crate::connector::keys::Ed25519Signer;
use crate::connector::Connector;
use crate::http::{CrypteaError, Result};

/// Pseudo-wallet backing the email-link login. It carries no real chain
/// account; a fresh session key stands in for one, and its base58
/// public key doubles as the address the backend ties the email to.
pub struct MailLinkConnector {
    signer: Ed25519Signer,
    address: String,
    account: RwLock<Option<String>>,
}

impl MailLinkConnector {
    pub fn new() -> Self {
        let signer = Ed25519Signer::generate();
        let address = signer.public_key_base58();
        Self {
            signer,
            address,
            account: RwLock::new(None),
        }
    }
}

impl Default for MailLinkConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for MailLinkConnector {
    fn id(&self) -> &str {
        "mail"
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
        Ok(self.signer.sign_base64(message))
    }

    async fn disconnect(&self) -> Result<()> {
        *self.account.write().unwrap() = None;
        Ok(())
    }
}
