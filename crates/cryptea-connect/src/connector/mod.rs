/*
[INPUT]:  Wallet provider capabilities and registry configuration
[OUTPUT]: Uniform connector interface over heterogeneous signing backends
[POS]:    Connector layer - the capability seam every wallet plugs into
[UPDATE]: When the capability surface or provider set changes
*/

use std::sync::RwLock;

use async_trait::async_trait;

use crate::http::{CrypteaError, Result};

pub mod extension;
pub mod hardware;
pub mod keys;
pub mod mail;
pub mod registry;
pub mod relay;
pub mod ud;

pub use extension::ExtensionConnector;
pub use hardware::HardwareConnector;
pub use keys::{Ed25519Signer, KeyStore};
pub use mail::MailLinkConnector;
pub use registry::{ConnectorDescriptor, ConnectorGroup, ConnectorRegistry, RegistryConfig};
pub use relay::{RelayApprover, RelayConnector, RelayRequest};
pub use ud::UdConnector;

/// Capability interface every wallet provider must implement.
///
/// The trait is async because signing may suspend indefinitely on user
/// interaction (hardware wallets, mobile relays); callers cancel an
/// attempt by dropping the future.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Stable provider identifier used by the registry
    fn id(&self) -> &str;

    /// Request account access and return the connected address
    async fn connect(&self) -> Result<String>;

    /// Currently connected address, if any
    fn account(&self) -> Option<String>;

    /// Sign a challenge message with the connected account
    async fn sign_message(&self, message: &str) -> Result<String>;

    /// Drop the connection and clear the account
    async fn disconnect(&self) -> Result<()>;
}

/// Mechanical conformance check for connector implementations.
///
/// Exercises the full capability surface so a new provider can be
/// validated before it is added to the registry.
pub mod conformance {
    use super::Connector;
    use crate::http::{CrypteaError, Result};

    pub async fn exercise(connector: &dyn Connector) -> Result<()> {
        let address = connector.connect().await?;
        if address.is_empty() {
            return Err(CrypteaError::Config(format!(
                "connector `{}` returned an empty address",
                connector.id()
            )));
        }

        if connector.account().as_deref() != Some(address.as_str()) {
            return Err(CrypteaError::Config(format!(
                "connector `{}` does not report its connected account",
                connector.id()
            )));
        }

        let signature = connector.sign_message("capability check").await?;
        if signature.is_empty() {
            return Err(CrypteaError::Config(format!(
                "connector `{}` produced an empty signature",
                connector.id()
            )));
        }

        connector.disconnect().await?;
        if connector.account().is_some() {
            return Err(CrypteaError::Config(format!(
                "connector `{}` kept its account after disconnect",
                connector.id()
            )));
        }

        Ok(())
    }
}

/// Mock connector for tests: predetermined address and signature, with
/// scriptable failure and empty-signature modes.
#[derive(Debug)]
pub struct MockConnector {
    id: String,
    address: String,
    signature: String,
    fail_signing: bool,
    account: RwLock<Option<String>>,
}

impl MockConnector {
    pub fn new(id: &str, address: &str, signature: &str) -> Self {
        Self {
            id: id.to_string(),
            address: address.to_string(),
            signature: signature.to_string(),
            fail_signing: false,
            account: RwLock::new(None),
        }
    }

    /// Mock that errors on every signing request, like a user rejection
    pub fn rejecting(id: &str, address: &str) -> Self {
        Self {
            fail_signing: true,
            ..Self::new(id, address, "")
        }
    }
}

#[async_trait]
impl Connector for MockConnector {
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

    async fn sign_message(&self, _message: &str) -> Result<String> {
        if self.fail_signing {
            return Err(CrypteaError::SigningFailed(
                "user rejected the request".to_string(),
            ));
        }
        Ok(self.signature.clone())
    }

    async fn disconnect(&self) -> Result<()> {
        *self.account.write().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_connector_conformance() {
        let connector = MockConnector::new("mock", "0xabc", "0xsig");
        conformance::exercise(&connector).await.unwrap();
    }

    #[tokio::test]
    async fn test_mock_connector_rejection() {
        let connector = MockConnector::rejecting("mock", "0xabc");
        connector.connect().await.unwrap();

        let err = connector.sign_message("challenge").await.unwrap_err();
        assert!(matches!(err, CrypteaError::SigningFailed(_)));
    }

    #[tokio::test]
    async fn test_empty_signature_fails_conformance() {
        let connector = MockConnector::new("mock", "0xabc", "");
        let err = conformance::exercise(&connector).await.unwrap_err();
        assert!(matches!(err, CrypteaError::Config(_)));
    }
}
