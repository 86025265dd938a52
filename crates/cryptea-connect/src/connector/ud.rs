/*
[INPUT]:  A resolved identity domain and an inner signing connector
[OUTPUT]: The inner connector's capability surface under a domain label
[POS]:    Connector layer - decentralized-identity wallet
[UPDATE]: When domain resolution or the wrapped surface changes
*/

use std::sync::Arc;

use async_trait::async_trait;

use crate::connector::Connector;
use crate::http::Result;

/// Decentralized-identity login. Wraps whichever connector actually
/// controls the address the domain resolves to; the full capability
/// surface is preserved so the rest of the flow cannot tell the
/// difference.
pub struct UdConnector {
    domain: String,
    inner: Arc<dyn Connector>,
}

impl UdConnector {
    pub fn new(domain: &str, inner: Arc<dyn Connector>) -> Self {
        Self {
            domain: domain.to_string(),
            inner,
        }
    }

    /// The identity domain this login was initiated with
    pub fn domain(&self) -> &str {
        &self.domain
    }
}

#[async_trait]
impl Connector for UdConnector {
    fn id(&self) -> &str {
        "unstoppable"
    }

    async fn connect(&self) -> Result<String> {
        self.inner.connect().await
    }

    fn account(&self) -> Option<String> {
        self.inner.account()
    }

    async fn sign_message(&self, message: &str) -> Result<String> {
        self.inner.sign_message(message).await
    }

    async fn disconnect(&self) -> Result<()> {
        self.inner.disconnect().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::{conformance, MockConnector};

    #[tokio::test]
    async fn test_ud_preserves_capability_surface() {
        let inner = Arc::new(MockConnector::new("metamask", "0xabc", "0xsig"));
        let connector = UdConnector::new("ada.crypto", inner);

        assert_eq!(connector.id(), "unstoppable");
        assert_eq!(connector.domain(), "ada.crypto");
        conformance::exercise(&connector).await.unwrap();
    }
}
