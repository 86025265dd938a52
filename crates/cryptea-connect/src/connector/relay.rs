/*
[INPUT]:  Connect/sign requests from the auth flow
[OUTPUT]: Signatures resolved by a remote approver over channels
[POS]:    Connector layer - mobile wallet via relay (walletconnect class)
[UPDATE]: When the relay handshake or approval protocol changes
*/

use std::sync::RwLock;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::connector::Connector;
use crate::http::{CrypteaError, Result};

/// A request forwarded to the approver side of the relay.
///
/// The approver answers through the embedded channel; `Err` carries the
/// user's rejection reason. Dropping the sender resolves the waiting
/// connector with a relay error.
#[derive(Debug)]
pub enum RelayRequest {
    Connect {
        respond: oneshot::Sender<std::result::Result<String, String>>,
    },
    Sign {
        message: String,
        respond: oneshot::Sender<std::result::Result<String, String>>,
    },
}

/// Driver for the wallet side of the relay, typically held by whatever
/// bridges to the mobile wallet session.
#[derive(Debug)]
pub struct RelayApprover {
    requests: mpsc::UnboundedReceiver<RelayRequest>,
}

impl RelayApprover {
    /// Next pending request, or `None` once the connector is dropped
    pub async fn next_request(&mut self) -> Option<RelayRequest> {
        self.requests.recv().await
    }
}

/// Connector whose account access and signing are approved out of
/// process. Requests suspend until the approver answers; the caller can
/// cancel by dropping the future, and a closed relay resolves every
/// pending request with an error instead of hanging.
pub struct RelayConnector {
    id: String,
    requests: mpsc::UnboundedSender<RelayRequest>,
    account: RwLock<Option<String>>,
}

impl RelayConnector {
    /// Create a connector and the approver driving its wallet side
    pub fn pair(id: &str) -> (Self, RelayApprover) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                id: id.to_string(),
                requests: tx,
                account: RwLock::new(None),
            },
            RelayApprover { requests: rx },
        )
    }

    async fn roundtrip(
        &self,
        request: RelayRequest,
        respond: oneshot::Receiver<std::result::Result<String, String>>,
    ) -> Result<String> {
        self.requests
            .send(request)
            .map_err(|_| CrypteaError::Relay("wallet relay is closed".to_string()))?;

        match respond.await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(reason)) => Err(CrypteaError::Relay(reason)),
            Err(_) => Err(CrypteaError::Relay(
                "wallet relay dropped the request".to_string(),
            )),
        }
    }
}

#[async_trait]
impl Connector for RelayConnector {
    fn id(&self) -> &str {
        &self.id
    }

    async fn connect(&self) -> Result<String> {
        let (tx, rx) = oneshot::channel();
        let address = self
            .roundtrip(RelayRequest::Connect { respond: tx }, rx)
            .await?;

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

        let (tx, rx) = oneshot::channel();
        self.roundtrip(
            RelayRequest::Sign {
                message: message.to_string(),
                respond: tx,
            },
            rx,
        )
        .await
    }

    async fn disconnect(&self) -> Result<()> {
        *self.account.write().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Approver loop that connects one address and signs everything
    fn approve_all(mut approver: RelayApprover, address: &'static str, signature: &'static str) {
        tokio::spawn(async move {
            while let Some(request) = approver.next_request().await {
                match request {
                    RelayRequest::Connect { respond } => {
                        let _ = respond.send(Ok(address.to_string()));
                    }
                    RelayRequest::Sign { respond, .. } => {
                        let _ = respond.send(Ok(signature.to_string()));
                    }
                }
            }
        });
    }

    #[tokio::test]
    async fn test_relay_approval_flow() {
        let (connector, approver) = RelayConnector::pair("walletconnect");
        approve_all(approver, "0xrelay", "0xsig");

        assert_eq!(connector.connect().await.unwrap(), "0xrelay");
        assert_eq!(connector.account().as_deref(), Some("0xrelay"));
        assert_eq!(connector.sign_message("hello").await.unwrap(), "0xsig");
    }

    #[tokio::test]
    async fn test_relay_rejection_resolves_with_error() {
        let (connector, mut approver) = RelayConnector::pair("walletconnect");
        tokio::spawn(async move {
            while let Some(request) = approver.next_request().await {
                match request {
                    RelayRequest::Connect { respond } => {
                        let _ = respond.send(Ok("0xrelay".to_string()));
                    }
                    RelayRequest::Sign { respond, .. } => {
                        let _ = respond.send(Err("user rejected".to_string()));
                    }
                }
            }
        });

        connector.connect().await.unwrap();
        let err = connector.sign_message("hello").await.unwrap_err();
        match err {
            CrypteaError::Relay(reason) => assert_eq!(reason, "user rejected"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_closed_relay_fails_instead_of_hanging() {
        let (connector, approver) = RelayConnector::pair("walletconnect");
        drop(approver);

        let err = connector.connect().await.unwrap_err();
        assert!(matches!(err, CrypteaError::Relay(_)));
    }

    #[tokio::test]
    async fn test_dropped_request_resolves_with_error() {
        let (connector, mut approver) = RelayConnector::pair("walletconnect");
        tokio::spawn(async move {
            while let Some(request) = approver.next_request().await {
                match request {
                    RelayRequest::Connect { respond } => {
                        let _ = respond.send(Ok("0xrelay".to_string()));
                    }
                    // Drop the responder without answering
                    RelayRequest::Sign { .. } => {}
                }
            }
        });

        connector.connect().await.unwrap();
        let err = connector.sign_message("hello").await.unwrap_err();
        assert!(matches!(err, CrypteaError::Relay(_)));
    }

    #[tokio::test]
    async fn test_relay_conformance() {
        let (connector, approver) = RelayConnector::pair("walletconnect");
        approve_all(approver, "0xrelay", "0xsig");
        crate::connector::conformance::exercise(&connector)
            .await
            .unwrap();
    }
}
