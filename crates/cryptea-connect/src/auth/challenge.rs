/*
[INPUT]:  A connector, the connection state, and the challenge message
[OUTPUT]: A signed challenge, a skip, or a normalized signing failure
[POS]:    Auth layer - drives one signature attempt
[UPDATE]: When the challenge format or skip conditions change
*/

use std::sync::RwLock;

use tracing::warn;

use crate::connector::Connector;
use crate::http::{CrypteaError, Result};

/// Default challenge message
pub const DEFAULT_CHALLENGE: &str = "Welcome to Cryptea";

/// What the caller knows about the wallet connection when asking for a
/// signature.
#[derive(Debug, Clone, Default)]
pub struct ConnectionState {
    /// Connected address, if account access was already granted
    pub address: Option<String>,
    /// Set when the caller is already authenticated and signing should
    /// be skipped entirely
    pub already_authenticated: bool,
}

impl ConnectionState {
    pub fn connected(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            already_authenticated: false,
        }
    }

    pub fn authenticated() -> Self {
        Self {
            address: None,
            already_authenticated: true,
        }
    }
}

/// Result of one signature attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignOutcome {
    Signed { address: String, signature: String },
    /// The caller was already authenticated; nothing was signed
    Skipped,
}

/// Drives one signing attempt against the selected connector.
///
/// Holds the mutable challenge message; everything the connector can
/// throw at us (user rejection, provider disconnect, an empty
/// signature) is collapsed into `SigningFailed` so raw provider errors
/// never reach UI code.
pub struct ChallengeSigner {
    message: RwLock<String>,
}

impl ChallengeSigner {
    pub fn new() -> Self {
        Self::with_message(DEFAULT_CHALLENGE)
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: RwLock::new(message.into()),
        }
    }

    pub fn message(&self) -> String {
        self.message.read().unwrap().clone()
    }

    pub fn set_message(&self, message: impl Into<String>) {
        *self.message.write().unwrap() = message.into();
    }

    /// Request a signature over the current challenge message.
    ///
    /// May suspend indefinitely on user interaction; callers cancel by
    /// dropping the future. No timeout is imposed here.
    pub async fn sign(
        &self,
        connector: &dyn Connector,
        state: &ConnectionState,
    ) -> Result<SignOutcome> {
        if state.already_authenticated {
            return Ok(SignOutcome::Skipped);
        }

        let address = match state.address.as_deref() {
            Some(address) if !address.is_empty() => address.to_string(),
            _ => {
                return Err(CrypteaError::SigningFailed(
                    "no account connected".to_string(),
                ));
            }
        };

        let message = self.message();
        match connector.sign_message(&message).await {
            Ok(signature) if signature.is_empty() => {
                warn!(connector = connector.id(), "connector returned an empty signature");
                Err(CrypteaError::SigningFailed("empty signature".to_string()))
            }
            Ok(signature) => Ok(SignOutcome::Signed { address, signature }),
            Err(e) => {
                warn!(connector = connector.id(), error = %e, "signature request failed");
                Err(CrypteaError::SigningFailed(format!(
                    "provider `{}` failed to sign",
                    connector.id()
                )))
            }
        }
    }
}

impl Default for ChallengeSigner {
    fn default() -> Self {
        Self::new()
    }
}
