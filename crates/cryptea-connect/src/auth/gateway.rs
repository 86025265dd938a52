/*
[INPUT]:  Address, signature, challenge message, and timezone
[OUTPUT]: AuthResult with the session persisted on success
[POS]:    Auth layer - turns a signed challenge into a session
[UPDATE]: When the verification endpoint or response handling changes
*/

use std::sync::Arc;

use reqwest::Method;
use tracing::{debug, warn};

use crate::http::{CrypteaClient, CrypteaError, Result};
use crate::session::SessionStore;
use crate::types::{Identity, Session, WalletAuthRequest, WalletAuthResponse};

const WALLET_AUTH_ENDPOINT: &str = "/login/walletAuth";
const REJECTED_MESSAGE: &str = "Invalid Login Details";

/// Outcome of one verification attempt. Failure detail is collapsed to
/// a single user-facing reason; the structured kind survives in logs.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthResult {
    Success { identity: Identity, token: String },
    Rejected { reason: String },
    NetworkError,
}

impl AuthResult {
    pub fn is_success(&self) -> bool {
        matches!(self, AuthResult::Success { .. })
    }

    /// What to show the user, if anything
    pub fn user_message(&self) -> Option<&str> {
        match self {
            AuthResult::Success { .. } => None,
            AuthResult::Rejected { reason } => Some(reason),
            AuthResult::NetworkError => Some(REJECTED_MESSAGE),
        }
    }
}

/// Submits signed challenges to the verification backend.
pub struct AuthGateway {
    client: CrypteaClient,
    session: Arc<SessionStore>,
}

impl AuthGateway {
    pub fn new(client: CrypteaClient, session: Arc<SessionStore>) -> Self {
        Self { client, session }
    }

    /// `POST /login/walletAuth` with the signed challenge.
    ///
    /// A `Success` return means the session is already persisted and
    /// the in-memory store already broadcasts the new identity; callers
    /// need no further save step. The `Err` branch covers only local
    /// storage failures, never backend behavior.
    pub async fn authenticate(
        &self,
        address: &str,
        signature: &str,
        message: &str,
        timezone: &str,
    ) -> Result<AuthResult> {
        let request = WalletAuthRequest {
            address: address.to_string(),
            signature: signature.to_string(),
            message: message.to_string(),
            tz: timezone.to_string(),
        };

        let builder = self
            .client
            .request(Method::POST, WALLET_AUTH_ENDPOINT)?
            .json(&request);

        let response: WalletAuthResponse = match self.client.send_json(builder).await {
            Ok(response) => response,
            Err(CrypteaError::MalformedResponse(detail)) => {
                warn!(detail, "unexpected response shape, treating as rejection");
                return Ok(AuthResult::Rejected {
                    reason: REJECTED_MESSAGE.to_string(),
                });
            }
            Err(e @ (CrypteaError::Http(_) | CrypteaError::Api { .. })) => {
                warn!(error = %e, "verification backend unreachable");
                return Ok(AuthResult::NetworkError);
            }
            Err(e) => return Err(e),
        };

        if response.error {
            debug!(address, "backend rejected credentials");
            return Ok(AuthResult::Rejected {
                reason: REJECTED_MESSAGE.to_string(),
            });
        }

        let (Some(data), Some(token)) = (response.data, response.token) else {
            warn!("success response missing identity or token, treating as rejection");
            return Ok(AuthResult::Rejected {
                reason: REJECTED_MESSAGE.to_string(),
            });
        };

        let identity = data.data.into_identity();
        self.session.persist(&Session {
            identity: identity.clone(),
            token: token.clone(),
        })?;
        self.session.set(Some(identity.clone()));

        debug!(address, "authentication succeeded");
        Ok(AuthResult::Success { identity, token })
    }
}
