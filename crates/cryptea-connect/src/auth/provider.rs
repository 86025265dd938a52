/*
[INPUT]:  Persisted session, cached identity, route, and sign-in events
[OUTPUT]: Authenticated/unauthenticated application state and redirects
[POS]:    Auth layer - provider state machine composing the whole flow
[UPDATE]: When gating rules or state transitions change
*/

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::auth::challenge::{ChallengeSigner, ConnectionState, SignOutcome};
use crate::auth::gateway::{AuthGateway, AuthResult};
use crate::connector::Connector;
use crate::device::is_mobile_user_agent;
use crate::http::Result;
use crate::session::{IdentityCache, SessionStore};
use crate::types::Identity;

/// Route an unverified identity is redirected to
pub const VERIFY_EMAIL_ROUTE: &str = "/verify/email";

/// Provider states. `Initializing` resolves to one of the other three
/// within a single startup pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Initializing,
    Unauthenticated,
    AuthenticatedUnverified,
    AuthenticatedVerified,
}

/// Where startup landed, and the single redirect it may have issued
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupOutcome {
    pub state: AuthState,
    pub redirect: Option<String>,
}

/// Application-facing view of the session
#[derive(Debug, Clone, PartialEq)]
pub struct AuthContext {
    pub mobile: bool,
    pub user: Option<Identity>,
    /// `None` until startup has decided
    pub is_authenticated: Option<bool>,
}

/// Construction-time options for the provider
#[derive(Debug, Clone)]
pub struct ProviderOptions {
    /// IANA timezone name sent with every verification request
    pub timezone: String,
    /// User agent used for device-class detection
    pub user_agent: String,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            user_agent: String::new(),
        }
    }
}

/// The auth provider: orchestrates startup session recovery,
/// email-verification gating, device-class detection, and the
/// loading flag, and exposes the current identity to consumers.
pub struct AuthProvider {
    gateway: AuthGateway,
    challenge: ChallengeSigner,
    session: Arc<SessionStore>,
    cache: Arc<dyn IdentityCache>,
    timezone: String,
    mobile: bool,
    state: RwLock<AuthState>,
    is_authenticated: RwLock<Option<bool>>,
    loading: AtomicBool,
}

impl AuthProvider {
    pub fn new(
        gateway: AuthGateway,
        challenge: ChallengeSigner,
        session: Arc<SessionStore>,
        cache: Arc<dyn IdentityCache>,
        options: ProviderOptions,
    ) -> Self {
        Self {
            gateway,
            challenge,
            session,
            cache,
            timezone: options.timezone,
            mobile: is_mobile_user_agent(&options.user_agent),
            state: RwLock::new(AuthState::Initializing),
            is_authenticated: RwLock::new(None),
            loading: AtomicBool::new(true),
        }
    }

    /// One startup pass: recover the persisted session and apply the
    /// email-verification gate for the current route.
    ///
    /// Resolves to exactly one terminal state and clears the loading
    /// flag on every branch, including the redirect branch.
    pub async fn initialize(&self, route: &str) -> StartupOutcome {
        let outcome = self.startup(route).await;
        self.loading.store(false, Ordering::SeqCst);
        outcome
    }

    async fn startup(&self, route: &str) -> StartupOutcome {
        if self.session.token().is_none() {
            *self.is_authenticated.write().unwrap() = Some(false);
            return self.settle(AuthState::Unauthenticated, None);
        }

        *self.is_authenticated.write().unwrap() = Some(true);

        // The gating routes themselves are exempt from the redirect
        if is_gating_exempt(route) {
            return self.settle(AuthState::AuthenticatedVerified, None);
        }

        let cached = match self.cache.get("*").await {
            Ok(cached) => cached,
            Err(e) => {
                warn!(error = %e, "identity cache lookup failed, skipping gate");
                None
            }
        };

        match cached {
            Some(identity) if !identity.is_email_verified() => {
                debug!(route, "unverified email, redirecting");
                self.settle(
                    AuthState::AuthenticatedUnverified,
                    Some(VERIFY_EMAIL_ROUTE.to_string()),
                )
            }
            _ => self.settle(AuthState::AuthenticatedVerified, None),
        }
    }

    fn settle(&self, state: AuthState, redirect: Option<String>) -> StartupOutcome {
        *self.state.write().unwrap() = state;
        StartupOutcome { state, redirect }
    }

    /// One complete sign-in attempt: sign the challenge, submit it, and
    /// transition on success.
    ///
    /// Returns `Ok(None)` when the connection state says the caller is
    /// already authenticated and signing was skipped. An empty or
    /// failed signature surfaces as `SigningFailed` before any network
    /// call is made.
    pub async fn sign_in(
        &self,
        connector: &dyn Connector,
        state: &ConnectionState,
    ) -> Result<Option<AuthResult>> {
        let outcome = self.challenge.sign(connector, state).await?;
        let SignOutcome::Signed { address, signature } = outcome else {
            return Ok(None);
        };

        let message = self.challenge.message();
        let result = self
            .gateway
            .authenticate(&address, &signature, &message, &self.timezone)
            .await?;

        if let AuthResult::Success { identity, .. } = &result {
            let next = if identity.is_email_verified() {
                AuthState::AuthenticatedVerified
            } else {
                AuthState::AuthenticatedUnverified
            };
            *self.state.write().unwrap() = next;
            *self.is_authenticated.write().unwrap() = Some(true);
        }

        Ok(Some(result))
    }

    /// Clear the session, durable records included
    pub fn logout(&self) -> Result<()> {
        self.session.clear()?;
        *self.state.write().unwrap() = AuthState::Unauthenticated;
        *self.is_authenticated.write().unwrap() = Some(false);
        Ok(())
    }

    /// Replace the exposed identity snapshot
    pub fn update(&self, identity: Option<Identity>) {
        self.session.set(identity);
    }

    /// Snapshot of the application-facing context
    pub fn context(&self) -> AuthContext {
        AuthContext {
            mobile: self.mobile,
            user: self.session.get(),
            is_authenticated: *self.is_authenticated.read().unwrap(),
        }
    }

    pub fn state(&self) -> AuthState {
        *self.state.read().unwrap()
    }

    /// UI-blocking loader; true only until `initialize` resolves
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// The challenge signer, for custom messages
    pub fn challenge(&self) -> &ChallengeSigner {
        &self.challenge
    }
}

fn is_gating_exempt(route: &str) -> bool {
    route.starts_with("/settings") || route.starts_with(VERIFY_EMAIL_ROUTE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gating_exempt_routes() {
        assert!(is_gating_exempt("/settings"));
        assert!(is_gating_exempt("/settings/profile"));
        assert!(is_gating_exempt("/verify/email"));
        assert!(!is_gating_exempt("/dashboard"));
        assert!(!is_gating_exempt("/pay/coffee-fund"));
    }
}
