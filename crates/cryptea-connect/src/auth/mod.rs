/*
[INPUT]:  Connectors, the HTTP client, and the session store
[OUTPUT]: Challenge-response authentication and provider state
[POS]:    Auth layer - orchestrates the complete login flow
[UPDATE]: When the auth flow or state transitions change
*/

pub mod challenge;
pub mod gateway;
pub mod provider;

pub use challenge::{ChallengeSigner, ConnectionState, SignOutcome, DEFAULT_CHALLENGE};
pub use gateway::{AuthGateway, AuthResult};
pub use provider::{AuthContext, AuthProvider, AuthState, ProviderOptions, StartupOutcome};
