/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Cryptea auth adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod connector;
pub mod device;
pub mod http;
pub mod session;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{
    AuthContext,
    AuthGateway,
    AuthProvider,
    AuthResult,
    AuthState,
    ChallengeSigner,
    ConnectionState,
    ProviderOptions,
    SignOutcome,
    StartupOutcome,
};

// Re-export commonly used types from connector
pub use connector::{
    Connector,
    ConnectorDescriptor,
    ConnectorGroup,
    ConnectorRegistry,
    Ed25519Signer,
    ExtensionConnector,
    HardwareConnector,
    KeyStore,
    MailLinkConnector,
    MockConnector,
    RegistryConfig,
    RelayApprover,
    RelayConnector,
    RelayRequest,
    UdConnector,
};

// Re-export commonly used types from http
pub use http::{
    ClientConfig,
    CrypteaClient,
    CrypteaError,
    Result,
};

// Re-export commonly used types from session
pub use session::{
    FileStorage,
    IdentityCache,
    KvStorage,
    MemoryCache,
    MemoryStorage,
    SessionStore,
    StorageCache,
};

// Re-export all types
pub use types::*;

pub use device::is_mobile_user_agent;
