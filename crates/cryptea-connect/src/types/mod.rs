/*
[INPUT]:  Backend API schema and session data shapes
[OUTPUT]: Typed Rust models with serialization support
[POS]:    Data layer - type definitions shared across the crate
[UPDATE]: When the backend schema or session format changes
*/

pub mod enums;
pub mod models;
pub mod requests;
pub mod responses;

pub use enums::Chain;
pub use models::{Identity, Session};
pub use requests::WalletAuthRequest;
pub use responses::{IdentityPayload, WalletAuthResponse};
