/*
[INPUT]:  HTTP client configuration and backend endpoints
[OUTPUT]: Typed API results and a unified error type
[POS]:    HTTP layer - REST communication with the verification backend
[UPDATE]: When endpoints or client behavior change
*/

pub mod client;
pub mod error;

pub use client::{ClientConfig, CrypteaClient};
pub use error::{CrypteaError, Result};
