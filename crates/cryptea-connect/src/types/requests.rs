/*
[INPUT]:  Signed challenge data from the auth flow
[OUTPUT]: Request body for the verification endpoint
[POS]:    Data layer - outbound request shapes
[UPDATE]: When the verification endpoint contract changes
*/

use serde::Serialize;

/// Body of `POST /login/walletAuth`
#[derive(Debug, Clone, Serialize)]
pub struct WalletAuthRequest {
    pub address: String,
    pub signature: String,
    pub message: String,
    pub tz: String,
}
