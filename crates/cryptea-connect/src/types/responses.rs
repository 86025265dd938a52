/*
[INPUT]:  JSON bodies returned by the verification endpoint
[OUTPUT]: Leniently-typed response structs and Identity conversion
[POS]:    Data layer - inbound response shapes
[UPDATE]: When the backend response envelope changes
*/

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::types::Identity;

/// Envelope returned by `POST /login/walletAuth`.
///
/// The backend signals application-level rejection through the `error`
/// flag even on HTTP 200, and nests the identity two levels deep.
#[derive(Debug, Deserialize)]
pub struct WalletAuthResponse {
    #[serde(default, deserialize_with = "truthy")]
    pub error: bool,
    pub data: Option<WalletAuthData>,
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WalletAuthData {
    pub data: IdentityPayload,
}

/// Identity fields as the backend sends them. `id` arrives as either a
/// number or a string depending on the backend version.
#[derive(Debug, Deserialize)]
pub struct IdentityPayload {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub username: String,
    pub img: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub accounts: Vec<String>,
    pub email_verified_at: Option<DateTime<Utc>>,
}

impl IdentityPayload {
    pub fn into_identity(self) -> Identity {
        Identity {
            id: self.id,
            email: self.email,
            username: self.username,
            accounts: self.accounts,
            avatar_url: self.img,
            email_verified_at: self.email_verified_at,
        }
    }
}

/// Accepts `false`, `0`, `null`, `""`, or absence as falsy; anything
/// else is treated as an error flag.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(flag) => flag,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for id, got {other}"
        ))),
    }
}
