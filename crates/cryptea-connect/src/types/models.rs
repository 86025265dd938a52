/*
[INPUT]:  Authenticated user data from the verification backend
[OUTPUT]: Identity and Session models for the session layer
[POS]:    Data layer - core session data shapes
[UPDATE]: When the persisted session format changes
*/

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable snapshot of the authenticated user.
///
/// Owned by the session store; replaced wholesale on every update and
/// never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: Option<String>,
    pub username: String,
    #[serde(default)]
    pub accounts: Vec<String>,
    #[serde(rename = "img")]
    pub avatar_url: Option<String>,
    pub email_verified_at: Option<DateTime<Utc>>,
}

impl Identity {
    /// An identity counts as verified unless it carries an email address
    /// without a verification timestamp.
    pub fn is_email_verified(&self) -> bool {
        !(self.email.is_some() && self.email_verified_at.is_none())
    }
}

/// An authenticated identity paired with its bearer token.
///
/// Persisted as two keyed records (`user`, `userToken`); a partial pair
/// on disk is treated as no session at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub identity: Identity,
    pub token: String,
}
