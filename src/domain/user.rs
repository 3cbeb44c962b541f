use serde::{Deserialize, Serialize};

use super::UserId;

/// The three actor roles of the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    Client,
    Owner,
    Delivery,
}

/// Represents a registered user in the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
    pub verified: bool,
}

/// Payload for creating a new user.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub email: String,
    pub role: UserRole,
}

/// Profile changes a user may make. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub email: Option<String>,
}

impl User {
    /// Creates an unverified user. Mostly useful in tests and fixtures, the
    /// store assigns real identifiers through [`UserCreate`].
    pub fn new(id: impl Into<UserId>, email: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            role,
            verified: false,
        }
    }
}
