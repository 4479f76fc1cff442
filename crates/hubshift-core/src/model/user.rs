use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::HubError;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Venue / employer
    Hub,
    /// Shift worker
    Professional,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Hub => "hub",
            Role::Professional => "professional",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hub" => Ok(Role::Hub),
            "professional" => Ok(Role::Professional),
            other => Err(HubError::UnknownRole {
                value: other.to_string(),
            }),
        }
    }
}

/// How the account authenticates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Email,
    Google,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Email => "email",
            AuthProvider::Google => "google",
        }
    }
}

impl FromStr for AuthProvider {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(AuthProvider::Email),
            "google" => Ok(AuthProvider::Google),
            other => Err(HubError::InvalidInput {
                reason: format!("unknown auth provider: {}", other),
            }),
        }
    }
}

/// A marketplace account
///
/// `role` is the role picked at signup; `current_role` is the side of the
/// marketplace the user is acting on right now. A user without a
/// `current_role` is sent to role selection before anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: Option<Role>,
    pub provider: AuthProvider,
    pub current_role: Option<Role>,
    #[serde(skip_serializing)]
    pub google_id: Option<String>,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a user with no role selected
    pub fn new(email: &str, provider: AuthProvider) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            email: normalize_email(email),
            role: None,
            provider,
            current_role: None,
            google_id: None,
            display_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_selected_role(&self) -> bool {
        self.current_role.is_some()
    }

    /// Switch the active role; the first selection also becomes the signup role
    pub fn select_role(&mut self, role: Role) {
        if self.role.is_none() {
            self.role = Some(role);
        }
        self.current_role = Some(role);
        self.updated_at = Utc::now();
    }

    pub fn is_acting_as(&self, role: Role) -> bool {
        self.current_role == Some(role)
    }
}

/// Lowercase and trim an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
