//! Upload session token and the signed-in user's context.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Opaque token binding upload and processing calls to one uploaded file.
///
/// Issued by the backend; the client only stores and echoes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role of the person driving the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Sees every college.
    #[default]
    Admin,
    /// Scoped to a single college.
    College,
}

impl UserRole {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::College => "college",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for UserRole {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "college" => Ok(Self::College),
            _ => Err(ModelError::UnknownRole(s.to_string())),
        }
    }
}

/// Who is using the client and on behalf of which college.
///
/// Created once at start-up and handed to every component that needs it.
/// The values are trusted as given; nothing here is verified.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionContext {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub college: Option<String>,
}

impl SessionContext {
    #[must_use]
    pub fn new(username: Option<String>, role: UserRole, college: Option<String>) -> Self {
        Self {
            username,
            role,
            college,
        }
    }

    /// College code used to scope requests, if the role is college-bound.
    #[must_use]
    pub fn college_scope(&self) -> Option<&str> {
        match self.role {
            UserRole::Admin => None,
            UserRole::College => self.college.as_deref(),
        }
    }

    /// Short description for headers and log fields.
    #[must_use]
    pub fn describe(&self) -> String {
        let user = self.username.as_deref().unwrap_or("anonymous");
        match self.college_scope() {
            Some(college) => format!("{user} ({}, {college})", self.role),
            None => format!("{user} ({})", self.role),
        }
    }
}
