//! Club member model.

use crate::model::validation::{require_text, ValidationError};
use crate::model::EntityId;
use serde::{Deserialize, Serialize};

/// Role a member holds inside the club.
///
/// The role set is open: values this version does not know are kept as
/// `Other` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MemberRole {
    #[default]
    Member,
    Moderator,
    Admin,
    Other(String),
}

impl MemberRole {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Member => "member",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for MemberRole {
    fn from(value: String) -> Self {
        match value.as_str() {
            "member" => Self::Member,
            "moderator" => Self::Moderator,
            "admin" => Self::Admin,
            _ => Self::Other(value),
        }
    }
}

impl From<MemberRole> for String {
    fn from(value: MemberRole) -> Self {
        match value {
            MemberRole::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: MemberRole,
    #[serde(default)]
    pub join_date: String,
}

/// Input for registering a member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewMember {
    pub name: String,
    pub email: String,
    /// Defaults to `MemberRole::Member`.
    pub role: Option<MemberRole>,
}

impl NewMember {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role: None,
        }
    }

    pub fn with_role(mut self, role: MemberRole) -> Self {
        self.role = Some(role);
        self
    }
}

impl Member {
    /// Builds a member from validated input.
    ///
    /// # Errors
    /// - `EmptyField` for a blank name or email.
    /// - `InvalidEmail` when the email has no `@`.
    pub fn create(
        id: EntityId,
        input: NewMember,
        join_date: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = require_text("name", &input.name)?;
        let email = require_text("email", &input.email)?;
        if !email.contains('@') {
            return Err(ValidationError::InvalidEmail);
        }

        Ok(Self {
            id,
            name,
            email,
            role: input.role.unwrap_or_default(),
            join_date: join_date.into(),
        })
    }
}
