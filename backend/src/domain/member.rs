//! Read model of a member supplied by the membership subsystem.

use std::fmt;

use serde::Serialize;

use crate::domain::MemberId;

/// Validation errors raised when building a [`Member`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberValidationError {
    /// The name was blank.
    EmptyName,
}

impl fmt::Display for MemberValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "member name must not be blank"),
        }
    }
}

impl std::error::Error for MemberValidationError {}

/// A volunteer who can be assigned to slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    id: MemberId,
    full_name: String,
}

impl Member {
    /// Validate and construct a [`Member`]; the name is trimmed.
    pub fn new(id: MemberId, full_name: impl Into<String>) -> Result<Self, MemberValidationError> {
        let full_name = full_name.into().trim().to_owned();
        if full_name.is_empty() {
            return Err(MemberValidationError::EmptyName);
        }
        Ok(Self { id, full_name })
    }

    /// Stable member identifier.
    pub fn id(&self) -> MemberId {
        self.id
    }

    /// Name shown on rosters and candidate lists.
    pub fn full_name(&self) -> &str {
        self.full_name.as_str()
    }
}
